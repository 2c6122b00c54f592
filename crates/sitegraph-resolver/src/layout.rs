//! Render plan: which layout, base layout and section components a page
//! renders with.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use sitegraph_core::{
    ModelName,
    content::{id_of, model_name_of},
};
use tracing::{debug, warn};

use crate::{
    annotations::{DataAttributes, array_field_path, data_attributes, data_attrs},
    error::{ResolveError, Result},
    props::StaticProps,
    style::class_names,
};

/// Chrome a page layout is wrapped in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BaseLayout {
    /// Header, content and footer.
    #[default]
    #[serde(rename = "DefaultBaseLayout")]
    Default,
    /// Content only.
    #[serde(rename = "BlankBaseLayout")]
    Blank,
}

impl BaseLayout {
    /// Component name of the layout.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DefaultBaseLayout",
            Self::Blank => "BlankBaseLayout",
        }
    }

    /// Pick the base layout: the page's choice, else the site's, else the
    /// default. Unknown names fall back to the default.
    pub fn select(page: Option<&str>, site: Option<&str>) -> Self {
        let name = page.or(site).filter(|name| !name.is_empty());
        match name {
            None | Some("DefaultBaseLayout") => Self::Default,
            Some("BlankBaseLayout") => Self::Blank,
            Some(other) => {
                warn!(layout = other, "unknown base layout, using DefaultBaseLayout");
                Self::Default
            }
        }
    }
}

impl fmt::Display for BaseLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One section to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPlan {
    /// Position in the page's `sections` array.
    pub index: usize,

    /// Component name: the section's model name or its `type`.
    pub component: String,

    /// Classes derived from `styles.self`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub class_name: String,

    /// Visual-editing attributes.
    #[serde(skip_serializing_if = "DataAttributes::is_empty")]
    pub annotations: DataAttributes,
}

/// Everything a renderer needs to lay out one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    /// URL path the plan renders.
    pub url_path: String,

    /// Page layout selected by the page's content type.
    pub layout: ModelName,

    /// Chrome the layout is wrapped in.
    pub base_layout: BaseLayout,

    /// Sections in page order, nameless ones skipped.
    pub sections: Vec<SectionPlan>,

    /// Visual-editing attributes of the page element.
    #[serde(skip_serializing_if = "DataAttributes::is_empty")]
    pub annotations: DataAttributes,
}

/// Plan how the page in `props` is rendered.
///
/// A page without a content type, or whose type is not a page layout,
/// cannot be rendered and is an error. Sections without a component name
/// are skipped.
pub fn plan_page(props: &StaticProps) -> Result<RenderPlan> {
    let page = &props.page;
    let url_path = props.url_path().unwrap_or("/").to_string();

    let model_name = model_name_of(page).ok_or_else(|| ResolveError::MissingModel {
        url_path: url_path.clone(),
    })?;
    let layout = model_name
        .parse::<ModelName>()
        .ok()
        .filter(ModelName::is_page_layout)
        .ok_or_else(|| ResolveError::MissingLayout {
            url_path: url_path.clone(),
            model: model_name.to_string(),
        })?;

    let base_layout = BaseLayout::select(
        page.get("baseLayout").and_then(Value::as_str),
        props.site.get("baseLayout").and_then(Value::as_str),
    );
    let annotate = props
        .site
        .get("enableAnnotations")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let sections = match page.get("sections") {
        Some(Value::Array(sections)) => sections
            .iter()
            .enumerate()
            .filter_map(|(index, section)| plan_section(index, section, annotate, &url_path))
            .collect(),
        _ => Vec::new(),
    };

    let annotations = if annotate {
        data_attributes(id_of(page), None, [])
    } else {
        DataAttributes::new()
    };

    debug!(
        url_path = %url_path,
        layout = %layout,
        base_layout = %base_layout,
        sections = sections.len(),
        "planned page"
    );

    Ok(RenderPlan {
        url_path,
        layout,
        base_layout,
        sections,
        annotations,
    })
}

fn plan_section(index: usize, section: &Value, annotate: bool, url_path: &str) -> Option<SectionPlan> {
    let component = model_name_of(section)
        .or_else(|| section.get("type").and_then(Value::as_str))
        .filter(|name| !name.is_empty());
    let Some(component) = component else {
        warn!(url_path, index, "section has no type or modelName, skipping");
        return None;
    };

    let class_name = section
        .pointer("/styles/self")
        .map(class_names)
        .unwrap_or_default();

    let annotations = if annotate {
        let path = array_field_path("sections", index);
        let mut attrs = data_attributes(id_of(section), Some(path.as_str()), []);
        if let Some(map) = section.as_object() {
            extend_string_attrs(&mut attrs, &data_attrs(map));
        }
        attrs
    } else {
        DataAttributes::new()
    };

    Some(SectionPlan {
        index,
        component: component.to_string(),
        class_name,
        annotations,
    })
}

fn extend_string_attrs(attrs: &mut DataAttributes, extra: &Map<String, Value>) {
    for (key, value) in extra {
        let value = match value {
            Value::String(s) => s.clone(),
            Value::Null => continue,
            other => other.to_string(),
        };
        attrs.insert(key.clone(), value);
    }
}
