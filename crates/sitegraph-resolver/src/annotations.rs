//! Visual-editing data attributes.
//!
//! Rendered elements carry `data-sb-object-id` and `data-sb-field-path`
//! so an editor can map DOM nodes back to content objects and fields.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Attribute holding the id of the content object an element renders.
pub const OBJECT_ID_ATTR: &str = "data-sb-object-id";

/// Attribute holding the field path an element renders.
pub const FIELD_PATH_ATTR: &str = "data-sb-field-path";

/// Data attributes of one element, sorted by name.
pub type DataAttributes = BTreeMap<String, String>;

/// Build the data attributes for an element.
///
/// Empty ids and paths are omitted. Custom attributes are applied last and
/// win over the generated ones.
pub fn data_attributes<'a>(
    object_id: Option<&str>,
    field_path: Option<&str>,
    custom: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> DataAttributes {
    let mut attrs = DataAttributes::new();
    if let Some(id) = object_id.filter(|id| !id.is_empty()) {
        attrs.insert(OBJECT_ID_ATTR.to_string(), id.to_string());
    }
    if let Some(path) = field_path.filter(|path| !path.is_empty()) {
        attrs.insert(FIELD_PATH_ATTR.to_string(), path.to_string());
    }
    for (key, value) in custom {
        attrs.insert(key.to_string(), value.to_string());
    }
    attrs
}

/// Join a child field onto a parent path.
pub fn field_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}

/// Path of the `index`th element of an array field.
pub fn array_field_path(path: &str, index: usize) -> String {
    format!("{path}.{index}")
}

/// Keep only the `data-*` entries of a props object.
pub fn data_attrs(props: &Map<String, Value>) -> Map<String, Value> {
    props
        .iter()
        .filter(|(key, _)| key.starts_with("data-"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
