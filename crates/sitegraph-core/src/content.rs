//! Content graph types.
//!
//! The graph is an untyped JSON document: every content object carries a
//! `__metadata` block (id, model name, URL path) next to open-ended fields.

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the metadata block inside every content object.
pub const METADATA_KEY: &str = "__metadata";

/// Content types with registered resolvers or layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelName {
    /// Generic page.
    PageLayout,
    /// Single blog post.
    PostLayout,
    /// Chronological feed of non-featured posts.
    PostFeedLayout,
    /// Feed of posts belonging to one category.
    PostFeedCategoryLayout,
    /// Section listing the newest posts.
    RecentPostsSection,
    /// Section listing hand-picked posts.
    FeaturedPostsSection,
    /// Section listing people.
    FeaturedPeopleSection,
    /// Hero banner section.
    HeroSection,
    /// Services grid section.
    ServicesSection,
    /// Contact section.
    ContactSection,
}

impl ModelName {
    /// Every registered content type.
    pub const ALL: [Self; 10] = [
        Self::PageLayout,
        Self::PostLayout,
        Self::PostFeedLayout,
        Self::PostFeedCategoryLayout,
        Self::RecentPostsSection,
        Self::FeaturedPostsSection,
        Self::FeaturedPeopleSection,
        Self::HeroSection,
        Self::ServicesSection,
        Self::ContactSection,
    ];

    /// Name as it appears in `__metadata.modelName`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageLayout => "PageLayout",
            Self::PostLayout => "PostLayout",
            Self::PostFeedLayout => "PostFeedLayout",
            Self::PostFeedCategoryLayout => "PostFeedCategoryLayout",
            Self::RecentPostsSection => "RecentPostsSection",
            Self::FeaturedPostsSection => "FeaturedPostsSection",
            Self::FeaturedPeopleSection => "FeaturedPeopleSection",
            Self::HeroSection => "HeroSection",
            Self::ServicesSection => "ServicesSection",
            Self::ContactSection => "ContactSection",
        }
    }

    /// Whether this type renders as a whole page rather than a section.
    pub fn is_page_layout(&self) -> bool {
        matches!(
            self,
            Self::PageLayout | Self::PostLayout | Self::PostFeedLayout | Self::PostFeedCategoryLayout
        )
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| format!("unregistered model: {s}"))
    }
}

/// Metadata block of a content object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Unique object id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Content type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// URL path, set for pages and addressable data files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,

    /// Any other metadata the content source attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Convert to a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        if let Some(model_name) = &self.model_name {
            map.insert("modelName".to_string(), Value::String(model_name.clone()));
        }
        if let Some(url_path) = &self.url_path {
            map.insert("urlPath".to_string(), Value::String(url_path.clone()));
        }
        map.extend(self.extra.clone());
        Value::Object(map)
    }
}

/// A single content object: page, section, post, author, category, data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentObject {
    /// Metadata block.
    #[serde(rename = "__metadata", default)]
    pub metadata: Metadata,

    /// Content fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ContentObject {
    /// Object id.
    pub fn id(&self) -> Option<&str> {
        self.metadata.id.as_deref()
    }

    /// Raw content type name.
    pub fn model_name(&self) -> Option<&str> {
        self.metadata.model_name.as_deref()
    }

    /// Registered content type, if any.
    pub fn model(&self) -> Option<ModelName> {
        self.model_name().and_then(|name| name.parse().ok())
    }

    /// URL path.
    pub fn url_path(&self) -> Option<&str> {
        self.metadata.url_path.as_deref()
    }

    /// Field value by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String field value by name.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Title field.
    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Whether the object is marked as a draft.
    pub fn is_draft(&self) -> bool {
        self.field("isDraft").is_some_and(flag_value)
    }

    /// Whether a post is published.
    pub fn is_published(&self) -> bool {
        !self.is_draft()
    }

    /// Whether a post is featured.
    pub fn is_featured(&self) -> bool {
        self.field("isFeatured").is_some_and(flag_value)
    }

    /// Category reference of a post.
    pub fn category(&self) -> Option<&str> {
        self.str_field("category")
    }

    /// Publication date, accepting RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        parse_date(self.str_field("date")?)
    }

    /// Convert to a JSON object, metadata first.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(METADATA_KEY.to_string(), self.metadata.to_value());
        map.extend(self.fields.clone());
        Value::Object(map)
    }
}

/// Read a boolean-like field value.
///
/// Content sources emit flags as booleans, numbers or strings; `"true"`,
/// `"yes"`, `"1"` and non-zero numbers count as set.
pub fn flag_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Parse a content date.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Metadata block of an arbitrary JSON value.
pub fn metadata_of(value: &Value) -> Option<&Map<String, Value>> {
    value.get(METADATA_KEY)?.as_object()
}

/// `__metadata.modelName` of an arbitrary JSON value.
pub fn model_name_of(value: &Value) -> Option<&str> {
    metadata_of(value)?.get("modelName")?.as_str()
}

/// `__metadata.id` of an arbitrary JSON value.
pub fn id_of(value: &Value) -> Option<&str> {
    metadata_of(value)?.get("id")?.as_str()
}

/// `__metadata.urlPath` of an arbitrary JSON value.
pub fn url_path_of(value: &Value) -> Option<&str> {
    metadata_of(value)?.get("urlPath")?.as_str()
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Object(usize),
    Page(usize),
}

/// Serialized form of the content graph.
#[derive(Debug, Default, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    pages: Vec<ContentObject>,
    #[serde(default)]
    objects: Vec<ContentObject>,
    #[serde(default)]
    props: Map<String, Value>,
}

impl From<GraphDocument> for ContentGraph {
    fn from(doc: GraphDocument) -> Self {
        Self::new(doc.pages, doc.objects, doc.props)
    }
}

/// The full content graph of a site, loaded once per build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphDocument")]
pub struct ContentGraph {
    /// Pages in authoring order.
    pub pages: Vec<ContentObject>,

    /// Every content object, including non-page entities.
    pub objects: Vec<ContentObject>,

    /// Global props spread into every payload (e.g. `site`).
    pub props: Map<String, Value>,

    #[serde(skip)]
    index: HashMap<String, Slot>,
}

impl ContentGraph {
    /// Build a graph and its id index.
    pub fn new(
        pages: Vec<ContentObject>,
        objects: Vec<ContentObject>,
        props: Map<String, Value>,
    ) -> Self {
        let mut index = HashMap::new();
        for (i, object) in objects.iter().enumerate() {
            if let Some(id) = object.id() {
                index.entry(id.to_string()).or_insert(Slot::Object(i));
            }
        }
        for (i, page) in pages.iter().enumerate() {
            if let Some(id) = page.id() {
                index.entry(id.to_string()).or_insert(Slot::Page(i));
            }
        }

        Self {
            pages,
            objects,
            props,
            index,
        }
    }

    /// Parse a graph from a JSON document.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Look up an object by id.
    pub fn object(&self, id: &str) -> Option<&ContentObject> {
        match self.index.get(id)? {
            Slot::Object(i) => self.objects.get(*i),
            Slot::Page(i) => self.pages.get(*i),
        }
    }

    /// Find the page whose URL path matches exactly.
    pub fn find_page(&self, url_path: &str) -> Option<&ContentObject> {
        self.pages.iter().find(|p| p.url_path() == Some(url_path))
    }

    /// Find any object whose URL path matches exactly.
    pub fn find_object_by_url(&self, url_path: &str) -> Option<&ContentObject> {
        self.objects
            .iter()
            .find(|o| o.url_path() == Some(url_path))
    }

    /// Objects of a given content type, in graph order.
    pub fn objects_of(&self, model: ModelName) -> impl Iterator<Item = &ContentObject> {
        self.objects
            .iter()
            .filter(move |o| o.model_name() == Some(model.as_str()))
    }

    /// URL paths of all pages, for diagnostics.
    pub fn page_paths(&self) -> Vec<&str> {
        self.pages.iter().filter_map(ContentObject::url_path).collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_graph() -> ContentGraph {
        ContentGraph::from_json_str(
            &json!({
                "pages": [
                    {"__metadata": {"id": "index", "modelName": "PageLayout", "urlPath": "/"}, "title": "Home"},
                    {"__metadata": {"id": "blog", "modelName": "PostFeedLayout", "urlPath": "/blog"}, "title": "Blog"}
                ],
                "objects": [
                    {"__metadata": {"id": "alice", "modelName": "Person"}, "name": "Alice"},
                    {"__metadata": {"id": "p1", "modelName": "PostLayout", "urlPath": "/blog/p1"}, "title": "One", "date": "2024-02-01", "isFeatured": true},
                    {"__metadata": {"id": "footer", "modelName": "Footer", "urlPath": "content/data/footer.json"}, "text": "bye"}
                ],
                "props": {"site": {"title": "Site"}}
            })
            .to_string(),
        )
        .expect("parse graph")
    }

    #[test]
    fn test_model_name_round_trip() {
        for model in ModelName::ALL {
            assert_eq!(model.as_str().parse::<ModelName>(), Ok(model));
        }
        assert!("GenericSection".parse::<ModelName>().is_err());
    }

    #[test]
    fn test_page_layout_classification() {
        assert!(ModelName::PostFeedLayout.is_page_layout());
        assert!(ModelName::PageLayout.is_page_layout());
        assert!(!ModelName::HeroSection.is_page_layout());
        assert!(!ModelName::RecentPostsSection.is_page_layout());
    }

    #[test]
    fn test_graph_lookup() {
        let graph = sample_graph();

        assert_eq!(graph.object("alice").and_then(|o| o.str_field("name")), Some("Alice"));
        assert_eq!(graph.object("blog").and_then(ContentObject::title), Some("Blog"));
        assert!(graph.object("missing").is_none());
        assert_eq!(graph.find_page("/blog").and_then(ContentObject::id), Some("blog"));
        assert!(graph.find_page("/nope").is_none());
        assert_eq!(
            graph
                .find_object_by_url("content/data/footer.json")
                .and_then(ContentObject::id),
            Some("footer")
        );
        assert_eq!(graph.objects_of(ModelName::PostLayout).count(), 1);
        assert_eq!(graph.page_paths(), vec!["/", "/blog"]);
        assert_eq!(graph.props["site"]["title"], "Site");
    }

    #[test]
    fn test_object_flags() {
        let graph = sample_graph();
        let post = graph.object("p1").expect("post");

        assert!(post.is_featured());
        assert!(!post.is_draft());
        assert!(post.is_published());
        assert_eq!(post.model(), Some(ModelName::PostLayout));
        assert_eq!(
            post.date().map(|d| d.to_rfc3339()),
            Some("2024-02-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_flag_values() {
        assert!(flag_value(&json!(true)));
        assert!(flag_value(&json!("true")));
        assert!(flag_value(&json!("Yes")));
        assert!(flag_value(&json!(1)));
        assert!(!flag_value(&json!(false)));
        assert!(!flag_value(&json!("false")));
        assert!(!flag_value(&json!("")));
        assert!(!flag_value(&json!(0)));
        assert!(!flag_value(&Value::Null));

        let draft: ContentObject =
            serde_json::from_value(json!({"__metadata": {"id": "d"}, "isDraft": "true"}))
                .expect("object");
        assert!(draft.is_draft());
        assert!(!draft.is_published());
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-01-15").is_some());
        assert!(parse_date("2024-01-15T10:30:00Z").is_some());
        assert!(parse_date("2024-01-15T10:30:00+02:00").is_some());
        assert!(parse_date("January 15").is_none());
    }

    #[test]
    fn test_to_value_keeps_metadata_and_fields() {
        let graph = sample_graph();
        let value = graph.object("alice").expect("alice").to_value();

        assert_eq!(id_of(&value), Some("alice"));
        assert_eq!(model_name_of(&value), Some("Person"));
        assert_eq!(value["name"], "Alice");
        assert!(url_path_of(&value).is_none());
    }

    #[test]
    fn test_metadata_extra_fields_preserved() {
        let object: ContentObject = serde_json::from_value(json!({
            "__metadata": {"id": "x", "modelName": "HeroSection", "relSourcePath": "pages/x.md"},
            "title": "Hi"
        }))
        .expect("parse object");

        assert_eq!(object.metadata.extra["relSourcePath"], "pages/x.md");
        assert_eq!(object.to_value()["__metadata"]["relSourcePath"], "pages/x.md");
    }
}
