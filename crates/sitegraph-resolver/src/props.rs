//! Static props resolution.
//!
//! Turns one URL path into the payload handed to the renderer: the
//! matching page (re-stamped with the requested path) plus the graph's
//! global props, with every registered content object replaced by its
//! resolver's output, children first.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use sitegraph_core::{
    ContentGraph, ContentObject, METADATA_KEY, ModelName,
    config::BuildConfig,
    content::{id_of, url_path_of},
};
use tracing::{debug, error, warn};

use crate::{
    collection::{Feed, FeedQuery, PagedView, posts_per_page, root_page_path},
    error::{ResolveError, Result},
    references::resolve_references,
    traverse::{Node, map_post_order},
};

/// Reference fields of a post.
const POST_REFERENCES: &[&str] = &["author", "category"];

/// Fields copied from a footer data file into `site.footer`.
const FOOTER_FIELDS: &[&str] = &[
    "logo",
    "text",
    "primaryLinks",
    "secondaryLinks",
    "socialLinks",
    "legalLinks",
    "copyrightText",
    "colors",
    "type",
];

/// Payload for one rendered path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticProps {
    /// Page metadata and fields.
    pub page: Value,

    /// Global site data.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub site: Value,

    /// Any other global props.
    #[serde(flatten)]
    pub rest: Map<String, Value>,

    /// Whether a page in the graph matched the requested path.
    #[serde(skip)]
    pub matched: bool,
}

impl StaticProps {
    /// Whether the payload was built for a path with no matching page.
    pub fn is_missing_page(&self) -> bool {
        !self.matched
    }

    /// The URL path the payload was built for.
    pub fn url_path(&self) -> Option<&str> {
        url_path_of(&self.page)
    }
}

/// Resolve the payload for `url_path`.
///
/// A path with no matching page yields a minimal payload rather than an
/// error. The only failure is a payload that does not survive a JSON
/// round trip.
pub fn resolve_static_props(
    url_path: &str,
    graph: &ContentGraph,
    settings: &BuildConfig,
) -> Result<StaticProps> {
    let root_url_path = root_page_path(url_path);

    let Some(page) = graph.find_page(root_url_path) else {
        error!(
            url_path,
            root = root_url_path,
            available = ?graph.page_paths(),
            "no matching page found for URL path"
        );
        let mut payload = assemble(json!({ METADATA_KEY: { "urlPath": url_path } }), graph);
        resolve_site_footer(&mut payload, graph);
        return finalize(url_path, payload, false);
    };

    debug!(url_path, page = page.id().unwrap_or("unknown page"), "resolving static props");

    let mut page_value = page.to_value();
    if let Some(meta) = page_value.get_mut(METADATA_KEY).and_then(Value::as_object_mut) {
        meta.insert("urlPath".to_string(), Value::String(url_path.to_string()));
    }

    let payload = assemble(page_value, graph);
    let resolver = PropsResolver { graph, settings };
    let mut payload = map_post_order(payload, &mut |value, node, key_path: &[String]| match node {
        Node::Content(model) => resolver.resolve(model, value, key_path),
        Node::Record | Node::Collection | Node::Scalar => value,
    });

    resolve_site_footer(&mut payload, graph);
    finalize(url_path, payload, true)
}

fn assemble(page: Value, graph: &ContentGraph) -> Value {
    let mut props = Map::new();
    props.insert("page".to_string(), page);
    for (key, value) in &graph.props {
        if key != "page" {
            props.insert(key.clone(), value.clone());
        }
    }
    Value::Object(props)
}

/// Per-content-type resolvers over one graph.
struct PropsResolver<'a> {
    graph: &'a ContentGraph,
    settings: &'a BuildConfig,
}

impl PropsResolver<'_> {
    fn resolve(&self, model: ModelName, value: Value, key_path: &[String]) -> Value {
        match model {
            ModelName::PageLayout
            | ModelName::HeroSection
            | ModelName::ServicesSection
            | ModelName::ContactSection => value,
            ModelName::PostLayout => resolve_references(value, POST_REFERENCES, self.graph),
            ModelName::PostFeedLayout | ModelName::PostFeedCategoryLayout => {
                match Feed::for_model(model) {
                    Some(feed) => self.resolve_feed(feed, value, key_path),
                    None => value,
                }
            }
            ModelName::RecentPostsSection => self.resolve_recent_posts(value),
            ModelName::FeaturedPostsSection => {
                resolve_references(value, &["posts.author", "posts.category"], self.graph)
            }
            ModelName::FeaturedPeopleSection => {
                resolve_references(value, &["people"], self.graph)
            }
        }
    }

    /// Slice the feed window addressed by the object's URL path.
    fn resolve_feed(&self, feed: Feed, value: Value, key_path: &[String]) -> Value {
        let location = key_path.join(".");
        let Some(url_path) = url_path_of(&value).map(str::to_string) else {
            warn!(at = %location, "feed has no urlPath, leaving it unresolved");
            return value;
        };
        let Some(query) = feed.query(id_of(&value)) else {
            warn!(at = %location, url_path = %url_path, "category feed has no id, leaving it unresolved");
            return value;
        };
        let per_page = match posts_per_page(value.get("numOfPostsPerPage"), self.settings.posts_per_page) {
            Ok(per_page) => per_page,
            Err(message) => {
                warn!(at = %location, url_path = %url_path, %message, "invalid feed page size, leaving it unresolved");
                return value;
            }
        };

        let posts = query.collect(self.graph, self.settings);
        let mut view = PagedView::for_path(&url_path, &posts, per_page, |post| post.to_value());
        view.items = match resolve_references(Value::Array(view.items), POST_REFERENCES, self.graph) {
            Value::Array(items) => items,
            _ => Vec::new(),
        };

        debug!(
            url_path = %url_path,
            page_index = view.page_index,
            num_of_pages = view.num_of_pages,
            items = view.items.len(),
            "resolved feed window"
        );

        let Value::Object(mut props) = value else {
            return value;
        };
        view.merge_into(&mut props);
        Value::Object(props)
    }

    /// Attach the newest posts as `posts`.
    fn resolve_recent_posts(&self, value: Value) -> Value {
        let count = value
            .get("recentCount")
            .and_then(count_value)
            .filter(|n| *n > 0)
            .unwrap_or(self.settings.recent_posts);

        let posts: Vec<Value> = FeedQuery::All
            .collect(self.graph, self.settings)
            .into_iter()
            .take(count)
            .map(ContentObject::to_value)
            .collect();
        let posts = resolve_references(Value::Array(posts), POST_REFERENCES, self.graph);

        let Value::Object(mut props) = value else {
            return value;
        };
        props.insert("posts".to_string(), posts);
        Value::Object(props)
    }
}

/// A non-negative count given as a number or a numeric string.
fn count_value(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Replace a `site.footer` data-file reference with the footer's fields.
///
/// An unknown footer file becomes `null` so the page still renders.
pub fn resolve_site_footer(payload: &mut Value, graph: &ContentGraph) {
    let Some(footer) = payload.get_mut("site").and_then(|site| site.get_mut("footer")) else {
        return;
    };
    let Some(file) = footer.as_str().filter(|f| f.ends_with(".json")) else {
        return;
    };

    *footer = match graph.find_object_by_url(file) {
        Some(data) => {
            let fields: Map<String, Value> = FOOTER_FIELDS
                .iter()
                .filter_map(|field| Some(((*field).to_string(), data.field(field)?.clone())))
                .collect();
            Value::Object(fields)
        }
        None => {
            warn!(footer = file, "footer data file not found, dropping footer");
            Value::Null
        }
    };
}

/// Push `props` through a strict JSON round trip.
///
/// Anything that cannot be encoded, or comes back different, is an error
/// naming `url_path`.
pub fn round_trip<T>(url_path: &str, props: &T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let expected =
        serde_json::to_value(props).map_err(|e| ResolveError::serialize(url_path, e.to_string()))?;
    let encoded =
        serde_json::to_string(props).map_err(|e| ResolveError::serialize(url_path, e.to_string()))?;
    let decoded: Value =
        serde_json::from_str(&encoded).map_err(|e| ResolveError::serialize(url_path, e.to_string()))?;

    if decoded != expected {
        return Err(ResolveError::serialize(
            url_path,
            "payload changed across a JSON round trip",
        ));
    }

    serde_json::from_value(decoded).map_err(|e| ResolveError::serialize(url_path, e.to_string()))
}

fn finalize(url_path: &str, payload: Value, matched: bool) -> Result<StaticProps> {
    let props: StaticProps = serde_json::from_value(payload.clone()).map_err(|e| {
        log_unserializable(url_path, &payload);
        ResolveError::serialize(url_path, e.to_string())
    })?;

    let mut props =
        round_trip(url_path, &props).inspect_err(|_| log_unserializable(url_path, &payload))?;
    props.matched = matched;
    Ok(props)
}

fn log_unserializable(url_path: &str, payload: &Value) {
    let footer = match payload.pointer("/site/footer") {
        Some(Value::Object(_)) => "footer object".to_string(),
        Some(other) => other.to_string(),
        None => "none".to_string(),
    };
    let page = payload
        .pointer("/page/__metadata")
        .map_or_else(|| "null".to_string(), ToString::to_string);
    error!(
        url_path,
        page = %page,
        footer = %footer,
        "error serializing props"
    );
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn graph() -> ContentGraph {
        ContentGraph::from_json_str(
            &json!({
                "pages": [
                    {
                        "__metadata": {"id": "home", "modelName": "PageLayout", "urlPath": "/"},
                        "title": "Home",
                        "sections": [
                            {"__metadata": {"modelName": "HeroSection"}, "title": "Welcome"},
                            {"__metadata": {"modelName": "FeaturedPeopleSection"}, "people": ["alice", "ghost"]},
                            {"__metadata": {"modelName": "FeaturedPostsSection"}, "posts": ["p2"]},
                            {"__metadata": {"modelName": "RecentPostsSection"}, "recentCount": 2}
                        ]
                    },
                    {"__metadata": {"id": "p1", "modelName": "PostLayout", "urlPath": "/blog/p1"}, "title": "P1", "author": "alice"},
                    {"__metadata": {"id": "blog", "modelName": "PostFeedLayout", "urlPath": "/blog"}, "title": "Blog", "numOfPostsPerPage": 1}
                ],
                "objects": [
                    {"__metadata": {"id": "alice", "modelName": "Person"}, "name": "Alice"},
                    {"__metadata": {"id": "p1", "modelName": "PostLayout", "urlPath": "/blog/p1"}, "title": "P1", "date": "2024-01-01", "author": "alice"},
                    {"__metadata": {"id": "p2", "modelName": "PostLayout", "urlPath": "/blog/p2"}, "title": "P2", "date": "2024-02-01", "author": "alice"},
                    {"__metadata": {"id": "p3", "modelName": "PostLayout", "urlPath": "/blog/p3"}, "title": "P3", "date": "2024-03-01", "isDraft": true},
                    {"__metadata": {"id": "footer", "modelName": "Footer", "urlPath": "content/data/footer.json"}, "text": "(c)", "copyrightText": "2024", "internal": "x"}
                ],
                "props": {"site": {"title": "Site", "footer": "content/data/footer.json"}}
            })
            .to_string(),
        )
        .expect("parse graph")
    }

    #[test]
    fn test_sections_resolved() {
        let props = resolve_static_props("/", &graph(), &BuildConfig::default()).expect("props");
        let sections = &props.page["sections"];

        assert_eq!(sections[0]["title"], "Welcome");
        assert_eq!(sections[1]["people"][0]["name"], "Alice");
        assert_eq!(sections[1]["people"][1], "ghost");
        assert_eq!(sections[2]["posts"][0]["title"], "P2");
        assert_eq!(sections[2]["posts"][0]["author"]["name"], "Alice");

        let recent = sections[3]["posts"].as_array().expect("recent posts");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0]["title"], "P2");
        assert_eq!(recent[1]["author"]["name"], "Alice");
    }

    #[test]
    fn test_recent_posts_include_drafts_in_preview() {
        let settings = BuildConfig {
            preview: true,
            ..BuildConfig::default()
        };
        let props = resolve_static_props("/", &graph(), &settings).expect("props");
        assert_eq!(props.page["sections"][3]["posts"][0]["title"], "P3");
    }

    #[test]
    fn test_feed_window() {
        let graph = graph();
        let settings = BuildConfig::default();

        let first = resolve_static_props("/blog", &graph, &settings).expect("props");
        assert_eq!(first.page["pageIndex"], 0);
        assert_eq!(first.page["numOfPages"], 2);
        assert_eq!(first.page["numOfTotalItems"], 2);
        assert_eq!(first.page["items"][0]["title"], "P2");
        assert_eq!(first.page["items"][0]["author"]["name"], "Alice");
        assert_eq!(first.page["nextUrlPath"], "/blog/page/2");
        assert!(first.page.get("prevUrlPath").is_none());

        let second = resolve_static_props("/blog/page/2", &graph, &settings).expect("props");
        assert_eq!(second.url_path(), Some("/blog/page/2"));
        assert_eq!(second.page["pageIndex"], 1);
        assert_eq!(second.page["baseUrlPath"], "/blog");
        assert_eq!(second.page["items"][0]["title"], "P1");
        assert_eq!(second.page["prevUrlPath"], "/blog");
        assert!(second.page.get("nextUrlPath").is_none());
    }

    #[test]
    fn test_feed_window_out_of_range() {
        let props = resolve_static_props("/blog/page/99", &graph(), &BuildConfig::default()).expect("props");

        assert_eq!(props.page["pageIndex"], 98);
        assert_eq!(props.page["items"], json!([]));
        assert_eq!(props.page["numOfTotalItems"], 2);
        assert!(props.page.get("nextUrlPath").is_none());
    }

    #[test]
    fn test_post_page_references() {
        let props = resolve_static_props("/blog/p1", &graph(), &BuildConfig::default()).expect("props");
        assert_eq!(props.page["author"]["name"], "Alice");
        assert_eq!(props.url_path(), Some("/blog/p1"));
        assert!(!props.is_missing_page());
    }

    #[test]
    fn test_site_props_and_footer() {
        let props = resolve_static_props("/", &graph(), &BuildConfig::default()).expect("props");

        assert_eq!(props.site["title"], "Site");
        assert_eq!(props.site["footer"]["text"], "(c)");
        assert_eq!(props.site["footer"]["copyrightText"], "2024");
        assert!(props.site["footer"].get("internal").is_none());
    }

    #[test]
    fn test_unknown_footer_becomes_null() {
        let mut payload = json!({"site": {"footer": "content/data/missing.json"}});
        resolve_site_footer(&mut payload, &graph());
        assert_eq!(payload["site"]["footer"], Value::Null);

        let mut payload = json!({"site": {"footer": {"text": "inline"}}});
        resolve_site_footer(&mut payload, &graph());
        assert_eq!(payload["site"]["footer"]["text"], "inline");
    }

    #[test]
    fn test_missing_page_minimal_payload() {
        let props = resolve_static_props("/nowhere", &graph(), &BuildConfig::default()).expect("props");

        assert!(props.is_missing_page());
        assert_eq!(props.page, json!({"__metadata": {"urlPath": "/nowhere"}}));
        assert_eq!(props.site["title"], "Site");
    }

    #[test]
    fn test_untyped_page_still_matches() {
        let graph = ContentGraph::from_json_str(
            &json!({"pages": [{"__metadata": {"urlPath": "/x"}, "title": "X"}]}).to_string(),
        )
        .expect("parse graph");

        let props = resolve_static_props("/x", &graph, &BuildConfig::default()).expect("props");
        assert!(!props.is_missing_page());
        assert_eq!(props.page["title"], "X");
    }

    #[test]
    fn test_recent_count_accepts_numeric_string() {
        let graph = ContentGraph::from_json_str(
            &json!({
                "pages": [{
                    "__metadata": {"id": "home", "modelName": "PageLayout", "urlPath": "/"},
                    "sections": [{"__metadata": {"modelName": "RecentPostsSection"}, "recentCount": "1"}]
                }],
                "objects": [
                    {"__metadata": {"id": "a", "modelName": "PostLayout"}, "title": "A", "date": "2024-01-01"},
                    {"__metadata": {"id": "b", "modelName": "PostLayout"}, "title": "B", "date": "2024-01-02"},
                    {"__metadata": {"id": "c", "modelName": "PostLayout"}, "title": "C", "date": "2024-01-03", "isDraft": "true"}
                ]
            })
            .to_string(),
        )
        .expect("parse graph");

        let props = resolve_static_props("/", &graph, &BuildConfig::default()).expect("props");
        let posts = props.page["sections"][0]["posts"].as_array().expect("posts");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0]["title"], "B");
    }

    #[test]
    fn test_round_trip_preserves_payload() {
        let props = resolve_static_props("/", &graph(), &BuildConfig::default()).expect("props");
        let again = round_trip("/", &props).expect("round trip");
        assert_eq!(again.page, props.page);
        assert_eq!(again.site, props.site);
        assert_eq!(again.rest, props.rest);
    }

    #[test]
    fn test_round_trip_shared_subtrees() {
        let author = json!({"__metadata": {"id": "alice"}, "name": "Alice", "ratio": 0.1});
        let props = StaticProps {
            page: json!({"a": author.clone(), "b": [author.clone(), author]}),
            site: Value::Null,
            rest: Map::new(),
            matched: false,
        };
        assert_eq!(round_trip("/", &props).expect("round trip"), props);
    }

    #[test]
    fn test_round_trip_rejects_unserializable() {
        let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
        bad.insert((1, 2), 3);

        let err = round_trip("/broken", &bad).unwrap_err();
        assert!(matches!(err, ResolveError::Serialize { ref url_path, .. } if url_path == "/broken"));
    }

    #[test]
    fn test_serialized_shape() {
        let props = resolve_static_props("/blog/p1", &graph(), &BuildConfig::default()).expect("props");
        let value = serde_json::to_value(&props).expect("to value");

        assert!(value.get("page").is_some());
        assert!(value.get("site").is_some());
        assert!(value.get("rest").is_none());
    }
}
