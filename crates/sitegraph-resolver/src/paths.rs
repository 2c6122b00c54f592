//! Static path enumeration.
//!
//! Produces every URL path the build must pre-render. Feed pages expand
//! into one path per pagination window; a page whose expansion fails is
//! logged and contributes nothing, the rest of the site still resolves.

use sitegraph_core::{ContentGraph, ContentObject, config::BuildConfig};
use tracing::{debug, error, info};

use crate::{
    collection::{Feed, paged_paths, posts_per_page},
    error::{ResolveError, Result},
};

/// Enumerate the static paths of a site, in page order.
pub fn resolve_static_paths(graph: &ContentGraph, settings: &BuildConfig) -> Vec<String> {
    let mut paths = Vec::new();

    for page in &graph.pages {
        if page.is_draft() && !settings.preview {
            debug!(page = page.id().unwrap_or("unknown page"), "skipping draft");
            continue;
        }

        match page.model().and_then(Feed::for_model) {
            Some(feed) => match expand_feed_paths(feed, page, graph, settings) {
                Ok(expanded) => {
                    debug!(
                        page = page.id().unwrap_or("unknown page"),
                        count = expanded.len(),
                        "expanded paginated page"
                    );
                    paths.extend(expanded);
                }
                Err(e) => {
                    error!(
                        page = page.id().unwrap_or("unknown page"),
                        error = %e,
                        "error resolving paths for page"
                    );
                }
            },
            None => match page.url_path() {
                Some(url_path) => paths.push(url_path.to_string()),
                None => debug!(page = page.id().unwrap_or("unknown page"), "page has no urlPath"),
            },
        }
    }

    info!(count = paths.len(), preview = settings.preview, "resolved static paths");
    paths
}

/// Expand a feed page into one path per window.
pub fn expand_feed_paths(
    feed: Feed,
    page: &ContentObject,
    graph: &ContentGraph,
    settings: &BuildConfig,
) -> Result<Vec<String>> {
    let base = page
        .url_path()
        .ok_or_else(|| ResolveError::expansion(page.id(), "page has no urlPath"))?;
    let query = feed
        .query(page.id())
        .ok_or_else(|| ResolveError::expansion(page.id(), "category feed page has no id"))?;
    let per_page = posts_per_page(page.field("numOfPostsPerPage"), settings.posts_per_page)
        .map_err(|message| ResolveError::expansion(page.id(), message))?;

    let posts = query.collect(graph, settings);
    Ok(paged_paths(base, posts.len(), per_page))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn post(id: usize, extra: Value) -> Value {
        let mut value = json!({
            "__metadata": {"id": format!("post-{id}"), "modelName": "PostLayout", "urlPath": format!("/blog/post-{id}")},
            "title": format!("Post {id}"),
            "date": format!("2024-01-{:02}", id % 28 + 1),
        });
        if let (Some(map), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            map.extend(extra.clone());
        }
        value
    }

    fn graph(pages: Value, objects: Vec<Value>) -> ContentGraph {
        ContentGraph::from_json_str(&json!({"pages": pages, "objects": objects}).to_string())
            .expect("parse graph")
    }

    fn preview() -> BuildConfig {
        BuildConfig {
            preview: true,
            ..BuildConfig::default()
        }
    }

    #[test]
    fn test_plain_pages_in_order() {
        let graph = graph(
            json!([
                {"__metadata": {"id": "home", "modelName": "PageLayout", "urlPath": "/"}},
                {"__metadata": {"id": "about", "modelName": "PageLayout", "urlPath": "/about"}},
                {"__metadata": {"id": "orphan", "modelName": "PageLayout"}},
                {"__metadata": {"id": "custom", "modelName": "GlpInjectables", "urlPath": "/glp"}}
            ]),
            vec![],
        );

        assert_eq!(
            resolve_static_paths(&graph, &BuildConfig::default()),
            vec!["/", "/about", "/glp"]
        );
    }

    #[test]
    fn test_drafts_only_in_preview() {
        let graph = graph(
            json!([
                {"__metadata": {"id": "home", "modelName": "PageLayout", "urlPath": "/"}},
                {"__metadata": {"id": "wip", "modelName": "PageLayout", "urlPath": "/wip"}, "isDraft": true}
            ]),
            vec![],
        );

        assert_eq!(resolve_static_paths(&graph, &BuildConfig::default()), vec!["/"]);
        assert_eq!(resolve_static_paths(&graph, &preview()), vec!["/", "/wip"]);
    }

    #[test]
    fn test_feed_expansion_published_only() {
        let mut objects: Vec<Value> = (0..25).map(|i| post(i, json!({}))).collect();
        objects[3]["isDraft"] = json!(true);
        objects[7]["isDraft"] = json!(true);
        let graph = graph(
            json!([{"__metadata": {"id": "blog", "modelName": "PostFeedLayout", "urlPath": "/blog"}}]),
            objects,
        );

        assert_eq!(
            resolve_static_paths(&graph, &BuildConfig::default()),
            vec!["/blog", "/blog/page/2", "/blog/page/3"]
        );
        assert_eq!(resolve_static_paths(&graph, &preview()).len(), 3);
    }

    #[test]
    fn test_feed_page_size_and_featured_posts() {
        let mut objects: Vec<Value> = (0..9).map(|i| post(i, json!({}))).collect();
        objects.push(post(9, json!({"isFeatured": true})));
        let graph = graph(
            json!([{"__metadata": {"id": "blog", "modelName": "PostFeedLayout", "urlPath": "/blog"}, "numOfPostsPerPage": 3}]),
            objects,
        );

        assert_eq!(
            resolve_static_paths(&graph, &BuildConfig::default()),
            vec!["/blog", "/blog/page/2", "/blog/page/3"]
        );
    }

    #[test]
    fn test_category_feed_expansion() {
        let objects = vec![
            post(1, json!({"category": "news"})),
            post(2, json!({"category": "news"})),
            post(3, json!({"category": "news"})),
            post(4, json!({"category": "other"})),
        ];
        let graph = graph(
            json!([{"__metadata": {"id": "news", "modelName": "PostFeedCategoryLayout", "urlPath": "/blog/news"}, "numOfPostsPerPage": 2}]),
            objects,
        );

        assert_eq!(
            resolve_static_paths(&graph, &BuildConfig::default()),
            vec!["/blog/news", "/blog/news/page/2"]
        );
    }

    #[test]
    fn test_failing_expansion_is_isolated() {
        let graph = graph(
            json!([
                {"__metadata": {"id": "home", "modelName": "PageLayout", "urlPath": "/"}},
                {"__metadata": {"id": "broken", "modelName": "PostFeedLayout", "urlPath": "/broken"}, "numOfPostsPerPage": "lots"},
                {"__metadata": {"id": "nourl", "modelName": "PostFeedLayout"}},
                {"__metadata": {"id": "about", "modelName": "PageLayout", "urlPath": "/about"}}
            ]),
            vec![post(1, json!({}))],
        );

        assert_eq!(
            resolve_static_paths(&graph, &BuildConfig::default()),
            vec!["/", "/about"]
        );
    }

    #[test]
    fn test_expand_feed_paths_errors() {
        let page: ContentObject = serde_json::from_value(json!({
            "__metadata": {"modelName": "PostFeedCategoryLayout", "urlPath": "/cat"}
        }))
        .expect("page");
        let err = expand_feed_paths(Feed::Category, &page, &ContentGraph::default(), &BuildConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("has no id"));
    }
}
