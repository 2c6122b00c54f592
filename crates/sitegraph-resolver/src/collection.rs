//! Post collections and pagination.
//!
//! The paths resolver and the props resolver both go through
//! [`FeedQuery::collect`], so the Nth emitted path always maps to the Nth
//! window of the same collection.

use std::cmp::Ordering;

use serde_json::{Map, Value};
use sitegraph_core::{ContentGraph, ContentObject, ModelName, config::BuildConfig};

/// Path segment introducing a page number.
const PAGE_SEGMENT: &str = "/page/";

/// Feed kinds a paginated page can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Every non-featured post, newest first.
    Chronological,
    /// Posts referencing the page's own id as their category.
    Category,
}

impl Feed {
    /// Feed kind of a content type; `None` for types that are not paginated.
    pub fn for_model(model: ModelName) -> Option<Self> {
        match model {
            ModelName::PostFeedLayout => Some(Self::Chronological),
            ModelName::PostFeedCategoryLayout => Some(Self::Category),
            ModelName::PageLayout
            | ModelName::PostLayout
            | ModelName::RecentPostsSection
            | ModelName::FeaturedPostsSection
            | ModelName::FeaturedPeopleSection
            | ModelName::HeroSection
            | ModelName::ServicesSection
            | ModelName::ContactSection => None,
        }
    }

    /// Query selecting this feed's posts for the page with the given id.
    pub fn query(self, page_id: Option<&str>) -> Option<FeedQuery<'_>> {
        match self {
            Self::Chronological => Some(FeedQuery::NonFeatured),
            Self::Category => page_id.map(FeedQuery::Category),
        }
    }
}

/// Which posts a collection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedQuery<'a> {
    /// Every post.
    All,
    /// Every post not marked as featured.
    NonFeatured,
    /// Posts whose `category` references the given id.
    Category(&'a str),
}

impl FeedQuery<'_> {
    /// Select, sort and (outside preview) filter posts.
    pub fn collect<'g>(&self, graph: &'g ContentGraph, settings: &BuildConfig) -> Vec<&'g ContentObject> {
        let mut posts: Vec<_> = graph
            .objects_of(ModelName::PostLayout)
            .filter(|post| match self {
                Self::All => true,
                Self::NonFeatured => !post.is_featured(),
                Self::Category(id) => post.category() == Some(*id),
            })
            .filter(|post| settings.preview || post.is_published())
            .collect();
        posts.sort_by(|a, b| newest_first(a, b));
        posts
    }
}

/// Window size of a feed page: its `numOfPostsPerPage` field, else `default`.
pub fn posts_per_page(field: Option<&Value>, default: usize) -> Result<usize, String> {
    match field {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| format!("numOfPostsPerPage must be a non-negative integer, got {n}")),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| format!("numOfPostsPerPage is not a number: {s:?}")),
        Some(other) => Err(format!("numOfPostsPerPage has unexpected value {other}")),
    }
}

/// Order posts newest first; undated posts go last, ordered by title.
pub fn newest_first(a: &ContentObject, b: &ContentObject) -> Ordering {
    match (b.date(), a.date()) {
        (Some(b_date), Some(a_date)) => b_date.cmp(&a_date),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.title().cmp(&b.title()),
    }
}

/// Strip a `/page/<n>` suffix: `/blog/page/2` becomes `/blog`.
pub fn root_page_path(url_path: &str) -> &str {
    match split_page_suffix(url_path) {
        Some((root, _)) if root.is_empty() => "/",
        Some((root, _)) => root,
        None => url_path,
    }
}

/// Zero-based window index encoded in a URL path; `/blog` and `/blog/page/1` are 0.
pub fn page_index(url_path: &str) -> usize {
    split_page_suffix(url_path)
        .map(|(_, n)| n.saturating_sub(1))
        .unwrap_or(0)
}

fn split_page_suffix(url_path: &str) -> Option<(&str, usize)> {
    let pos = url_path.rfind(PAGE_SEGMENT)?;
    let digits = &url_path[pos + PAGE_SEGMENT.len()..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = digits.parse().ok()?;
    Some((&url_path[..pos], number))
}

/// URL path of the window with the given zero-based index.
pub fn paged_path(base: &str, index: usize) -> String {
    if index == 0 {
        base.to_string()
    } else {
        format!("{}{PAGE_SEGMENT}{}", base.trim_end_matches('/'), index + 1)
    }
}

/// Number of windows for a collection; at least one so an empty feed still renders.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        1
    } else {
        total.div_ceil(per_page).max(1)
    }
}

/// Paginate a slice of items.
///
/// `page` is one-based; a `per_page` of 0 puts everything on page 1.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> (&[T], usize) {
    let total_pages = page_count(items.len(), per_page);
    if per_page == 0 {
        return if page <= 1 { (items, 1) } else { (&[], 1) };
    }

    let start = page.saturating_sub(1).saturating_mul(per_page);
    let end = start.saturating_add(per_page).min(items.len());

    if start >= items.len() {
        (&[], total_pages)
    } else {
        (&items[start..end], total_pages)
    }
}

/// Every URL path a paginated page expands into.
pub fn paged_paths(base: &str, total: usize, per_page: usize) -> Vec<String> {
    (0..page_count(total, per_page))
        .map(|index| paged_path(base, index))
        .collect()
}

/// One window of a sorted collection plus navigation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedView {
    /// Zero-based window index.
    pub page_index: usize,

    /// Path of the first window.
    pub base_url_path: String,

    /// Number of windows.
    pub num_of_pages: usize,

    /// Size of the whole collection.
    pub num_of_total_items: usize,

    /// Previous window path, if any.
    pub prev_url_path: Option<String>,

    /// Next window path, if any.
    pub next_url_path: Option<String>,

    /// Items of this window.
    pub items: Vec<Value>,
}

impl PagedView {
    /// Build the window addressed by `url_path` over `items`, converting
    /// only the items inside the window.
    pub fn for_path<T>(
        url_path: &str,
        items: &[T],
        per_page: usize,
        to_item: impl Fn(&T) -> Value,
    ) -> Self {
        let base = root_page_path(url_path).to_string();
        let index = page_index(url_path);
        let total = items.len();
        let (window, num_of_pages) = paginate(items, index + 1, per_page);

        let prev_url_path = (index > 0 && index < num_of_pages).then(|| paged_path(&base, index - 1));
        let next_url_path = (index + 1 < num_of_pages).then(|| paged_path(&base, index + 1));

        Self {
            page_index: index,
            base_url_path: base,
            num_of_pages,
            num_of_total_items: total,
            prev_url_path,
            next_url_path,
            items: window.iter().map(to_item).collect(),
        }
    }

    /// Merge the navigation fields and items into a props object.
    pub fn merge_into(self, props: &mut Map<String, Value>) {
        props.insert("pageIndex".to_string(), Value::from(self.page_index));
        props.insert("baseUrlPath".to_string(), Value::String(self.base_url_path));
        props.insert("numOfPages".to_string(), Value::from(self.num_of_pages));
        props.insert(
            "numOfTotalItems".to_string(),
            Value::from(self.num_of_total_items),
        );
        if let Some(prev) = self.prev_url_path {
            props.insert("prevUrlPath".to_string(), Value::String(prev));
        }
        if let Some(next) = self.next_url_path {
            props.insert("nextUrlPath".to_string(), Value::String(next));
        }
        props.insert("items".to_string(), Value::Array(self.items));
    }
}
