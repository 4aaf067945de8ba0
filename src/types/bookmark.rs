use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Featured image of a post, in the CMS's `{ node: { sourceUrl, altText } }` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedImage {
    pub node: ImageNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub alt_text: String,
}

/// Categories of a post, in the CMS's `{ nodes: [...] }` shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryConnection {
    #[serde(default)]
    pub nodes: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// A content item as the frontend received it from the CMS.
///
/// Anything beyond the bookmarkable fields (body content, author, SEO blocks)
/// lands in `extra` and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryConnection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// Creates a post with only the required fields set.
    pub fn new(id: &str, title: &str, date: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            slug: String::new(),
            excerpt: String::new(),
            date: date.to_string(),
            featured_image: None,
            categories: None,
            extra: Map::new(),
        }
    }
}

/// A denormalized snapshot of a post saved for later reading.
///
/// Missing fields in persisted data default to empty so records written by an
/// older build still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    /// Trusted HTML from the CMS.
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<CategoryConnection>,
    #[serde(default)]
    pub bookmarked_at: String,
}

impl BookmarkRecord {
    /// Builds a record from the allow-listed fields of `post`.
    pub fn snapshot(post: &Post, bookmarked_at: String) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            date: post.date.clone(),
            featured_image: post.featured_image.clone(),
            categories: post.categories.clone(),
            bookmarked_at,
        }
    }

    /// Iterates over the record's categories (empty when it has none).
    pub fn category_nodes(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().flat_map(|c| c.nodes.iter())
    }
}
