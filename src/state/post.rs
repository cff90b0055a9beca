//! Scraped post records

use crate::extract::ContentBlock;

/// Metadata read from a post page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostMetadata {
    pub author: String,
    pub title: String,
    pub date: String,
    /// Comma-separated, first-seen order
    pub tags: String,
}

/// One scraped blog entry
///
/// The slug is derived from the link when the post is created and cannot be
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub thumbnail: String,
    pub link: String,
    slug: String,
    pub tags: String,
    pub author: String,
    pub title: String,
    pub date: String,
    pub content: Vec<ContentBlock>,
}

impl Post {
    /// Creates a post, deriving its slug from `link` and `post_base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use pathloom_export::state::{Post, PostMetadata};
    ///
    /// let post = Post::new(
    ///     "https://www.pathloom.com/post/spring-garden",
    ///     "https://www.pathloom.com/post/",
    ///     String::new(),
    ///     PostMetadata::default(),
    ///     Vec::new(),
    /// );
    /// assert_eq!(post.slug(), "spring-garden");
    /// ```
    pub fn new(
        link: impl Into<String>,
        post_base_url: &str,
        thumbnail: String,
        metadata: PostMetadata,
        content: Vec<ContentBlock>,
    ) -> Self {
        let link = link.into();
        let slug = derive_slug(&link, post_base_url);
        Self {
            thumbnail,
            link,
            slug,
            tags: metadata.tags,
            author: metadata.author,
            title: metadata.title,
            date: metadata.date,
            content,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// The link with the base path removed, or the whole link when it does not
/// start with the base path
pub fn derive_slug(link: &str, post_base_url: &str) -> String {
    link.strip_prefix(post_base_url).unwrap_or(link).to_string()
}

/// Trims tags, drops empty ones and repeats, and joins them with `", "`
pub fn collect_tags<I, S>(raw: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_string());
        }
    }
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.pathloom.com/post/";

    #[test]
    fn test_slug_strips_base() {
        assert_eq!(derive_slug("https://www.pathloom.com/post/my-trip", BASE), "my-trip");
    }

    #[test]
    fn test_slug_of_foreign_link_is_link() {
        assert_eq!(
            derive_slug("https://other.com/post/my-trip", BASE),
            "https://other.com/post/my-trip"
        );
    }

    #[test]
    fn test_slug_only_strips_prefix() {
        let link = "https://mirror.net/?from=https://www.pathloom.com/post/x";
        assert_eq!(derive_slug(link, BASE), link);
    }

    #[test]
    fn test_post_new_derives_slug() {
        let post = Post::new(
            "https://www.pathloom.com/post/quiet-mornings",
            BASE,
            "https://static.site.com/thumb.jpg".to_string(),
            PostMetadata {
                author: "Jordan".to_string(),
                title: "Quiet Mornings".to_string(),
                date: "Mar 3, 2024".to_string(),
                tags: "calm, routine".to_string(),
            },
            Vec::new(),
        );
        assert_eq!(post.slug(), "quiet-mornings");
        assert_eq!(post.title, "Quiet Mornings");
        assert_eq!(post.tags, "calm, routine");
    }

    #[test]
    fn test_tags_deduped_in_first_seen_order() {
        assert_eq!(
            collect_tags([" travel ", "food", "", "travel", "  ", "Food"]),
            "travel, food, Food"
        );
    }

    #[test]
    fn test_no_tags() {
        assert_eq!(collect_tags(Vec::<String>::new()), "");
    }
}
