// src/models/post.rs

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A post that has not been persisted yet: no identity, no modified date.
///
/// Deliberately does not implement `PartialEq`; until the store assigns an
/// id, a post is equal only to itself by reference.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl NewPost {
    /// Builds an unsaved post and stamps its creation time.
    pub fn new(author: String, content: String, image_url: Option<String>) -> Self {
        Self {
            author,
            content,
            image_url,
            created_date: Utc::now(),
        }
    }
}

/// Represents a row of the 'posts' table.
///
/// `created_date` is written once on insert and never mutated afterwards;
/// `modified_date` stays NULL until the first update.
#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
}

impl Post {
    /// Overwrites the mutable fields and stamps the modification time.
    /// `id` and `created_date` are untouched.
    pub fn apply_update(&mut self, author: String, content: String, image_url: Option<String>) {
        self.author = author;
        self.content = content;
        self.image_url = image_url;
        self.modified_date = Some(Utc::now());
    }
}

/// Identity-based equality: two saved posts are equal iff their ids match.
impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Post {}

impl Hash for Post {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Inbound payload for create and update.
///
/// Every field is optional so that presence can be checked explicitly;
/// `validate` reports the first violation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub author: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

impl PostRequest {
    /// Checks the payload field by field, short-circuiting on the first
    /// violation. Length limits apply to the untrimmed input; emptiness is
    /// judged after trimming.
    pub fn validate(&self) -> Result<(), &'static str> {
        match &self.author {
            None => return Err("author is required"),
            Some(author) => {
                if author.trim().is_empty() {
                    return Err("author is required");
                }
                if author.chars().count() > 200 {
                    return Err("author must be at most 200 characters");
                }
            }
        }
        match &self.content {
            None => return Err("content is required"),
            Some(content) => {
                if content.trim().is_empty() {
                    return Err("content is required");
                }
                if content.chars().count() > 5000 {
                    return Err("content must be at most 5000 characters");
                }
            }
        }
        if let Some(url) = &self.image_url {
            if url.chars().count() > 2048 {
                return Err("imageUrl must be at most 2048 characters");
            }
        }
        Ok(())
    }

    /// Produces the storage form of a validated payload: author and content
    /// trimmed, blank imageUrl normalized to absent.
    ///
    /// Must only be called after `validate` has passed.
    pub fn normalized(&self) -> (String, String, Option<String>) {
        let author = self.author.as_deref().unwrap_or_default().trim().to_string();
        let content = self.content.as_deref().unwrap_or_default().trim().to_string();
        let image_url = self
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        (author, content, image_url)
    }
}

/// Outbound projection of a post, copied fresh from the persisted row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i64,
    pub author: String,
    pub content: String,
    pub image_url: Option<String>,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author: post.author,
            content: post.content,
            image_url: post.image_url,
            created_date: post.created_date,
            modified_date: post.modified_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn request(author: &str, content: &str, image_url: Option<&str>) -> PostRequest {
        PostRequest {
            author: Some(author.to_string()),
            content: Some(content.to_string()),
            image_url: image_url.map(str::to_string),
        }
    }

    fn saved_post(id: i64, author: &str) -> Post {
        Post {
            id,
            author: author.to_string(),
            content: "content".to_string(),
            image_url: None,
            created_date: Utc::now(),
            modified_date: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(request("alice", "hello world", None).validate(), Ok(()));
        assert_eq!(
            request("alice", "hello", Some("https://example.com/a.png")).validate(),
            Ok(())
        );
    }

    #[test]
    fn missing_author_is_rejected() {
        let req = PostRequest {
            author: None,
            content: Some("hello".to_string()),
            image_url: None,
        };
        assert_eq!(req.validate(), Err("author is required"));
    }

    #[test]
    fn blank_author_is_rejected() {
        assert_eq!(
            request("   ", "hello", None).validate(),
            Err("author is required")
        );
    }

    #[test]
    fn author_length_boundary() {
        assert_eq!(request(&"a".repeat(200), "hello", None).validate(), Ok(()));
        assert_eq!(
            request(&"a".repeat(201), "hello", None).validate(),
            Err("author must be at most 200 characters")
        );
    }

    #[test]
    fn missing_content_is_rejected() {
        let req = PostRequest {
            author: Some("alice".to_string()),
            content: None,
            image_url: None,
        };
        assert_eq!(req.validate(), Err("content is required"));
    }

    #[test]
    fn blank_content_is_rejected() {
        assert_eq!(
            request("alice", " \t ", None).validate(),
            Err("content is required")
        );
    }

    #[test]
    fn content_length_boundary() {
        assert_eq!(request("alice", &"c".repeat(5000), None).validate(), Ok(()));
        assert_eq!(
            request("alice", &"c".repeat(5001), None).validate(),
            Err("content must be at most 5000 characters")
        );
    }

    #[test]
    fn image_url_length_boundary() {
        assert_eq!(
            request("alice", "hello", Some(&"u".repeat(2048))).validate(),
            Ok(())
        );
        assert_eq!(
            request("alice", "hello", Some(&"u".repeat(2049))).validate(),
            Err("imageUrl must be at most 2048 characters")
        );
    }

    #[test]
    fn author_emptiness_is_checked_before_length() {
        // 201 spaces trims to empty, so the presence rule fires first.
        assert_eq!(
            request(&" ".repeat(201), "hello", None).validate(),
            Err("author is required")
        );
    }

    #[test]
    fn normalization_trims_and_drops_blank_image_url() {
        let (author, content, image_url) =
            request("  alice  ", "  hello  ", Some("   ")).normalized();
        assert_eq!(author, "alice");
        assert_eq!(content, "hello");
        assert_eq!(image_url, None);

        let (_, _, image_url) =
            request("alice", "hello", Some("  https://example.com/a.png  ")).normalized();
        assert_eq!(image_url, Some("https://example.com/a.png".to_string()));
    }

    #[test]
    fn new_post_stamps_creation_time() {
        let before = Utc::now();
        let post = NewPost::new("alice".to_string(), "hello".to_string(), None);
        let after = Utc::now();
        assert!(post.created_date >= before && post.created_date <= after);
    }

    #[test]
    fn apply_update_stamps_modification_and_keeps_creation() {
        let mut post = saved_post(1, "alice");
        let created = post.created_date;
        post.apply_update("bob".to_string(), "updated".to_string(), None);
        assert_eq!(post.author, "bob");
        assert_eq!(post.content, "updated");
        assert_eq!(post.created_date, created);
        assert!(post.modified_date.is_some());
    }

    #[test]
    fn saved_posts_compare_by_id_only() {
        let a = saved_post(1, "alice");
        let b = saved_post(1, "bob");
        let c = saved_post(2, "alice");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&c));
    }
}
