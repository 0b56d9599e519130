use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile row - created on sign-up by the hosted backend, read-only here
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl Profile {
    /// Website as a navigable link (`http://` prepended when no scheme)
    pub fn website_link(&self) -> Option<String> {
        self.website
            .as_deref()
            .filter(|w| !w.trim().is_empty())
            .map(normalize_website)
    }
}

// Nullable columns read as their default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn normalize_website(website: &str) -> String {
    if website.starts_with("http") {
        website.to_string()
    } else {
        format!("http://{}", website)
    }
}

/// Post row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Denormalized number of comments on this post
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment_amount: i64,
}

/// Author name embedded through the `profiles` join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Like edge embedded through the `likes` join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRef {
    pub user_id: Uuid,
}

/// Post as returned by `select=*,profiles(username),likes(user_id)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRow {
    #[serde(flatten)]
    pub post: Post,
    #[serde(default)]
    pub profiles: Option<AuthorRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: Vec<LikeRef>,
}

/// Comment row - immutable once created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment as returned by `select=*,profiles(username,id)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRow {
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(default)]
    pub profiles: Option<AuthorRef>,
}

/// Like edge - presence-only (post, user) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub post_id: Uuid,
    pub user_id: Uuid,
}

/// Directed follow edge: `follower_id` follows `user_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowEdge {
    pub follower_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub content: String,
}
