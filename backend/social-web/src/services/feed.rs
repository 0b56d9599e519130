//! Feed assembly
//!
//! Turns post rows into display-ready items for one of three scopes. The
//! backend returns rows newest first; "most liked" is a stable re-sort on
//! top of that order, so equally liked posts keep their creation order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::{PostRow, Route};
use crate::error::Result;
use crate::repository::{PostAuthors, SocialStore};
use crate::services::TimestampFormatter;

pub(crate) const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedScope {
    /// Every post
    Global,
    /// Posts by users the viewer follows
    Following,
    /// Posts by one author
    Profile(Uuid),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    Recent,
    MostLiked,
}

/// One post ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub author_route: Route,
    pub title: String,
    pub content: String,
    /// Formatted for display
    pub created_at: String,
    pub comment_amount: i64,
    pub like_count: usize,
}

#[derive(Clone)]
pub struct FeedLoader {
    store: Arc<dyn SocialStore>,
    formatter: TimestampFormatter,
    viewer: Uuid,
}

impl FeedLoader {
    pub fn new(store: Arc<dyn SocialStore>, formatter: TimestampFormatter, viewer: Uuid) -> Self {
        Self {
            store,
            formatter,
            viewer,
        }
    }

    /// Fetch and present a feed. Every call goes to the backend.
    pub async fn load(&self, scope: FeedScope, sort: SortMode) -> Result<Vec<FeedPost>> {
        let authors = match scope {
            FeedScope::Global => PostAuthors::All,
            FeedScope::Profile(user_id) => PostAuthors::Only(user_id),
            FeedScope::Following => {
                let followed = self
                    .store
                    .followed_user_ids(self.viewer)
                    .await
                    .map_err(|e| {
                        error!(viewer = %self.viewer, error = %e, "Error fetching followed users");
                        e
                    })?;
                if followed.is_empty() {
                    debug!(viewer = %self.viewer, "viewer follows nobody");
                    return Ok(Vec::new());
                }
                PostAuthors::AnyOf(followed)
            }
        };

        let rows = self.store.list_posts(authors).await.map_err(|e| {
            error!(scope = ?scope, error = %e, "Error fetching posts");
            e
        })?;

        let mut posts: Vec<FeedPost> = rows.into_iter().map(|row| self.present(row)).collect();
        if sort == SortMode::MostLiked {
            sort_most_liked(&mut posts);
        }

        debug!(scope = ?scope, sort = ?sort, count = posts.len(), "feed assembled");
        Ok(posts)
    }

    fn present(&self, row: PostRow) -> FeedPost {
        let PostRow {
            post,
            profiles,
            likes,
        } = row;

        FeedPost {
            id: post.id,
            user_id: post.user_id,
            author_name: profiles
                .and_then(|p| p.username)
                .unwrap_or_else(|| ANONYMOUS.to_string()),
            author_route: Route::for_profile(self.viewer, post.user_id),
            title: post.title,
            content: post.content,
            created_at: self.formatter.format(post.created_at),
            comment_amount: post.comment_amount,
            like_count: likes.len(),
        }
    }
}

/// Order by like count, highest first; ties keep their current order
pub fn sort_most_liked(posts: &mut [FeedPost]) {
    posts.sort_by(|a, b| b.like_count.cmp(&a.like_count));
}
