use serde_json::json;
use supabase_rest::{Filter, SelectQuery, SupabaseClient};
use tracing::debug;
use uuid::Uuid;

use super::PostAuthors;
use crate::domain::{NewPost, Post, PostRow};
use crate::error::{AppError, Result};

const TABLE: &str = "posts";
const FEED_COLUMNS: &str = "*,profiles(username),likes(user_id)";

/// Repository for Post operations
#[derive(Clone)]
pub struct PostRepository {
    client: SupabaseClient,
}

impl PostRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Posts ordered by creation time, newest first
    pub async fn list_posts(&self, authors: &PostAuthors) -> Result<Vec<PostRow>> {
        let query = SelectQuery::new(FEED_COLUMNS);
        let query = match authors {
            PostAuthors::All => query,
            PostAuthors::AnyOf(ids) => query.in_list("user_id", ids),
            PostAuthors::Only(id) => query.eq("user_id", id),
        }
        .order("created_at", false);

        let rows: Vec<PostRow> = self.client.select(TABLE, &query).await?;
        debug!(count = rows.len(), "fetched posts");
        Ok(rows)
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post> {
        let mut rows: Vec<Post> = self.client.insert(TABLE, &[post]).await?;
        rows.pop()
            .ok_or_else(|| AppError::Internal("insert returned no post".to_string()))
    }

    /// Overwrite the denormalized comment counter
    pub async fn set_comment_amount(&self, post_id: Uuid, amount: i64) -> Result<()> {
        let _: Vec<serde_json::Value> = self
            .client
            .update(
                TABLE,
                &[Filter::eq("id", post_id)],
                &json!({ "comment_amount": amount }),
            )
            .await?;
        Ok(())
    }
}
