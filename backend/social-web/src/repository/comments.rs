use supabase_rest::{SelectQuery, SupabaseClient};
use uuid::Uuid;

use crate::domain::{Comment, CommentRow, NewComment};
use crate::error::{AppError, Result};

const TABLE: &str = "comments";

/// Repository for Comment operations
#[derive(Clone)]
pub struct CommentRepository {
    client: SupabaseClient,
}

impl CommentRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        let mut rows: Vec<Comment> = self.client.insert(TABLE, &[comment]).await?;
        rows.pop()
            .ok_or_else(|| AppError::Internal("insert returned no comment".to_string()))
    }

    /// Every comment on a post with its author; no pagination
    pub async fn get_post_comments(&self, post_id: Uuid) -> Result<Vec<CommentRow>> {
        let query = SelectQuery::new("*,profiles(username,id)").eq("post_id", post_id);
        Ok(self.client.select(TABLE, &query).await?)
    }

    pub async fn count_post_comments(&self, post_id: Uuid) -> Result<i64> {
        let query = SelectQuery::new("id").eq("post_id", post_id);
        let (_, count): (Vec<serde_json::Value>, i64) =
            self.client.select_with_count(TABLE, &query).await?;
        Ok(count)
    }
}
