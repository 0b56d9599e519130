use supabase_rest::{Filter, SelectQuery, SupabaseClient};
use uuid::Uuid;

use crate::domain::Like;
use crate::error::Result;

const TABLE: &str = "likes";

/// Repository for Like operations
#[derive(Clone)]
pub struct LikeRepository {
    client: SupabaseClient,
}

impl LikeRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Uniqueness is left to the table; a duplicate surfaces as an API error.
    pub async fn create_like(&self, like: &Like) -> Result<()> {
        let _: Vec<Like> = self.client.insert(TABLE, &[like]).await?;
        Ok(())
    }

    pub async fn delete_like(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        self.client
            .delete(
                TABLE,
                &[Filter::eq("post_id", post_id), Filter::eq("user_id", user_id)],
            )
            .await?;
        Ok(())
    }

    /// Like edges for a post plus the exact count, in one request
    pub async fn get_post_likes(&self, post_id: Uuid) -> Result<(Vec<Like>, i64)> {
        let query = SelectQuery::new("*").eq("post_id", post_id);
        Ok(self.client.select_with_count(TABLE, &query).await?)
    }
}
