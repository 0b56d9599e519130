use serde::Deserialize;
use supabase_rest::{Filter, SelectQuery, SupabaseClient};
use uuid::Uuid;

use crate::domain::FollowEdge;
use crate::error::Result;

const TABLE: &str = "followers";

#[derive(Deserialize)]
struct FollowedId {
    user_id: Uuid,
}

/// Repository for follow edges (`followers` table)
#[derive(Clone)]
pub struct FollowRepository {
    client: SupabaseClient,
}

impl FollowRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub async fn create_follow(&self, edge: &FollowEdge) -> Result<()> {
        let _: Vec<FollowEdge> = self.client.insert(TABLE, &[edge]).await?;
        Ok(())
    }

    pub async fn delete_follow(&self, edge: &FollowEdge) -> Result<()> {
        self.client
            .delete(
                TABLE,
                &[
                    Filter::eq("follower_id", edge.follower_id),
                    Filter::eq("user_id", edge.user_id),
                ],
            )
            .await?;
        Ok(())
    }

    /// Users that `follower_id` follows
    pub async fn get_following_ids(&self, follower_id: Uuid) -> Result<Vec<Uuid>> {
        let query = SelectQuery::new("user_id").eq("follower_id", follower_id);
        let rows: Vec<FollowedId> = self.client.select(TABLE, &query).await?;
        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    pub async fn get_follower_count(&self, user_id: Uuid) -> Result<i64> {
        let query = SelectQuery::new("follower_id").eq("user_id", user_id);
        let (_, count): (Vec<serde_json::Value>, i64) =
            self.client.select_with_count(TABLE, &query).await?;
        Ok(count)
    }

    pub async fn is_following(&self, edge: &FollowEdge) -> Result<bool> {
        let query = SelectQuery::new("*")
            .eq("user_id", edge.user_id)
            .eq("follower_id", edge.follower_id);
        let rows: Vec<FollowEdge> = self.client.select(TABLE, &query).await?;
        Ok(!rows.is_empty())
    }
}
