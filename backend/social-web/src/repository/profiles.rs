use supabase_rest::{SelectQuery, SupabaseClient};
use tracing::debug;
use uuid::Uuid;

use crate::domain::Profile;
use crate::error::Result;

const TABLE: &str = "profiles";

/// Repository for Profile reads
#[derive(Clone)]
pub struct ProfileRepository {
    client: SupabaseClient,
}

impl ProfileRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let query = SelectQuery::new("*").eq("id", user_id);
        match self.client.select_single::<Profile>(TABLE, &query).await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn search_by_username(&self, needle: &str, limit: usize) -> Result<Vec<Profile>> {
        let query = SelectQuery::new("*")
            .ilike_contains("username", needle)
            .limit(limit);
        let profiles: Vec<Profile> = self.client.select(TABLE, &query).await?;
        debug!(needle, count = profiles.len(), "profile search");
        Ok(profiles)
    }
}
