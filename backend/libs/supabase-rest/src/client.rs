//! Table API client (`/rest/v1`)
//!
//! Thin typed wrapper over the PostgREST endpoints of the hosted backend.
//! Every call is a single HTTP request; there is no retry and no cache.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::error::{Result, SupabaseError};
use crate::query::{parse_content_range_total, Filter, SelectQuery};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Hosted backend client
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    /// Project URL without trailing slash (e.g., "https://xyz.supabase.co")
    base_url: String,
    anon_key: String,
    /// Session token used instead of the anon key when present
    access_token: Option<String>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.access_token.is_some())
            .finish()
    }
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(SupabaseError::Config("base URL is empty".to_string()));
        }
        if anon_key.is_empty() {
            return Err(SupabaseError::Config("anon key is empty".to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            anon_key: anon_key.to_string(),
            access_token: None,
        })
    }

    /// Copy of this client that acts on behalf of a signed-in user
    pub fn with_access_token(&self, access_token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            anon_key: self.anon_key.clone(),
            access_token: Some(access_token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Fetch all rows matching `query`
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &SelectQuery,
    ) -> Result<Vec<T>> {
        debug!(table, params = ?query.to_params(), "select");

        let response = self
            .request(Method::GET, &self.table_url(table))
            .query(&query.to_params())
            .send()
            .await?;
        let response = check(table, response).await?;

        Ok(response.json::<Vec<T>>().await?)
    }

    /// Fetch rows together with the exact number of matching rows
    pub async fn select_with_count<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &SelectQuery,
    ) -> Result<(Vec<T>, i64)> {
        debug!(table, params = ?query.to_params(), "select with count");

        let response = self
            .request(Method::GET, &self.table_url(table))
            .header("Prefer", "count=exact")
            .query(&query.to_params())
            .send()
            .await?;
        let response = check(table, response).await?;

        let total = response
            .headers()
            .get("content-range")
            .and_then(|h| h.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or(SupabaseError::MissingCount)?;
        let rows = response.json::<Vec<T>>().await?;

        Ok((rows, total))
    }

    /// Fetch exactly one row; zero or several rows is an API error (406)
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &SelectQuery,
    ) -> Result<T> {
        debug!(table, params = ?query.to_params(), "select single");

        let response = self
            .request(Method::GET, &self.table_url(table))
            .header("Accept", SINGLE_OBJECT)
            .query(&query.to_params())
            .send()
            .await?;
        let response = check(table, response).await?;

        Ok(response.json::<T>().await?)
    }

    /// Insert one or more rows and return them as stored
    pub async fn insert<B, T>(&self, table: &str, rows: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, "insert");

        let response = self
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        let response = check(table, response).await?;

        Ok(response.json::<Vec<T>>().await?)
    }

    /// Patch every row matching `filters` and return the updated rows
    pub async fn update<B, T>(&self, table: &str, filters: &[Filter], patch: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, filters = ?filters, "update");

        let params: Vec<(String, String)> = filters.iter().map(Filter::to_param).collect();
        let response = self
            .request(Method::PATCH, &self.table_url(table))
            .header("Prefer", "return=representation")
            .query(&params)
            .json(patch)
            .send()
            .await?;
        let response = check(table, response).await?;

        Ok(response.json::<Vec<T>>().await?)
    }

    /// Delete every row matching `filters`
    pub async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()> {
        if filters.is_empty() {
            // PostgREST would reject it anyway; never send an unfiltered delete.
            return Err(SupabaseError::Config(format!(
                "refusing unfiltered delete on {}",
                table
            )));
        }
        debug!(table, filters = ?filters, "delete");

        let params: Vec<(String, String)> = filters.iter().map(Filter::to_param).collect();
        let response = self
            .request(Method::DELETE, &self.table_url(table))
            .query(&params)
            .send()
            .await?;
        check(table, response).await?;

        Ok(())
    }
}

/// Turn a non-success response into `SupabaseError::Api`
pub(crate) async fn check(target: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!(
        target_name = target,
        status = status.as_u16(),
        body = %body,
        "hosted backend returned error"
    );
    Err(SupabaseError::from_body(status.as_u16(), &body))
}
