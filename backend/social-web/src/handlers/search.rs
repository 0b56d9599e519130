/// Search handler - profile lookup by display name
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::services::{SearchOutcome, SessionContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Results for the latest input. A request overtaken by a newer one from
/// the same user answers 204 and carries no results.
pub async fn search_profiles(
    state: web::Data<AppState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let store = session.store(&state.client);

    match state
        .searches
        .search(session.user_id, store.as_ref(), &query.q)
        .await?
    {
        SearchOutcome::Results(hits) => Ok(HttpResponse::Ok().json(hits)),
        SearchOutcome::Superseded => Ok(HttpResponse::NoContent().finish()),
    }
}
