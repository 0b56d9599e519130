/// Feed handlers - home feed and post composer
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::Result;
use crate::services::{FeedLoader, FeedScope, PostComposer, PostDraft, SessionContext, SortMode};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeScope {
    #[default]
    All,
    Following,
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    #[serde(default)]
    pub scope: HomeScope,
    #[serde(default)]
    pub sort: SortMode,
}

/// Global or following feed, recent or most liked
pub async fn get_home(
    state: web::Data<AppState>,
    session: SessionContext,
    query: web::Query<HomeQuery>,
) -> Result<HttpResponse> {
    let scope = match query.scope {
        HomeScope::All => FeedScope::Global,
        HomeScope::Following => FeedScope::Following,
    };

    let loader = FeedLoader::new(
        session.store(&state.client),
        state.formatter,
        session.user_id,
    );
    let posts = loader.load(scope, query.sort).await?;

    Ok(HttpResponse::Ok().json(posts))
}

/// Create a post as the signed-in user
pub async fn create_post(
    state: web::Data<AppState>,
    session: SessionContext,
    req: web::Json<PostDraft>,
) -> Result<HttpResponse> {
    let composer = PostComposer::new(session.store(&state.client), session.user_id);
    let post = composer.submit(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(post))
}
