/// Post interaction handlers - likes and comments
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::services::{CommentDraft, PostItem, SessionContext};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRef {
    /// Author of the post, used for the author link
    pub author_id: Option<Uuid>,
}

fn post_item(
    state: &AppState,
    session: &SessionContext,
    post_id: Uuid,
    author_id: Option<Uuid>,
) -> PostItem {
    PostItem::new(
        session.store(&state.client),
        state.formatter,
        session.user_id,
        post_id,
        author_id.unwrap_or(session.user_id),
    )
}

/// Like count and whether the viewer likes the post
pub async fn get_likes(
    state: web::Data<AppState>,
    session: SessionContext,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let mut item = post_item(&state, &session, *post_id, None);
    let likes = item.load_likes().await?;

    Ok(HttpResponse::Ok().json(likes))
}

/// Like or unlike, depending on the current state
pub async fn toggle_like(
    state: web::Data<AppState>,
    session: SessionContext,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let mut item = post_item(&state, &session, *post_id, None);
    item.load_likes().await?;
    let likes = item.toggle_like().await?;

    Ok(HttpResponse::Ok().json(likes))
}

pub async fn get_comments(
    state: web::Data<AppState>,
    session: SessionContext,
    post_id: web::Path<Uuid>,
    query: web::Query<PostRef>,
) -> Result<HttpResponse> {
    let mut item = post_item(&state, &session, *post_id, query.author_id);
    item.fetch_comments().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "authorRoute": query.author_id.map(|_| item.author_route()),
        "comments": item.comments(),
    })))
}

/// Add a comment and return the refreshed list
pub async fn create_comment(
    state: web::Data<AppState>,
    session: SessionContext,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentDraft>,
) -> Result<HttpResponse> {
    let mut item = post_item(&state, &session, *post_id, None);
    let comment = item.submit_comment(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "comment": comment,
        "comments": item.comments(),
    })))
}
