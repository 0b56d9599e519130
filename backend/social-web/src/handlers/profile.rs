/// Profile handlers - own profile, other profiles, follow toggle and account
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::repository::SocialStore;
use crate::services::{FollowController, SessionContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub user_id: Uuid,
}

fn controller(state: &AppState, session: &SessionContext, target: Uuid) -> FollowController {
    FollowController::new(
        session.store(&state.client),
        state.formatter,
        session.user_id,
        target,
    )
}

/// The signed-in user's profile with their posts
pub async fn get_own_profile(
    state: web::Data<AppState>,
    session: SessionContext,
) -> Result<HttpResponse> {
    let view = controller(&state, &session, session.user_id).refresh().await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Another user's profile, including whether the viewer follows them
pub async fn get_profile_viewer(
    state: web::Data<AppState>,
    session: SessionContext,
    query: web::Query<ProfileQuery>,
) -> Result<HttpResponse> {
    let view = controller(&state, &session, query.user_id).refresh().await?;
    Ok(HttpResponse::Ok().json(view))
}

/// Follow or unfollow, then return the re-read profile view, or just
/// `{"following": ..}` when the re-read failed after the write
pub async fn toggle_follow(
    state: web::Data<AppState>,
    session: SessionContext,
    query: web::Query<ProfileQuery>,
) -> Result<HttpResponse> {
    let toggled = controller(&state, &session, query.user_id).toggle().await?;
    Ok(HttpResponse::Ok().json(toggled))
}

pub async fn get_account(
    state: web::Data<AppState>,
    session: SessionContext,
) -> Result<HttpResponse> {
    let profile = session
        .store(&state.client)
        .get_profile(session.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": session.user_id,
        "email": session.email,
        "profile": profile,
    })))
}
