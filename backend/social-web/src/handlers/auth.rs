/// Auth handlers - sign-in, sign-up, sign-out and the confirmation callback
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::domain::Route;
use crate::error::{AppError, Result};
use crate::middleware::{
    clear_cookie, session_cookie, verifier_cookie, SESSION_COOKIE, VERIFIER_COOKIE,
};
use crate::services::{SessionContext, SignUp};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// Sign in with email and password
pub async fn sign_in(
    state: web::Data<AppState>,
    req: web::Json<Credentials>,
) -> Result<HttpResponse> {
    let session = state.auth.sign_in(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session, state.cookie_secure))
        .json(serde_json::json!({ "redirect": Route::Home })))
}

/// Register a new account; usually ends in a confirmation email
pub async fn sign_up(
    state: web::Data<AppState>,
    req: web::Json<Credentials>,
) -> Result<HttpResponse> {
    match state.auth.sign_up(&req.email, &req.password).await? {
        SignUp::Pending { verifier } => Ok(HttpResponse::Ok()
            .cookie(verifier_cookie(&verifier, state.cookie_secure))
            .json(serde_json::json!({
                "message": "Check your email to confirm your account."
            }))),
        SignUp::SignedIn(session) => Ok(HttpResponse::Ok()
            .cookie(session_cookie(&session, state.cookie_secure))
            .json(serde_json::json!({
                "message": "Signed up.",
                "redirect": Route::Home,
            }))),
    }
}

/// Sign out and drop the session cookie. The cookie is cleared even when
/// the token no longer resolves to a session.
pub async fn sign_out(
    state: web::Data<AppState>,
    session: Option<SessionContext>,
) -> Result<HttpResponse> {
    if let Some(session) = session {
        // failures are logged by the auth service
        let _ = state.auth.sign_out(&session).await;
        state.searches.remove(session.user_id);
    }

    Ok(HttpResponse::Ok()
        .cookie(clear_cookie(SESSION_COOKIE, state.cookie_secure))
        .json(serde_json::json!({ "redirect": Route::Login })))
}

/// Target of the confirmation email: trade the code for a session
pub async fn auth_callback(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse> {
    let code = query
        .code
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("missing code".to_string()))?;
    let verifier = http_req
        .cookie(VERIFIER_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::BadRequest("sign-up verifier missing".to_string()))?;

    let session = state.auth.exchange_code(code, &verifier).await?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, Route::Home.to_string()))
        .cookie(session_cookie(&session, state.cookie_secure))
        .cookie(clear_cookie(VERIFIER_COOKIE, state.cookie_secure))
        .finish())
}
