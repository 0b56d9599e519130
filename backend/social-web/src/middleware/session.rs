//! Session cookie extraction
//!
//! Handlers take a `SessionContext` argument; a request without a valid
//! `sb-access-token` cookie is rejected with 401 before the handler runs.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::error::AppError;
use crate::services::SessionContext;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "sb-access-token";
/// PKCE verifier kept between sign-up and the email callback
pub const VERIFIER_COOKIE: &str = "sb-code-verifier";

impl FromRequest for SessionContext {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

        Box::pin(async move {
            let state =
                state.ok_or_else(|| AppError::Internal("application state missing".to_string()))?;
            let token = token
                .filter(|t| !t.is_empty())
                .ok_or_else(|| AppError::Unauthorized("not signed in".to_string()))?;

            state.auth.resolve(&token).await.map_err(|e| {
                tracing::debug!("session rejected: {}", e);
                e
            })
        })
    }
}

fn base_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn session_cookie(session: &SessionContext, secure: bool) -> Cookie<'static> {
    base_cookie(SESSION_COOKIE, session.access_token.clone(), secure)
}

pub fn verifier_cookie(verifier: &str, secure: bool) -> Cookie<'static> {
    base_cookie(VERIFIER_COOKIE, verifier.to_string(), secure)
}

/// Cookie that makes the browser drop `name`
pub fn clear_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = base_cookie(name, String::new(), secure);
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_session_cookie_attributes() {
        let session = SessionContext {
            user_id: Uuid::new_v4(),
            email: None,
            access_token: "tok".to_string(),
        };
        let cookie = session_cookie(&session, true);

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_clear_cookie_is_empty() {
        let cookie = clear_cookie(SESSION_COOKIE, false);
        assert_eq!(cookie.value(), "");
        assert!(cookie.max_age().is_some());
    }
}
