//! Session provider
//!
//! The signed-in identity is an explicit `SessionContext` value. It is
//! resolved once per request from the session cookie and handed to every
//! service constructor; nothing stores it globally.

use std::sync::Arc;

use supabase_rest::{Pkce, Session, SignUpOutcome, SupabaseClient, SupabaseError};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::repository::{SocialStore, SupabaseStore};

/// Authenticated identity plus the token that proves it
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

impl SessionContext {
    pub fn from_session(session: &Session) -> Self {
        Self {
            user_id: session.user.id,
            email: session.user.email.clone(),
            access_token: session.access_token.clone(),
        }
    }

    /// Table access on behalf of this user
    pub fn store(&self, client: &SupabaseClient) -> Arc<dyn SocialStore> {
        Arc::new(SupabaseStore::new(
            client.with_access_token(&self.access_token),
        ))
    }
}

/// Result of a sign-up request
#[derive(Debug)]
pub enum SignUp {
    /// Confirmation mail sent; the PKCE verifier must survive until the callback
    Pending { verifier: String },
    SignedIn(SessionContext),
}

/// Sign-up, sign-in, sign-out and session retrieval
#[derive(Clone)]
pub struct AuthService {
    client: SupabaseClient,
    callback_url: String,
}

impl AuthService {
    pub fn new(client: SupabaseClient, callback_url: String) -> Self {
        Self {
            client,
            callback_url,
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp> {
        check_credentials(email, password)?;

        let pkce = Pkce::generate();
        let outcome = self
            .client
            .sign_up(email.trim(), password, &self.callback_url, Some(&pkce))
            .await
            .map_err(|e| {
                error!(error = %e, "sign-up failed");
                surface_auth_error(e)
            })?;

        match outcome {
            SignUpOutcome::ConfirmationSent(user) => {
                info!(user_id = %user.id, "sign-up pending email confirmation");
                Ok(SignUp::Pending {
                    verifier: pkce.verifier,
                })
            }
            SignUpOutcome::SignedIn(session) => {
                info!(user_id = %session.user.id, "sign-up issued a session");
                Ok(SignUp::SignedIn(SessionContext::from_session(&session)))
            }
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionContext> {
        check_credentials(email, password)?;

        let session = self
            .client
            .sign_in_with_password(email.trim(), password)
            .await
            .map_err(|e| {
                warn!(error = %e, "sign-in failed");
                surface_auth_error(e)
            })?;

        info!(user_id = %session.user.id, "signed in");
        Ok(SessionContext::from_session(&session))
    }

    pub async fn sign_out(&self, session: &SessionContext) -> Result<()> {
        self.client
            .sign_out(&session.access_token)
            .await
            .map_err(|e| {
                error!(user_id = %session.user_id, error = %e, "sign-out failed");
                AppError::from(e)
            })?;
        info!(user_id = %session.user_id, "signed out");
        Ok(())
    }

    /// Session retrieval from a stored access token
    pub async fn resolve(&self, access_token: &str) -> Result<SessionContext> {
        let user = self.client.get_user(access_token).await.map_err(|e| {
            if matches!(e.status(), Some(401 | 403)) {
                AppError::Unauthorized("session expired".to_string())
            } else {
                error!(error = %e, "session lookup failed");
                AppError::from(e)
            }
        })?;

        Ok(SessionContext {
            user_id: user.id,
            email: user.email,
            access_token: access_token.to_string(),
        })
    }

    /// Finish the email-confirmation flow
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<SessionContext> {
        if code.is_empty() {
            return Err(AppError::BadRequest("missing code".to_string()));
        }

        let session = self
            .client
            .exchange_code_for_session(code, verifier)
            .await
            .map_err(|e| {
                warn!(error = %e, "code exchange failed");
                surface_auth_error(e)
            })?;

        info!(user_id = %session.user.id, "session established from callback");
        Ok(SessionContext::from_session(&session))
    }
}

fn check_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required.".to_string(),
        ));
    }
    Ok(())
}

// Auth rejections carry a user-facing message; show it as-is.
fn surface_auth_error(e: SupabaseError) -> AppError {
    match e {
        SupabaseError::Api {
            status, message, ..
        } if (400..500).contains(&status) => AppError::Unauthorized(message),
        other => AppError::from(other),
    }
}
