//! Auth API client (`/auth/v1`)
//!
//! Covers the flows the web client uses: email sign-up with PKCE,
//! password sign-in, code exchange on the email callback, session
//! retrieval and sign-out.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{distributions::Alphanumeric, Rng};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::{check, SupabaseClient};
use crate::error::Result;

/// Authenticated identity as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Tokens issued on sign-in or code exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: AuthUser,
}

/// Outcome of a sign-up call
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// Email confirmation pending; the user follows the emailed link
    ConfirmationSent(AuthUser),
    /// Confirmation is disabled on the project and a session was issued
    SignedIn(Session),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpBody {
    Session(Session),
    User(AuthUser),
}

/// PKCE verifier/challenge pair (S256)
#[derive(Debug, Clone)]
pub struct Pkce {
    pub verifier: String,
    pub challenge: String,
}

impl Pkce {
    pub fn generate() -> Self {
        let verifier: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();
        let challenge = Self::challenge_for(&verifier);
        Self {
            verifier,
            challenge,
        }
    }

    pub fn challenge_for(verifier: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
    }
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_challenge: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_challenge_method: Option<&'a str>,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PkceGrant<'a> {
    auth_code: &'a str,
    code_verifier: &'a str,
}

impl SupabaseClient {
    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url(), path)
    }

    fn auth_request(&self, method: Method, path: &str, bearer: Option<&str>) -> reqwest::RequestBuilder {
        let bearer = bearer.unwrap_or_else(|| self.anon_key());
        self.http()
            .request(method, self.auth_url(path))
            .header("apikey", self.anon_key())
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Register a new account.
    ///
    /// `redirect_to` is where the confirmation email sends the user
    /// (the site's `/auth/callback`).
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
        pkce: Option<&Pkce>,
    ) -> Result<SignUpOutcome> {
        info!(email, "signing up");

        let body = SignUpRequest {
            email,
            password,
            code_challenge: pkce.map(|p| p.challenge.as_str()),
            code_challenge_method: pkce.map(|_| "s256"),
        };

        let response = self
            .auth_request(Method::POST, "signup", None)
            .query(&[("redirect_to", redirect_to)])
            .json(&body)
            .send()
            .await?;
        let response = check("auth/signup", response).await?;

        match response.json::<SignUpBody>().await? {
            SignUpBody::Session(session) => Ok(SignUpOutcome::SignedIn(session)),
            SignUpBody::User(user) => Ok(SignUpOutcome::ConfirmationSent(user)),
        }
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        info!(email, "signing in with password");

        let response = self
            .auth_request(Method::POST, "token", None)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await?;
        let response = check("auth/token", response).await?;

        Ok(response.json::<Session>().await?)
    }

    /// Exchange the `code` from the email callback for a session
    pub async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Session> {
        let response = self
            .auth_request(Method::POST, "token", None)
            .query(&[("grant_type", "pkce")])
            .json(&PkceGrant {
                auth_code,
                code_verifier,
            })
            .send()
            .await?;
        let response = check("auth/token", response).await?;

        Ok(response.json::<Session>().await?)
    }

    /// Resolve an access token to its user
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let response = self
            .auth_request(Method::GET, "user", Some(access_token))
            .send()
            .await?;
        let response = check("auth/user", response).await?;

        Ok(response.json::<AuthUser>().await?)
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .auth_request(Method::POST, "logout", Some(access_token))
            .send()
            .await?;

        if let Err(e) = check("auth/logout", response).await {
            // An already-expired token cannot be revoked; the caller still drops it.
            if e.status() == Some(401) {
                warn!("sign-out with expired token");
                return Ok(());
            }
            return Err(e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pkce_challenge_is_s256_of_verifier() {
        // RFC 7636 appendix B
        assert_eq!(
            Pkce::challenge_for("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk"),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_pkce_generate() {
        let pkce = Pkce::generate();
        assert_eq!(pkce.verifier.len(), 64);
        assert_eq!(pkce.challenge, Pkce::challenge_for(&pkce.verifier));
        assert_ne!(pkce.verifier, Pkce::generate().verifier);
    }

    #[test]
    fn test_sign_up_body_variants() {
        let user: SignUpBody = serde_json::from_str(
            r#"{"id":"8f14e45f-ceea-467f-a7d6-5c8d7a1f7c11","email":"a@b.c","aud":"authenticated"}"#,
        )
        .unwrap();
        assert!(matches!(user, SignUpBody::User(_)));

        let session: SignUpBody = serde_json::from_str(
            r#"{"access_token":"t","refresh_token":"r","expires_in":3600,"token_type":"bearer",
                "user":{"id":"8f14e45f-ceea-467f-a7d6-5c8d7a1f7c11","email":"a@b.c"}}"#,
        )
        .unwrap();
        assert!(matches!(session, SignUpBody::Session(_)));
    }
}
