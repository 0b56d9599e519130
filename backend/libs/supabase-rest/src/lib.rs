//! Client for a hosted backend-as-a-service
//!
//! Two surfaces are covered:
//! - the table API (`/rest/v1`, PostgREST dialect): select with filters,
//!   ordering, limits and exact counts; insert; update; delete
//! - the auth API (`/auth/v1`, GoTrue dialect): sign-up, password sign-in,
//!   PKCE code exchange, user lookup, sign-out
//!
//! The client holds no session state of its own. Callers bind a session's
//! access token explicitly with [`SupabaseClient::with_access_token`].

pub mod auth;
pub mod client;
pub mod error;
pub mod query;

pub use auth::{AuthUser, Pkce, Session, SignUpOutcome};
pub use client::SupabaseClient;
pub use error::{Result, SupabaseError};
pub use query::{Filter, Order, SelectQuery};
