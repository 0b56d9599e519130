//! Request-level session handling.

pub mod session;

pub use session::{clear_cookie, session_cookie, verifier_cookie, SESSION_COOKIE, VERIFIER_COOKIE};
