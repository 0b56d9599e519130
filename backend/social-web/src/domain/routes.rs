//! Page paths of the site. These are navigation contracts only; the JSON
//! views served on them live in `handlers`.

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Sign-in page
    Login,
    Home,
    /// The signed-in user's own profile
    Profile,
    /// Someone else's profile
    ProfileViewer(Uuid),
    Account,
    AuthCallback,
}

impl Route {
    /// Where a click on `target`'s name leads for `viewer`
    pub fn for_profile(viewer: Uuid, target: Uuid) -> Self {
        if viewer == target {
            Route::Profile
        } else {
            Route::ProfileViewer(target)
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Login => write!(f, "/"),
            Route::Home => write!(f, "/home"),
            Route::Profile => write!(f, "/profile"),
            Route::ProfileViewer(id) => write!(f, "/profile_viewer?userId={}", id),
            Route::Account => write!(f, "/account"),
            Route::AuthCallback => write!(f, "/auth/callback"),
        }
    }
}

impl serde::Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
