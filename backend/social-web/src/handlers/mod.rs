/// HTTP handlers
///
/// JSON views served on the page paths of the site:
/// - auth: sign-in, sign-up, sign-out and the email callback
/// - feed: home feed and post composer
/// - posts: likes and comments of one post
/// - profile: own profile, other profiles, follow toggle, account
/// - search: profile search
pub mod auth;
pub mod feed;
pub mod posts;
pub mod profile;
pub mod search;

pub use auth::{auth_callback, sign_in, sign_out, sign_up};
pub use feed::{create_post, get_home};
pub use posts::{create_comment, get_comments, get_likes, toggle_like};
pub use profile::{get_account, get_own_profile, get_profile_viewer, toggle_follow};
pub use search::search_profiles;
