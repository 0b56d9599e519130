/// Social Web Library
///
/// Backend-for-frontend of the SocialCraze site. All data lives in a hosted
/// backend (table API plus auth API); this crate adds the interaction logic
/// and serves JSON views on the site's page paths.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `services`: feed, post, composer, follow, search and session logic
/// - `repository`: table access through `SocialStore`
/// - `domain`: row types and page routes
/// - `middleware`: session cookie extraction
/// - `error`: error types and handling
/// - `config`: configuration management
use actix_web::{web, HttpResponse};

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "social-web",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Register every route of the site
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        // Auth
        .route("/", web::post().to(handlers::sign_in))
        .route("/signup", web::post().to(handlers::sign_up))
        .route("/signout", web::post().to(handlers::sign_out))
        .route("/auth/callback", web::get().to(handlers::auth_callback))
        // Feed
        .service(
            web::scope("/home")
                .route("", web::get().to(handlers::get_home))
                .route("/posts", web::post().to(handlers::create_post)),
        )
        // Post interactions
        .service(
            web::scope("/posts/{post_id}")
                .route("/likes", web::get().to(handlers::get_likes))
                .route("/like", web::post().to(handlers::toggle_like))
                .service(
                    web::resource("/comments")
                        .route(web::get().to(handlers::get_comments))
                        .route(web::post().to(handlers::create_comment)),
                ),
        )
        // Profiles
        .route("/profile", web::get().to(handlers::get_own_profile))
        .route("/profile_viewer", web::get().to(handlers::get_profile_viewer))
        .route(
            "/profile_viewer/follow",
            web::post().to(handlers::toggle_follow),
        )
        .route("/account", web::get().to(handlers::get_account))
        .route("/search", web::get().to(handlers::search_profiles));
}
