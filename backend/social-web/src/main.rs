use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use social_web::{AppState, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,social_web=debug,actix_web=info".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting social-web");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: env={}, port={}, backend={}",
        config.app.env, config.app.port, config.supabase.url
    );

    let state = web::Data::new(AppState::new(&config).context("Failed to build backend client")?);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    info!("HTTP server listening on {}", bind_address);

    let allowed_origins = config.app.cors_allowed_origins.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(social_web::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    Ok(())
}
