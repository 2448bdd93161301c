use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Extension, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;
mod validation;

use middleware::{BruteForceConfig, LoginAttemptTracker};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Flux API in {:?} mode", config.environment);

    // Best effort: a missing database should not keep the server from
    // starting, health reports degraded until it comes back
    if let Err(e) = database::manager::DatabaseManager::migrate().await {
        tracing::warn!("migrations not applied at startup: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("FLUX_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Flux API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let tracker = Arc::new(LoginAttemptTracker::new(BruteForceConfig::from(
        &config::config().security.brute_force,
    )));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_public_routes(tracker))
        // Protected API
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes(tracker: Arc<LoginAttemptTracker>) -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
        .layer(Extension(tracker))
}

fn protected_routes() -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(post_routes())
        .merge(user_routes())
        .merge(dashboard_routes())
        .layer(axum_middleware::from_fn(middleware::jwt_auth_middleware))
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::auth;

    Router::new()
        .route("/api/auth/me", get(auth::me_get))
        .route("/api/auth/logout", post(auth::logout_post))
}

fn post_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::posts;

    Router::new()
        // Collection operations
        .route("/api/posts", get(posts::post_list).post(posts::post_create))
        // Tag index (static segment wins over the :slug capture)
        .route("/api/posts/tags/all", get(posts::tag_list))
        // Single-post operations, addressed by slug
        .route(
            "/api/posts/:slug",
            get(posts::post_get)
                .patch(posts::post_update)
                .delete(posts::post_delete),
        )
        .route(
            "/api/posts/:slug/favorite",
            post(posts::favorite_post).delete(posts::unfavorite_post),
        )
}

fn user_routes() -> Router {
    use axum::routing::delete;
    use handlers::protected::user;

    Router::new()
        .route(
            "/api/user/profile",
            get(user::profile_get).patch(user::profile_patch),
        )
        .route("/api/user/account", delete(user::account_delete))
}

fn dashboard_routes() -> Router {
    use handlers::protected::dashboard;

    Router::new()
        .route("/api/dashboard/stats", get(dashboard::stats_get))
        .route("/api/dashboard/activity", get(dashboard::activity_get))
        .route("/api/dashboard/overview", get(dashboard::overview_get))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Flux API",
            "version": version,
            "description": "REST backend with email/password auth, posts, tagging and dashboards",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/register, /auth/login (public - token acquisition)",
                "auth": "/api/auth/me, /api/auth/logout (protected)",
                "posts": "/api/posts[/:slug], /api/posts/:slug/favorite, /api/posts/tags/all (protected)",
                "user": "/api/user/profile, /api/user/account (protected)",
                "dashboard": "/api/dashboard/{stats,activity,overview} (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
