use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{AppState, auth, chirps, metrics, users, webhooks};

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let files = Router::new()
        .nest_service("/app", ServeDir::new(static_dir))
        .layer(middleware::from_fn_with_state(state.clone(), metrics::count_hit));

    Router::new()
        .route("/api/healthz", get(readiness))
        .route("/api/reset", get(metrics::reset))
        .route("/admin/metrics", get(metrics::report))
        .route("/api/users", post(users::create_user).put(users::update_user))
        .route("/api/login", post(auth::login))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/revoke", post(auth::revoke))
        .route("/api/chirps", get(chirps::list_chirps).post(chirps::create_chirp))
        .route(
            "/api/chirps/{chirp_id}",
            get(chirps::get_chirp).delete(chirps::delete_chirp),
        )
        .route("/api/polka/webhooks", post(webhooks::polka))
        .with_state(state)
        .merge(files)
}

async fn readiness() -> &'static str {
    "OK"
}
