use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};

use crate::AppState;

/// Count a request to the static file server.
pub async fn count_hit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}

pub async fn report(State(state): State<AppState>) -> impl IntoResponse {
    let hits = state.hits.load(Ordering::Relaxed);
    Html(format!(
        "<html>\n\n<body>\n\t<h1>Welcome, Chirpy Admin</h1>\n\t<p>Chirpy has been visited {} times!</p>\n</body>\n\n</html>\n",
        hits
    ))
}

pub async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    state.hits.store(0, Ordering::Relaxed);
    (StatusCode::OK, "Hits reset to 0")
}
