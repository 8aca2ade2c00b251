use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use chirpy_types::api::{ChirpQuery, ChirpResponse, CreateChirpRequest, SortOrder};
use chirpy_types::{Id, MAX_CHIRP_LENGTH};

use crate::middleware::AuthUser;
use crate::moderation::clean_body;
use crate::{ApiError, AppState, blocking};

pub async fn create_chirp(
    State(state): State<AppState>,
    author: AuthUser,
    Json(req): Json<CreateChirpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ApiError::BadRequest("Chirp is too long".into()));
    }
    let body = clean_body(&req.body);

    let chirp = blocking(move || Ok(state.store.create_chirp(&body, author.id)?)).await?;

    Ok((StatusCode::CREATED, Json(ChirpResponse::from(chirp))))
}

/// List chirps, optionally for one author, ordered by id.
pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ChirpQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let author_id = match query.author_id.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<Id>()
                .map_err(|_| ApiError::BadRequest("invalid author_id".into()))?,
        ),
    };

    let mut chirps: Vec<ChirpResponse> = blocking(move || Ok(state.store.get_chirps()))
        .await?
        .into_iter()
        .filter(|chirp| author_id.is_none_or(|id| chirp.author_id == id))
        .map(ChirpResponse::from)
        .collect();

    // The store yields ascending ids already.
    if query.sort == SortOrder::Desc {
        chirps.reverse();
    }

    debug!("Listing {} chirps", chirps.len());
    Ok(Json(chirps))
}

pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<Id>,
) -> Result<impl IntoResponse, ApiError> {
    let chirp = blocking(move || Ok(state.store.get_chirp(chirp_id)?)).await?;
    Ok(Json(ChirpResponse::from(chirp)))
}

/// Delete a chirp. Only its author may do so: anyone else gets 403, an
/// unknown id 404.
pub async fn delete_chirp(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(chirp_id): Path<Id>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(move || Ok(state.store.delete_chirp(chirp_id, caller.id)?)).await?;
    Ok(StatusCode::NO_CONTENT)
}
