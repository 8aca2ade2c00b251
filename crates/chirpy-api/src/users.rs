use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use chirpy_types::api::{CredentialsRequest, UserResponse};

use crate::middleware::AuthUser;
use crate::{ApiError, AppState, blocking};

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(move || Ok(state.store.create_user(&req.email, &req.password)?)).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Change the caller's own email and password.
pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = blocking(move || Ok(state.store.update_user(&req.email, &req.password, caller.id)?))
        .await?;

    Ok(Json(UserResponse::from(user)))
}
