use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    db::user::{login, register},
    errors::AppError,
    http::extract::ValidatedJson,
    models::user::LoginResponse,
    state::AppState,
};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    match register(&payload.email, &payload.password, state.store.clone(), &state.jwt).await {
        Ok(response) => Ok(Json(response)),
        // A taken email is reported as a plain bad request on this route.
        Err(AppError::Conflict(msg)) => {
            tracing::info!("Registration rejected: {}", msg);
            Err((StatusCode::BAD_REQUEST, msg))
        }
        Err(err) => {
            tracing::error!("Error registering user: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    login(&payload.email, &payload.password, state.store.clone(), &state.jwt)
        .await
        .map(Json)
        .map_err(|err| {
            tracing::warn!("Login failed: {}", err);
            err.to_response()
        })
}

/// Tokens are stateless, so there is nothing to revoke server-side.
pub async fn logout_handler() -> Json<Value> {
    Json(json!({ "message": "Successfully logged out" }))
}
