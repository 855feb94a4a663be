use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use painter_db::Database;
use painter_types::api::{LoginRequest, LoginResponse};

use crate::error::{ApiError, run_blocking};
use crate::repository::{PaintingRepository, UserRepository};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub users: UserRepository,
    pub paintings: PaintingRepository,
}

impl AppStateInner {
    /// Build the handler state with both repositories sharing one database.
    pub fn new(db: Arc<Database>) -> AppState {
        Arc::new(Self {
            users: UserRepository::new(db.clone()),
            paintings: PaintingRepository::new(db),
        })
    }
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let users = state.users.clone();
    let username = req.username.clone();
    let user = run_blocking(move || users.find_by_credentials(&req.username, &req.password))
        .await?
        .ok_or_else(|| {
            info!("Rejected login for '{}'", username);
            ApiError::AuthenticationFailed
        })?;

    info!("User '{}' logged in", user.username);

    Ok(Json(LoginResponse {
        success: true,
        user_id: user.id,
        username: user.username,
    }))
}
