use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use tracing::debug;

use painter_types::api::{PaintingResponse, SavePaintingRequest, StatusResponse};

use crate::auth::AppState;
use crate::error::{ApiError, run_blocking};
use crate::repository::NewPainting;

pub const DEFAULT_TITLE: &str = "New Painting";
pub const EMPTY_SHAPES: &str = "[]";

/// Returns the user's painting, or a blank one if nothing has been saved.
/// An unknown user looks the same as a user with no painting.
pub async fn get_painting(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Result<Json<PaintingResponse>, ApiError> {
    let Path(user_id) = user_id.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let paintings = state.paintings.clone();
    let painting = run_blocking(move || paintings.find_by_user_id(user_id)).await?;

    let response = match painting {
        Some(p) => PaintingResponse { title: p.title, shapes_data: p.shapes_data },
        None => {
            debug!("No painting stored for user {}", user_id);
            PaintingResponse {
                title: DEFAULT_TITLE.to_string(),
                shapes_data: EMPTY_SHAPES.to_string(),
            }
        }
    };

    Ok(Json(response))
}

pub async fn save_painting(
    State(state): State<AppState>,
    payload: Result<Json<SavePaintingRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let painting = validate_save_request(req)?;

    let paintings = state.paintings.clone();
    let saved = run_blocking(move || paintings.save(&painting)).await?;

    debug!(
        "Saved painting {} for user {} ({} bytes of shapes)",
        saved.id,
        saved.user_id,
        saved.shapes_data.len()
    );

    Ok(Json(StatusResponse::ok("Painting saved successfully")))
}

/// Title and shapes are opaque; only presence is checked. `userId` must be
/// an integer, given as a number or a numeric string.
fn validate_save_request(req: SavePaintingRequest) -> Result<NewPainting, ApiError> {
    let user_id = req
        .user_id
        .ok_or_else(|| ApiError::BadRequest("Missing field: userId".into()))?;
    let user_id = user_id
        .as_i64()
        .ok_or_else(|| ApiError::BadRequest("userId must be an integer".into()))?;
    let title = req
        .title
        .ok_or_else(|| ApiError::BadRequest("Missing field: title".into()))?;
    let shapes_data = req
        .shapes_data
        .ok_or_else(|| ApiError::BadRequest("Missing field: shapesData".into()))?;

    Ok(NewPainting { user_id, title, shapes_data })
}
