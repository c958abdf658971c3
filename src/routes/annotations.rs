//! Annotations API routes

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use sqlx::SqlitePool;

use crate::db::AnnotationRepository;
use crate::error::{AppError, Result};
use crate::highlight::{CreateAnnotation, StoredAnnotation};
use crate::state::AppState;

/// Extended state with database pool
#[derive(Clone)]
pub struct AnnotationsState {
    pub pool: SqlitePool,
}

/// Create the annotations router
pub fn router(pool: SqlitePool) -> Router<AppState> {
    let state = AnnotationsState { pool };

    Router::new()
        .route("/response/:response_id", get(list_response_annotations))
        .route("/response/:response_id", post(create_annotation))
        .route("/response/:response_id", delete(delete_response_annotations))
        .route("/response/:response_id/count", get(count_annotations))
        .route("/:id", get(get_annotation))
        .route("/:id", delete(delete_annotation))
        .layer(axum::Extension(state))
}

/// List annotations for an essay response
async fn list_response_annotations(
    axum::Extension(state): axum::Extension<AnnotationsState>,
    Path(response_id): Path<String>,
) -> Result<Json<Vec<StoredAnnotation>>> {
    let repo = AnnotationRepository::new(&state.pool);
    let annotations = repo.list_for_response(&response_id).await?;
    Ok(Json(annotations))
}

/// Create a new annotation on a response
///
/// Range validity and a non-empty comment are checked here, at the store
/// boundary. The engine itself never rejects malformed stored data, it
/// degrades at render time; this keeps new bad rows out in the first place.
async fn create_annotation(
    axum::Extension(state): axum::Extension<AnnotationsState>,
    Path(response_id): Path<String>,
    Json(data): Json<CreateAnnotation>,
) -> Result<(StatusCode, Json<StoredAnnotation>)> {
    if data.comment.trim().is_empty() {
        return Err(AppError::BadRequest("Comment must not be empty".to_string()));
    }
    if data.start >= data.end {
        return Err(AppError::BadRequest(format!(
            "Invalid range: start {} must be before end {}",
            data.start, data.end
        )));
    }

    let repo = AnnotationRepository::new(&state.pool);
    let annotation = repo.create(&response_id, &data).await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

/// Get a specific annotation
async fn get_annotation(
    axum::Extension(state): axum::Extension<AnnotationsState>,
    Path(id): Path<String>,
) -> Result<Json<StoredAnnotation>> {
    let repo = AnnotationRepository::new(&state.pool);
    let annotation = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Annotation not found: {}", id)))?;
    Ok(Json(annotation))
}

/// Delete an annotation
async fn delete_annotation(
    axum::Extension(state): axum::Extension<AnnotationsState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let repo = AnnotationRepository::new(&state.pool);
    let deleted = repo.delete(&id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Annotation not found: {}", id)))
    }
}

/// Delete all annotations for a response
async fn delete_response_annotations(
    axum::Extension(state): axum::Extension<AnnotationsState>,
    Path(response_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let repo = AnnotationRepository::new(&state.pool);
    let deleted = repo.delete_for_response(&response_id).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

/// Count annotations for a response
async fn count_annotations(
    axum::Extension(state): axum::Extension<AnnotationsState>,
    Path(response_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let repo = AnnotationRepository::new(&state.pool);
    let count = repo.count_for_response(&response_id).await?;
    Ok(Json(serde_json::json!({ "count": count })))
}
