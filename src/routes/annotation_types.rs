//! Annotation-type catalog API routes

use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use sqlx::SqlitePool;

use crate::db::{AnnotationTypeRepository, CreateAnnotationType};
use crate::error::{AppError, Result};
use crate::highlight::StoredAnnotationType;
use crate::state::AppState;

/// Extended state with database pool
#[derive(Clone)]
pub struct AnnotationTypesState {
    pub pool: SqlitePool,
}

/// Create the annotation-types router
pub fn router(pool: SqlitePool) -> Router<AppState> {
    let state = AnnotationTypesState { pool };

    Router::new()
        .route("/owner/:owner_id", get(list_owner_types))
        .route("/owner/:owner_id", post(create_type))
        .route("/:id", get(get_type))
        .route("/:id", delete(delete_type))
        .layer(axum::Extension(state))
}

/// List annotation types for an owner
async fn list_owner_types(
    axum::Extension(state): axum::Extension<AnnotationTypesState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<StoredAnnotationType>>> {
    let repo = AnnotationTypeRepository::new(&state.pool);
    let types = repo.list_for_owner(&owner_id).await?;
    Ok(Json(types))
}

/// Create a new annotation type
async fn create_type(
    axum::Extension(state): axum::Extension<AnnotationTypesState>,
    Path(owner_id): Path<String>,
    Json(data): Json<CreateAnnotationType>,
) -> Result<(StatusCode, Json<StoredAnnotationType>)> {
    if data.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name must not be empty".to_string()));
    }

    let repo = AnnotationTypeRepository::new(&state.pool);
    let annotation_type = repo.create(&owner_id, &data).await?;
    Ok((StatusCode::CREATED, Json(annotation_type)))
}

/// Get a specific annotation type
async fn get_type(
    axum::Extension(state): axum::Extension<AnnotationTypesState>,
    Path(id): Path<String>,
) -> Result<Json<StoredAnnotationType>> {
    let repo = AnnotationTypeRepository::new(&state.pool);
    let annotation_type = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Annotation type not found: {}", id)))?;
    Ok(Json(annotation_type))
}

/// Delete an annotation type
async fn delete_type(
    axum::Extension(state): axum::Extension<AnnotationTypesState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let repo = AnnotationTypeRepository::new(&state.pool);
    let deleted = repo.delete(&id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Annotation type not found: {}", id)))
    }
}
