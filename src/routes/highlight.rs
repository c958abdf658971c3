//! Highlight computation API routes
//!
//! Stateless endpoints over the pure engine functions, for callers that
//! want segmentation or selection mapping done server-side.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::highlight::{
    compute_segments, map_selection_to_offsets, Annotation, AnnotationType, SegmentItem, Selection,
    TypeCatalog,
};
use crate::state::AppState;

/// Create the highlight router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/segments", post(segments))
        .route("/selection-map", post(selection_map))
}

#[derive(Debug, Deserialize)]
pub struct SegmentsRequest {
    pub text: String,
    pub annotations: Vec<Annotation>,
    /// Type catalog for color resolution; unknown ids fall back
    #[serde(default)]
    pub types: Vec<AnnotationType>,
}

/// One rendered segment: the engine item plus resolved presentation fields
#[derive(Debug, Serialize)]
pub struct SegmentView {
    #[serde(flatten)]
    pub item: SegmentItem,
    /// Background color (first covering annotation's type, first-wins)
    pub color: String,
    /// Covering-annotation count, for a "multiple comments" badge
    #[serde(rename = "annotationCount")]
    pub annotation_count: usize,
}

/// Partition text into plain and highlighted segments
async fn segments(Json(request): Json<SegmentsRequest>) -> Result<Json<Vec<SegmentView>>> {
    let catalog = TypeCatalog::new(request.types);
    let views = compute_segments(&request.text, &request.annotations)
        .into_iter()
        .map(|item| SegmentView {
            color: item.color(&catalog).to_string(),
            annotation_count: item.annotation_count(),
            item,
        })
        .collect();

    Ok(Json(views))
}

#[derive(Debug, Deserialize)]
pub struct SelectionMapRequest {
    #[serde(rename = "selectedText")]
    pub selected_text: String,
    #[serde(rename = "precedingText")]
    pub preceding_text: String,
    #[serde(rename = "sourceText")]
    pub source_text: String,
}

/// Recover character offsets for a user text selection
///
/// A mapping failure is a 404: a normal outcome the caller handles by not
/// opening the annotate affordance, not a server fault.
async fn selection_map(Json(request): Json<SelectionMapRequest>) -> Result<Json<Selection>> {
    map_selection_to_offsets(
        &request.selected_text,
        &request.preceding_text,
        &request.source_text,
    )
    .map(Json)
    .ok_or_else(|| AppError::NotFound("Could not determine selection position".to_string()))
}
