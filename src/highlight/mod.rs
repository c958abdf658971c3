//! Highlight engine
//!
//! Pure, render-agnostic computation over annotated essay text:
//!
//! - Segmentation: partition a text into plain runs and maximal runs whose
//!   covering annotation set is identical, given possibly-overlapping
//!   character-range annotations
//! - Selection mapping: recover `(start, end)` character offsets for a user
//!   selection made against the fragment-rendered text
//! - Interaction state: the explicit session struct for the annotate and
//!   view popover flows
//!
//! The engine never throws for malformed annotation data (degenerate
//! ranges are skipped, unknown types fall back to a neutral color); the
//! one operation that can genuinely fail, selection mapping, reports it
//! through an `Option` return.

mod engine;
mod selection;
mod session;
mod types;

pub use engine::compute_segments;
pub use selection::map_selection_to_offsets;
pub use session::{AnnotateSession, SessionPhase};
pub use types::{
    Annotation, AnnotationType, CreateAnnotation, SegmentItem, Selection, StoredAnnotation,
    StoredAnnotationType, TypeCatalog, FALLBACK_COLOR,
};

pub(crate) use types::now_rfc3339;
