//! Annotation and segment types for the highlight engine.
//!
//! Offsets are character offsets (Unicode scalar values) into the original
//! essay text, half-open `[start, end)`. Annotations carry a reference to
//! their type by id, never an inline copy, so type edits propagate without
//! touching stored annotations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Background color used when an annotation references a type that is
/// missing from the catalog.
pub const FALLBACK_COLOR: &str = "transparent";

/// A typed inline comment attached to a character range of an essay response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Unique identifier (UUID), assigned at creation, never reused
    pub id: String,
    /// Start character offset (inclusive)
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// Reference into the annotation-type catalog
    #[serde(rename = "typeId")]
    pub type_id: String,
    /// Author-supplied comment text
    pub comment: String,
}

impl Annotation {
    /// Construct a new annotation over a validated selection.
    ///
    /// This only builds the value object; persistence is the caller's job,
    /// and previously computed segments are never patched in place. Callers
    /// recompute segments from the full updated list once the store confirms.
    pub fn from_selection(selection: &Selection, type_id: &str, comment: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start: selection.start,
            end: selection.end,
            type_id: type_id.to_string(),
            comment: comment.to_string(),
        }
    }

    /// Whether the range is well-formed against a text of `len` characters.
    pub fn is_valid_for(&self, len: usize) -> bool {
        self.start < self.end && self.start < len
    }
}

/// A named, colored annotation category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationType {
    pub id: String,
    /// Display label
    pub name: String,
    /// CSS color value used as the segment background
    pub color: String,
}

/// Read-mostly lookup table of annotation types keyed by id.
///
/// Missing ids resolve to [`FALLBACK_COLOR`] and no name rather than an
/// error, because annotations arrive from a remote store the engine cannot
/// assume is perfectly consistent with the catalog.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, AnnotationType>,
}

impl TypeCatalog {
    pub fn new(types: impl IntoIterator<Item = AnnotationType>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    pub fn get(&self, type_id: &str) -> Option<&AnnotationType> {
        self.types.get(type_id)
    }

    /// Color for a type id, falling back to the documented default.
    pub fn color_for(&self, type_id: &str) -> &str {
        self.types
            .get(type_id)
            .map(|t| t.color.as_str())
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Display name for a type id, absent when the type is unknown.
    pub fn name_for(&self, type_id: &str) -> Option<&str> {
        self.types.get(type_id).map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// One item of the segmented output: either a plain run of text or a run
/// covered by one or more annotations.
///
/// The output of segmentation is always a partition of the input text,
/// in order, with no gaps or overlaps, even though the input annotations
/// may overlap arbitrarily.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SegmentItem {
    /// Text outside every annotation range
    Plain { text: String },
    /// Maximal run whose covering annotation set is identical throughout
    Segment {
        text: String,
        /// Covering annotations in original list order (first-wins for color)
        #[serde(rename = "coveringAnnotations")]
        covering: Vec<Annotation>,
    },
}

impl SegmentItem {
    pub fn text(&self) -> &str {
        match self {
            SegmentItem::Plain { text } => text,
            SegmentItem::Segment { text, .. } => text,
        }
    }

    /// Covering annotations, empty for plain runs.
    pub fn covering(&self) -> &[Annotation] {
        match self {
            SegmentItem::Plain { .. } => &[],
            SegmentItem::Segment { covering, .. } => covering,
        }
    }

    /// Number of annotations covering this item, for a "multiple comments"
    /// badge on the caller's side.
    pub fn annotation_count(&self) -> usize {
        self.covering().len()
    }

    /// Background color for the run: the first covering annotation's type
    /// color in original list order. First-wins is a documented tie-break,
    /// not an error; true multi-color rendering of one span is out of scope.
    pub fn color<'a>(&'a self, catalog: &'a TypeCatalog) -> &'a str {
        match self.covering().first() {
            Some(a) => catalog.color_for(&a.type_id),
            None => FALLBACK_COLOR,
        }
    }
}

/// A transient user-made text selection with recovered character offsets.
///
/// `text` is always the exact substring `source[start..end]` by the time a
/// `Selection` exists; construction goes through offset mapping, which
/// validates exactly that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Wire shape for creating an annotation against a response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnotation {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "typeId")]
    pub type_id: String,
    pub comment: String,
}

/// Stored annotation row enriched with ownership and timestamps.
///
/// The engine itself only consumes the range/type/comment shape; the
/// response id and timestamps belong to the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredAnnotation {
    pub id: String,
    #[serde(rename = "responseId")]
    pub response_id: String,
    #[serde(rename = "start")]
    pub start_pos: i64,
    #[serde(rename = "end")]
    pub end_pos: i64,
    #[serde(rename = "typeId")]
    pub type_id: String,
    pub comment: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl StoredAnnotation {
    /// Project down to the shape the engine computes with.
    pub fn to_annotation(&self) -> Annotation {
        Annotation {
            id: self.id.clone(),
            start: self.start_pos.max(0) as usize,
            end: self.end_pos.max(0) as usize,
            type_id: self.type_id.clone(),
            comment: self.comment.clone(),
        }
    }
}

/// Stored annotation-type row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredAnnotationType {
    pub id: String,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    pub name: String,
    pub color: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl StoredAnnotationType {
    pub fn to_annotation_type(&self) -> AnnotationType {
        AnnotationType {
            id: self.id.clone(),
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// Helper for repository timestamps.
pub(crate) fn now_rfc3339() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new([AnnotationType {
            id: "grammar".to_string(),
            name: "Grammar".to_string(),
            color: "#ffd54f".to_string(),
        }])
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.color_for("grammar"), "#ffd54f");
        assert_eq!(catalog.name_for("grammar"), Some("Grammar"));
    }

    #[test]
    fn test_catalog_missing_type_falls_back() {
        let catalog = catalog();
        assert_eq!(catalog.color_for("ghost"), FALLBACK_COLOR);
        assert_eq!(catalog.name_for("ghost"), None);
    }

    #[test]
    fn test_annotation_from_selection() {
        let selection = Selection {
            text: "quick".to_string(),
            start: 4,
            end: 9,
        };
        let a = Annotation::from_selection(&selection, "grammar", "tighten this");
        assert_eq!(a.start, 4);
        assert_eq!(a.end, 9);
        assert_eq!(a.type_id, "grammar");
        assert!(!a.id.is_empty());

        let b = Annotation::from_selection(&selection, "grammar", "tighten this");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_annotation_validity() {
        let a = Annotation {
            id: "1".to_string(),
            start: 5,
            end: 5,
            type_id: "t".to_string(),
            comment: String::new(),
        };
        assert!(!a.is_valid_for(10));

        let b = Annotation { start: 2, end: 6, ..a.clone() };
        assert!(b.is_valid_for(10));
        // Starts past the end of the text
        assert!(!b.is_valid_for(2));
    }

    #[test]
    fn test_segment_serialization_shape() {
        let item = SegmentItem::Plain {
            text: "hello".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "plain");
        assert_eq!(json["text"], "hello");
    }
}
