//! Interaction state for the annotate flow.
//!
//! The glue state around the pure functions: which segment's popover is
//! open, and whether a selection is pending type-and-comment input. This is
//! explicit caller-owned state rather than ambient globals, passed to
//! whatever hosts the rendered text.
//!
//! Two parallel paths out of `Idle`:
//!
//! ```text
//! Idle -> Selecting -> AwaitingTypeAndComment -> (submit | cancel) -> Idle
//! Idle -> ViewingExisting -> Idle
//! ```
//!
//! A failed offset mapping silently returns the session to `Idle`: no
//! partial state, no annotation constructed, no dialog opened.

use super::selection::map_selection_to_offsets;
use super::types::{Annotation, Selection};

/// Where the user is in the annotate interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Pointer is down, selection in progress
    Selecting,
    /// Offsets recovered, waiting for the user to pick a type and comment
    AwaitingTypeAndComment,
    /// Popover open over an existing segment (read-only; edits go through
    /// the store by id, never inline)
    ViewingExisting,
}

/// Caller-owned interaction state for one rendered response.
#[derive(Debug, Clone, Default)]
pub struct AnnotateSession {
    phase: SessionPhase,
    /// Selection awaiting type and comment, if any
    pending_selection: Option<Selection>,
    /// Index of the segment whose popover is open, if any
    open_segment: Option<usize>,
}

impl AnnotateSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn pending_selection(&self) -> Option<&Selection> {
        self.pending_selection.as_ref()
    }

    pub fn open_segment(&self) -> Option<usize> {
        self.open_segment
    }

    /// The user started selecting text. Closes any open popover.
    pub fn begin_selection(&mut self) {
        self.open_segment = None;
        self.pending_selection = None;
        self.phase = SessionPhase::Selecting;
    }

    /// The user released a selection. Recovers offsets against the source
    /// text; on success the session waits for a type and comment, on
    /// failure it falls back to idle without surfacing an error.
    pub fn finish_selection(
        &mut self,
        selected_text: &str,
        preceding_text: &str,
        source_text: &str,
    ) -> Option<&Selection> {
        match map_selection_to_offsets(selected_text, preceding_text, source_text) {
            Some(selection) => {
                self.pending_selection = Some(selection);
                self.phase = SessionPhase::AwaitingTypeAndComment;
                self.pending_selection.as_ref()
            }
            None => {
                tracing::debug!("could not determine selection position, aborting annotate flow");
                self.reset();
                None
            }
        }
    }

    /// The user confirmed a type and comment for the pending selection.
    ///
    /// Returns the constructed annotation for the caller to hand to the
    /// store; the session returns to idle either way. Nothing here mutates
    /// a previously computed segment list, the caller re-segments once the
    /// store confirms the create.
    pub fn submit(&mut self, type_id: &str, comment: &str) -> Option<Annotation> {
        let selection = self.pending_selection.take()?;
        self.reset();
        Some(Annotation::from_selection(&selection, type_id, comment))
    }

    /// The user dismissed the type-and-comment input.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// The user clicked an already-rendered segment.
    pub fn view_segment(&mut self, segment_index: usize) {
        self.pending_selection = None;
        self.open_segment = Some(segment_index);
        self.phase = SessionPhase::ViewingExisting;
    }

    /// The user closed the segment popover.
    pub fn close_view(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.phase = SessionPhase::Idle;
        self.pending_selection = None;
        self.open_segment = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "The quick fox jumps";

    #[test]
    fn test_create_flow() {
        let mut session = AnnotateSession::new();
        assert_eq!(*session.phase(), SessionPhase::Idle);

        session.begin_selection();
        assert_eq!(*session.phase(), SessionPhase::Selecting);

        let selection = session.finish_selection("fox", "The quick ", SOURCE).unwrap();
        assert_eq!((selection.start, selection.end), (10, 13));
        assert_eq!(*session.phase(), SessionPhase::AwaitingTypeAndComment);

        let annotation = session.submit("grammar", "nice word").unwrap();
        assert_eq!(annotation.start, 10);
        assert_eq!(annotation.end, 13);
        assert_eq!(annotation.type_id, "grammar");
        assert_eq!(*session.phase(), SessionPhase::Idle);
        assert!(session.pending_selection().is_none());
    }

    #[test]
    fn test_failed_mapping_aborts_silently() {
        let mut session = AnnotateSession::new();
        session.begin_selection();

        assert!(session.finish_selection("wolf", "The quick ", SOURCE).is_none());
        assert_eq!(*session.phase(), SessionPhase::Idle);
        assert!(session.pending_selection().is_none());
        // No pending selection means nothing to submit
        assert!(session.submit("grammar", "comment").is_none());
    }

    #[test]
    fn test_cancel_discards_pending_selection() {
        let mut session = AnnotateSession::new();
        session.begin_selection();
        session.finish_selection("fox", "The quick ", SOURCE).unwrap();

        session.cancel();
        assert_eq!(*session.phase(), SessionPhase::Idle);
        assert!(session.submit("grammar", "comment").is_none());
    }

    #[test]
    fn test_view_flow_is_separate() {
        let mut session = AnnotateSession::new();
        session.view_segment(2);
        assert_eq!(*session.phase(), SessionPhase::ViewingExisting);
        assert_eq!(session.open_segment(), Some(2));

        session.close_view();
        assert_eq!(*session.phase(), SessionPhase::Idle);
        assert_eq!(session.open_segment(), None);
    }

    #[test]
    fn test_new_selection_closes_open_popover() {
        let mut session = AnnotateSession::new();
        session.view_segment(0);
        session.begin_selection();
        assert_eq!(session.open_segment(), None);
        assert_eq!(*session.phase(), SessionPhase::Selecting);
    }
}
