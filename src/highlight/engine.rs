//! Text segmentation over possibly-overlapping annotations.
//!
//! Given an essay text and a set of character-range annotations, computes
//! the ordered partition of the text into plain runs and maximal runs whose
//! covering annotation set is identical throughout. The computation is a
//! pure function: identical `(text, annotations)` always yields identical
//! segments, regardless of input annotation order.

use super::types::{Annotation, SegmentItem};

/// Partition `text` into plain and annotated runs.
///
/// Annotations may overlap arbitrarily; the output never does. Positions
/// covered by exactly `{A, B}` are always grouped together and never merged
/// with positions covered by `{A}` or `{A, B, C}`.
///
/// Malformed annotations degrade gracefully rather than corrupting the
/// rest of the text: `start >= end` or a start past the end of the text
/// drops the annotation, an end past the text clamps to the text length.
pub fn compute_segments(text: &str, annotations: &[Annotation]) -> Vec<SegmentItem> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    if len == 0 {
        return vec![SegmentItem::Plain {
            text: String::new(),
        }];
    }

    // Indices into `annotations` of the ranges that survive validation,
    // kept in original list order so first-wins color holds downstream.
    let valid: Vec<usize> = annotations
        .iter()
        .enumerate()
        .filter_map(|(idx, a)| {
            if a.is_valid_for(len) {
                Some(idx)
            } else {
                tracing::debug!(
                    id = %a.id,
                    start = a.start,
                    end = a.end,
                    "skipping annotation with degenerate or out-of-range span"
                );
                None
            }
        })
        .collect();

    if valid.is_empty() {
        return vec![SegmentItem::Plain {
            text: text.to_string(),
        }];
    }

    // Coverage index: for every character position, which annotations cover
    // it. Pushing in list order means each position's vector is sorted by
    // original position in the list, so vector equality below is exactly
    // set equality with a canonical ordering.
    let mut covering_at: Vec<Vec<usize>> = vec![Vec::new(); len];
    for &idx in &valid {
        let a = &annotations[idx];
        let end = a.end.min(len);
        for slot in &mut covering_at[a.start..end] {
            slot.push(idx);
        }
    }

    // Collapse consecutive positions sharing the same covering set.
    let mut items = Vec::new();
    let mut run_start = 0usize;
    while run_start < len {
        let current = &covering_at[run_start];
        let mut run_end = run_start + 1;
        while run_end < len && covering_at[run_end] == *current {
            run_end += 1;
        }

        let run_text: String = chars[run_start..run_end].iter().collect();
        if current.is_empty() {
            items.push(SegmentItem::Plain { text: run_text });
        } else {
            items.push(SegmentItem::Segment {
                text: run_text,
                covering: current.iter().map(|&i| annotations[i].clone()).collect(),
            });
        }
        run_start = run_end;
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::types::{AnnotationType, TypeCatalog, FALLBACK_COLOR};

    fn ann(id: &str, start: usize, end: usize) -> Annotation {
        Annotation {
            id: id.to_string(),
            start,
            end,
            type_id: "A".to_string(),
            comment: "note".to_string(),
        }
    }

    fn ids(item: &SegmentItem) -> Vec<&str> {
        item.covering().iter().map(|a| a.id.as_str()).collect()
    }

    fn reassemble(items: &[SegmentItem]) -> String {
        items.iter().map(|i| i.text()).collect()
    }

    #[test]
    fn test_empty_text() {
        let items = compute_segments("", &[ann("1", 0, 3)]);
        assert_eq!(items, vec![SegmentItem::Plain { text: String::new() }]);
    }

    #[test]
    fn test_no_annotations() {
        let items = compute_segments("The quick fox", &[]);
        assert_eq!(
            items,
            vec![SegmentItem::Plain {
                text: "The quick fox".to_string()
            }]
        );
    }

    #[test]
    fn test_single_annotation() {
        let items = compute_segments("The quick fox", &[ann("1", 4, 9)]);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text(), "The ");
        assert_eq!(items[1].text(), "quick");
        assert_eq!(ids(&items[1]), vec!["1"]);
        assert_eq!(items[2].text(), " fox");
        assert!(items[0].covering().is_empty());
        assert!(items[2].covering().is_empty());
    }

    #[test]
    fn test_overlapping_annotations() {
        // [0,5) and [3,8) over "abcdefgh" -> abc{1}, de{1,2}, fgh{2}
        let items = compute_segments("abcdefgh", &[ann("1", 0, 5), ann("2", 3, 8)]);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text(), "abc");
        assert_eq!(ids(&items[0]), vec!["1"]);
        assert_eq!(items[1].text(), "de");
        assert_eq!(ids(&items[1]), vec!["1", "2"]);
        assert_eq!(items[2].text(), "fgh");
        assert_eq!(ids(&items[2]), vec!["2"]);
    }

    #[test]
    fn test_partition_property() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit";
        let annotations = vec![ann("1", 3, 20), ann("2", 10, 30), ann("3", 25, 40), ann("4", 0, 4)];
        let items = compute_segments(text, &annotations);
        assert_eq!(reassemble(&items), text);
    }

    #[test]
    fn test_determinism_under_shuffle() {
        let text = "Lorem ipsum dolor sit amet";
        let a = vec![ann("1", 2, 12), ann("2", 8, 20), ann("3", 15, 25)];
        let mut b = a.clone();
        b.reverse();

        let first = compute_segments(text, &a);
        let second = compute_segments(text, &b);

        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!(x.text(), y.text());
            let mut xi = ids(x);
            let mut yi = ids(y);
            xi.sort_unstable();
            yi.sort_unstable();
            assert_eq!(xi, yi);
        }
    }

    #[test]
    fn test_no_false_merge() {
        // Position 4 covered by {1}, position 5 by {1,2}: must split
        let items = compute_segments("abcdefgh", &[ann("1", 0, 8), ann("2", 5, 8)]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text(), "abcde");
        assert_eq!(ids(&items[0]), vec!["1"]);
        assert_eq!(items[1].text(), "fgh");
        assert_eq!(ids(&items[1]), vec!["1", "2"]);
    }

    #[test]
    fn test_degenerate_range_skipped() {
        let items = compute_segments("abcdefgh", &[ann("1", 5, 5), ann("2", 6, 2)]);
        assert_eq!(
            items,
            vec![SegmentItem::Plain {
                text: "abcdefgh".to_string()
            }]
        );
    }

    #[test]
    fn test_out_of_bounds_clamped() {
        // End past the text clamps; start past the text drops
        let items = compute_segments("abcde", &[ann("1", 3, 99), ann("2", 40, 50)]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text(), "abc");
        assert_eq!(items[1].text(), "de");
        assert_eq!(ids(&items[1]), vec!["1"]);
    }

    #[test]
    fn test_adjacent_annotations_stay_separate() {
        // [0,3) and [3,6): different covering sets, no shared positions
        let items = compute_segments("abcdef", &[ann("1", 0, 3), ann("2", 3, 6)]);
        assert_eq!(items.len(), 2);
        assert_eq!(ids(&items[0]), vec!["1"]);
        assert_eq!(ids(&items[1]), vec!["2"]);
    }

    #[test]
    fn test_annotation_covering_whole_text() {
        let items = compute_segments("abc", &[ann("1", 0, 3)]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text(), "abc");
        assert_eq!(ids(&items[0]), vec!["1"]);
    }

    #[test]
    fn test_multibyte_text_offsets_are_character_offsets() {
        // "héllo wörld": annotation [2,4) covers "ll", not bytes
        let items = compute_segments("héllo wörld", &[ann("1", 2, 4)]);
        assert_eq!(items[0].text(), "hé");
        assert_eq!(items[1].text(), "ll");
        assert_eq!(ids(&items[1]), vec!["1"]);
        assert_eq!(items[2].text(), "o wörld");
    }

    #[test]
    fn test_first_wins_color() {
        let catalog = TypeCatalog::new([
            AnnotationType {
                id: "A".to_string(),
                name: "Style".to_string(),
                color: "#aaa".to_string(),
            },
            AnnotationType {
                id: "B".to_string(),
                name: "Grammar".to_string(),
                color: "#bbb".to_string(),
            },
        ]);

        let first = Annotation {
            type_id: "A".to_string(),
            ..ann("1", 0, 8)
        };
        let second = Annotation {
            type_id: "B".to_string(),
            ..ann("2", 0, 8)
        };

        // Color follows original list order, not id or start order
        let items = compute_segments("abcdefgh", &[first.clone(), second.clone()]);
        assert_eq!(items[0].color(&catalog), "#aaa");
        assert_eq!(items[0].annotation_count(), 2);

        let items = compute_segments("abcdefgh", &[second, first]);
        assert_eq!(items[0].color(&catalog), "#bbb");
    }

    #[test]
    fn test_missing_type_fallback_color() {
        let catalog = TypeCatalog::default();
        let items = compute_segments("abcdefgh", &[ann("1", 0, 4)]);
        assert_eq!(items[0].color(&catalog), FALLBACK_COLOR);
        assert_eq!(items[0].annotation_count(), 1);
    }
}
