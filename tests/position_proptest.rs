//! Property-based tests for points and positions
//!
//! These tests ensure that:
//! - Points derived from source text always satisfy the coordinate invariants
//! - Line/column and offset conversions agree in both directions
//! - Positions derived from source text are well ordered and pass the checker

use proptest::prelude::*;
use unist::ast::{Position, SourceLocation};
use unist::conformance::Checker;

/// Generate source text with several lines, some indented, some blank
fn source_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[ \t]{0,3}[a-zA-Zäö*#> ]{0,12}", 1..8).prop_map(|lines| lines.join("\n"))
}

/// Generate a source together with an ordered pair of offsets into it
fn source_with_range() -> impl Strategy<Value = (String, usize, usize)> {
    source_strategy().prop_flat_map(|source| {
        let len = source.chars().count();
        (Just(source), 0..=len, 0..=len).prop_map(|(source, a, b)| (source, a.min(b), a.max(b)))
    })
}

proptest! {
    #[test]
    fn test_points_are_one_indexed((source, offset, _) in source_with_range()) {
        let location = SourceLocation::new(&source);
        let point = location.point_at(offset).unwrap();

        prop_assert!(point.line >= 1);
        prop_assert!(point.column >= 1);
        prop_assert_eq!(point.offset, offset);
        prop_assert!(point.validate().is_ok());
    }

    #[test]
    fn test_offset_round_trip((source, offset, _) in source_with_range()) {
        let location = SourceLocation::new(&source);
        let point = location.point_at(offset).unwrap();

        prop_assert_eq!(location.offset_at(point.line, point.column), Some(offset));
        prop_assert!(location.agrees(&point));
    }

    #[test]
    fn test_point_order_follows_offsets((source, start, end) in source_with_range()) {
        let location = SourceLocation::new(&source);
        let a = location.point_at(start).unwrap();
        let b = location.point_at(end).unwrap();

        prop_assert!(a <= b);
        prop_assert!(a.line_column() <= b.line_column());
    }

    #[test]
    fn test_derived_positions_conform((source, start, end) in source_with_range()) {
        let location = SourceLocation::new(&source);
        let position = location.position_between(start, end).unwrap();

        prop_assert!(position.validate().is_ok());
        prop_assert_eq!(position.indent.len(), position.line_span() - 1);
        prop_assert!(position.contains(position.start));
        prop_assert!(position.contains(position.end));

        let node = serde_json::json!({"type": "text", "position": position});
        let report = Checker::default().with_source(&source).check(&node);
        prop_assert!(report.diagnostics().is_empty(), "{}", report);
    }

    #[test]
    fn test_bounding_box_encloses_all((source, start, end) in source_with_range()) {
        let location = SourceLocation::new(&source);
        let mid = start + (end - start) / 2;
        let parts = [
            location.position_between(start, mid).unwrap(),
            location.position_between(mid, end).unwrap(),
        ];

        let bbox = Position::bounding_box(parts.iter()).unwrap();
        prop_assert!(parts.iter().all(|part| bbox.encloses(part)));
        prop_assert_eq!(bbox.start.offset, start);
        prop_assert_eq!(bbox.end.offset, end);
    }
}
