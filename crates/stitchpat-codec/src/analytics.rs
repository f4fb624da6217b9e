//! Bounding box, path length and per-kind counts over a command list.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::command::{CommandKind, PatternCommand};

/// Axis-aligned extent of the coordinate-bearing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl BoundingBox {
    #[must_use]
    pub const fn as_tuple(self) -> (i32, i32, i32, i32) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }

    #[must_use]
    pub const fn width(self) -> i32 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub const fn height(self) -> i32 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        (
            (f64::from(self.min_x) + f64::from(self.max_x)) / 2.0,
            (f64::from(self.min_y) + f64::from(self.max_y)) / 2.0,
        )
    }
}

/// Bounding box of every command whose kind carries coordinates.
///
/// Returns all zeros when no such command exists.
#[must_use]
pub fn bounding_box<K: CommandKind>(commands: &[PatternCommand<K>]) -> BoundingBox {
    let mut points = commands
        .iter()
        .filter(|c| c.has_coordinates())
        .map(PatternCommand::position);

    let Some((x, y)) = points.next() else {
        return BoundingBox::default();
    };

    points.fold(
        BoundingBox {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        },
        |bb, (x, y)| BoundingBox {
            min_x: bb.min_x.min(x),
            min_y: bb.min_y.min(y),
            max_x: bb.max_x.max(x),
            max_y: bb.max_y.max(y),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternStats {
    pub total_commands: usize,
    /// Count for every kind of the vocabulary, zeros included.
    pub counts: BTreeMap<&'static str, usize>,
    pub path_length: f64,
}

impl PatternStats {
    #[must_use]
    pub fn count<K: CommandKind>(&self, kind: K) -> usize {
        self.counts.get(kind.as_str()).copied().unwrap_or(0)
    }
}

/// Per-kind counts and path length.
///
/// Path length sums the Euclidean distance between consecutive
/// coordinate-bearing commands. A segment whose previous point is exactly
/// the origin contributes nothing, so the run-in from (0, 0) to the first
/// point is never counted.
#[must_use]
pub fn stats<K: CommandKind>(commands: &[PatternCommand<K>]) -> PatternStats {
    let mut counts: BTreeMap<&'static str, usize> = K::iter().map(|k| (k.as_str(), 0)).collect();
    let mut path_length = 0.0;
    let mut last = (0i32, 0i32);

    for cmd in commands {
        *counts.entry(cmd.kind().as_str()).or_insert(0) += 1;

        if cmd.has_coordinates() {
            let (x, y) = cmd.position();
            if last != (0, 0) {
                let dx = f64::from(x) - f64::from(last.0);
                let dy = f64::from(y) - f64::from(last.1);
                path_length += dx.hypot(dy);
            }
            last = (x, y);
        }
    }

    PatternStats {
        total_commands: commands.len(),
        counts,
        path_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{RecordCommand, RecordKind, StitchCommand, StitchKind};

    #[test]
    fn test_empty_bounds() {
        let empty: Vec<StitchCommand> = Vec::new();
        assert_eq!(bounding_box(&empty).as_tuple(), (0, 0, 0, 0));
    }

    #[test]
    fn test_bounds_ignore_non_coordinate_kinds() {
        let commands = vec![
            StitchCommand::new(StitchKind::Stitch, -5, 10),
            StitchCommand::new(StitchKind::ColorChange, 500, 500),
            StitchCommand::new(StitchKind::Backtack, 7, -3),
            StitchCommand::new(StitchKind::PatternEnd, -900, 0),
            StitchCommand::end(),
        ];
        let bb = bounding_box(&commands);
        assert_eq!(bb.as_tuple(), (-5, -3, 7, 10));
        assert_eq!(bb.width(), 12);
        assert_eq!(bb.height(), 13);
        assert_eq!(bb.center(), (1.0, 3.5));
    }

    #[test]
    fn test_only_sentinel_gives_zero_bounds() {
        assert_eq!(bounding_box(&[StitchCommand::end()]), BoundingBox::default());
    }

    #[test]
    fn test_stats_counts_every_kind() {
        let commands = vec![
            StitchCommand::new(StitchKind::Move, 3, 4),
            StitchCommand::new(StitchKind::Stitch, 6, 8),
            StitchCommand::new(StitchKind::ColorChange, 6, 8),
            StitchCommand::end(),
        ];
        let s = stats(&commands);
        assert_eq!(s.total_commands, 4);
        assert_eq!(s.count(StitchKind::Move), 1);
        assert_eq!(s.count(StitchKind::Stitch), 1);
        assert_eq!(s.count(StitchKind::ColorChange), 1);
        assert_eq!(s.count(StitchKind::Backtack), 0);
        assert_eq!(s.counts.len(), 6);
    }

    #[test]
    fn test_path_length_skips_segment_from_origin() {
        let commands = vec![
            StitchCommand::new(StitchKind::Move, 3, 4),
            StitchCommand::new(StitchKind::Stitch, 6, 8),
        ];
        // (0,0)->(3,4) is skipped; (3,4)->(6,8) counts.
        assert!((stats(&commands).path_length - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_length_skips_any_segment_leaving_origin() {
        let commands = vec![
            StitchCommand::new(StitchKind::Stitch, 3, 4),
            StitchCommand::new(StitchKind::Stitch, 0, 0),
            StitchCommand::new(StitchKind::Stitch, 0, 10),
        ];
        // 5 for the return to the origin, nothing for the segment leaving it.
        assert!((stats(&commands).path_length - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_stats_on_records() {
        let records = vec![
            RecordCommand::new(RecordKind::Point, 1, 1),
            RecordCommand::new(RecordKind::Speed, 0, 0),
            RecordCommand::new(RecordKind::Point, 4, 5),
        ];
        let s = stats(&records);
        assert_eq!(s.count(RecordKind::Point), 2);
        assert_eq!(s.count(RecordKind::Speed), 1);
        assert_eq!(s.counts.len(), 9);
        assert!((s.path_length - 5.0).abs() < 1e-9);
        assert_eq!(bounding_box(&records).as_tuple(), (1, 1, 4, 5));
    }
}
