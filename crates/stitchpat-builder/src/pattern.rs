//! Programmatic pattern construction.
//!
//! A [`Pattern`] owns an ordered list of Format A commands plus the stitch
//! area of the machine it targets. Every `add_*` method appends; nothing
//! here reorders or merges existing commands.

use stitchpat_codec::format_a::{self, EncodeOptions, EncodeReport};
use stitchpat_codec::{StitchCommand, StitchKind, bounding_box};
use tracing::{debug, trace};

use crate::area::StitchArea;

/// Number of recent stitches sampled by [`Pattern::add_full_ending_sequence`].
pub const DEFAULT_BACKTACK_STEPS: usize = 3;

/// Largest stride, in machine units, of one backtack step.
const MAX_BACKTACK_STEP: i32 = 10;

pub type Point = (i32, i32);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    commands: Vec<StitchCommand>,
    area: StitchArea,
}

impl Pattern {
    /// Empty pattern on the default machine area.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_area(area: StitchArea) -> Self {
        Self {
            commands: Vec::new(),
            area,
        }
    }

    /// Wrap a decoded command stream for editing.
    ///
    /// `End` sentinels are dropped; they are a decoder artefact and the
    /// encoder never writes them.
    #[must_use]
    pub fn from_commands(commands: Vec<StitchCommand>, area: StitchArea) -> Self {
        let commands = commands
            .into_iter()
            .filter(|c| c.kind() != StitchKind::End)
            .collect();
        Self { commands, area }
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<StitchCommand> {
        self.commands
    }

    #[must_use]
    pub fn commands(&self) -> &[StitchCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn area(&self) -> StitchArea {
        self.area
    }

    pub fn set_area(&mut self, area: StitchArea) {
        self.area = area;
    }

    pub fn add_stitch(&mut self, x: i32, y: i32) {
        self.push(StitchKind::Stitch, x, y);
    }

    pub fn add_move(&mut self, x: i32, y: i32) {
        self.push(StitchKind::Move, x, y);
    }

    /// Thread-change stop, placed at the last stitch or move.
    pub fn add_color_change(&mut self) {
        let (x, y) = self.last_position_of(&[StitchKind::Stitch, StitchKind::Move]);
        self.push(StitchKind::ColorChange, x, y);
    }

    /// Terminator, placed at the last stitch, move or backtack.
    pub fn add_pattern_end(&mut self) {
        let (x, y) = self.last_position_of(&[
            StitchKind::Stitch,
            StitchKind::Move,
            StitchKind::Backtack,
        ]);
        self.push(StitchKind::PatternEnd, x, y);
    }

    /// Append `length` backtack points that lock the thread end.
    ///
    /// The direction comes from the last two of the `steps` most recent
    /// stitches. Even indices step backward along it by `i/2 + 1` units,
    /// odd indices forward by `i/2` units. With fewer than two stitches the
    /// points simply alternate between `x` and `x + 1` at the pattern's
    /// current end.
    pub fn add_backtack(&mut self, length: usize, steps: usize) {
        let recent: Vec<Point> = {
            let mut found: Vec<Point> = self
                .commands
                .iter()
                .rev()
                .filter(|c| c.kind() == StitchKind::Stitch)
                .take(steps)
                .map(StitchCommand::position)
                .collect();
            found.reverse();
            found
        };

        let &[.., prev, start] = recent.as_slice() else {
            let (x, y) = self.commands.last().map_or((0, 0), StitchCommand::position);
            debug!(length, "backtack without direction, alternating in place");
            for i in 0..length {
                self.push(StitchKind::Backtack, x.saturating_add((i % 2) as i32), y);
            }
            return;
        };

        let (sx, sy) = start;
        let (dx, dy) = (sx.saturating_sub(prev.0), sy.saturating_sub(prev.1));
        let step =
            (f64::from(dx).hypot(f64::from(dy)).round() as i32).clamp(1, MAX_BACKTACK_STEP);
        let stride = |d: i32, n: i32| d.saturating_mul(n).div_euclid(step);
        trace!(dx, dy, step, "backtack direction");

        for i in 0..length {
            let k = (i / 2) as i32;
            let (x, y) = if i % 2 == 0 {
                (
                    sx.saturating_sub(stride(dx, k + 1)),
                    sy.saturating_sub(stride(dy, k + 1)),
                )
            } else {
                (sx.saturating_add(stride(dx, k)), sy.saturating_add(stride(dy, k)))
            };
            self.push(StitchKind::Backtack, x, y);
        }
    }

    /// Color change, backtack of `backtack_length`, then pattern end.
    pub fn add_full_ending_sequence(&mut self, backtack_length: usize) {
        self.add_ending_sequence(backtack_length, DEFAULT_BACKTACK_STEPS);
    }

    /// [`Pattern::add_full_ending_sequence`] with an explicit stitch sample size.
    pub fn add_ending_sequence(&mut self, backtack_length: usize, backtack_steps: usize) {
        self.add_color_change();
        self.add_backtack(backtack_length, backtack_steps);
        self.add_pattern_end();
    }

    /// Evenly spaced stitches from `start` to `end`, both included.
    ///
    /// A non-positive spacing yields the two endpoints only.
    pub fn add_stitch_line(&mut self, start: Point, end: Point, spacing: f64) {
        self.add_stitch_line_segment(start, end, spacing, false);
    }

    /// Like [`Pattern::add_stitch_line`], optionally omitting the first point
    /// so chained segments do not repeat their shared vertex.
    pub fn add_stitch_line_segment(
        &mut self,
        start: Point,
        end: Point,
        spacing: f64,
        skip_first: bool,
    ) {
        let dx = f64::from(end.0) - f64::from(start.0);
        let dy = f64::from(end.1) - f64::from(start.1);
        let length = dx.hypot(dy);

        if length == 0.0 {
            if !skip_first {
                self.add_stitch(start.0, start.1);
            }
            return;
        }

        let count = if spacing > 0.0 {
            ((length / spacing).floor() as usize + 1).max(2)
        } else {
            2
        };
        let last = (count - 1) as f64;

        for i in usize::from(skip_first)..count {
            let t = i as f64 / last;
            // Truncation toward zero, not rounding.
            let x = (f64::from(start.0) + t * dx) as i32;
            let y = (f64::from(start.1) + t * dy) as i32;
            self.add_stitch(x, y);
        }
        trace!(?start, ?end, count, "stitch line");
    }

    /// Outline of a `width` × `height` rectangle centred on `center`.
    ///
    /// Starts with a move to the top-left corner and runs clockwise
    /// (TL, TR, BR, BL, back to TL).
    pub fn add_rectangle_stitches(&mut self, center: Point, width: i32, height: i32, spacing: f64) {
        let (cx, cy) = center;
        let (hw, hh) = (width.div_euclid(2), height.div_euclid(2));
        let (left, right) = (cx.saturating_sub(hw), cx.saturating_add(hw));
        let (top, bottom) = (cy.saturating_sub(hh), cy.saturating_add(hh));
        let corners = [(left, top), (right, top), (right, bottom), (left, bottom)];

        self.add_move(corners[0].0, corners[0].1);
        for edge in 0..corners.len() {
            let from = corners[edge];
            let to = corners[(edge + 1) % corners.len()];
            self.add_stitch_line_segment(from, to, spacing, edge > 0);
        }
    }

    #[must_use]
    pub fn is_within_stitch_area(&self, x: i32, y: i32) -> bool {
        self.area.contains(x, y)
    }

    /// Indices of coordinate-bearing commands that fall outside the area.
    #[must_use]
    pub fn out_of_area_indices(&self) -> Vec<usize> {
        self.commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_coordinates())
            .filter(|(_, c)| !self.area.contains(c.x(), c.y()))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn delete_command(&mut self, index: usize) -> Option<StitchCommand> {
        (index < self.commands.len()).then(|| self.commands.remove(index))
    }

    /// Centre the bounding box of the coordinate-bearing commands on the
    /// origin. Color changes and pattern ends move with them so any motion
    /// their records carry is kept. Returns the applied offset.
    pub fn center_on_origin(&mut self) -> Point {
        if !self.commands.iter().any(StitchCommand::has_coordinates) {
            return (0, 0);
        }
        let (cx, cy) = bounding_box(&self.commands).center();
        for cmd in self.commands.iter_mut().filter(|c| c.kind() != StitchKind::End) {
            let x = (f64::from(cmd.x()) - cx) as i32;
            let y = (f64::from(cmd.y()) - cy) as i32;
            cmd.set_position(x, y);
        }
        debug!(cx, cy, "centered pattern");
        (-(cx as i32), -(cy as i32))
    }

    #[must_use]
    pub fn encode(&self, options: EncodeOptions) -> EncodeReport {
        format_a::encode_with_report(&self.commands, options)
    }

    fn push(&mut self, kind: StitchKind, x: i32, y: i32) {
        self.commands.push(StitchCommand::new(kind, x, y));
    }

    fn last_position_of(&self, kinds: &[StitchKind]) -> Point {
        self.commands
            .iter()
            .rev()
            .find(|c| kinds.contains(&c.kind()))
            .map_or((0, 0), StitchCommand::position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(p: &Pattern) -> Vec<StitchKind> {
        p.commands().iter().map(StitchCommand::kind).collect()
    }

    fn positions(p: &Pattern) -> Vec<Point> {
        p.commands().iter().map(StitchCommand::position).collect()
    }

    #[test]
    fn test_new_pattern_is_empty() {
        let p = Pattern::new();
        assert!(p.is_empty());
        assert_eq!(p.area(), StitchArea::default());
    }

    #[test]
    fn test_color_change_uses_last_stitch_or_move() {
        let mut p = Pattern::new();
        p.add_color_change();
        assert_eq!(p.commands()[0].position(), (0, 0));

        p.add_move(5, 6);
        p.add_stitch(7, 8);
        p.add_backtack(1, 3);
        p.add_color_change();
        assert_eq!(p.commands().last().map(StitchCommand::position), Some((7, 8)));
    }

    #[test]
    fn test_pattern_end_includes_backtack_positions() {
        let mut p = Pattern::new();
        p.add_stitch(1, 1);
        p.push(StitchKind::Backtack, 9, 9);
        p.add_pattern_end();
        assert_eq!(p.commands().last().map(StitchCommand::position), Some((9, 9)));

        let mut empty = Pattern::new();
        empty.add_pattern_end();
        assert_eq!(positions(&empty), vec![(0, 0)]);
    }

    #[test]
    fn test_backtack_fallback_alternates_in_place() {
        let mut p = Pattern::new();
        p.add_move(20, -4);
        p.add_backtack(5, 3);
        assert_eq!(
            positions(&p)[1..],
            [(20, -4), (21, -4), (20, -4), (21, -4), (20, -4)]
        );
        assert!(kinds(&p)[1..].iter().all(|k| *k == StitchKind::Backtack));
    }

    #[test]
    fn test_backtack_follows_last_direction() {
        let mut p = Pattern::new();
        p.add_stitch(0, 0);
        p.add_stitch(20, 0);
        p.add_backtack(4, 3);
        // direction (20, 0), step 10: -2, +0, -4, +2 units from x=20.
        assert_eq!(positions(&p)[2..], [(18, 0), (20, 0), (16, 0), (22, 0)]);
    }

    #[test]
    fn test_backtack_short_direction_uses_floor_division() {
        let mut p = Pattern::new();
        p.add_stitch(10, 10);
        p.add_stitch(7, 14);
        p.add_backtack(2, 3);
        // direction (-3, 4), step 5: floor(-3/5) = -1, floor(4/5) = 0.
        assert_eq!(positions(&p)[2..], [(8, 14), (7, 14)]);
    }

    #[test]
    fn test_full_ending_sequence_shape() {
        let mut p = Pattern::new();
        p.add_stitch_line((0, 0), (40, 0), 10.0);
        let before = p.len();
        p.add_full_ending_sequence(6);

        let tail = &kinds(&p)[before..];
        assert_eq!(tail.len(), 8);
        assert_eq!(tail[0], StitchKind::ColorChange);
        assert!(tail[1..7].iter().all(|k| *k == StitchKind::Backtack));
        assert_eq!(tail[7], StitchKind::PatternEnd);
    }

    #[test]
    fn test_stitch_line_counts_and_truncates() {
        let mut p = Pattern::new();
        p.add_stitch_line((0, 0), (10, 5), 4.0);
        // length ~11.18 -> floor(2.79) + 1 = 3 stitches.
        assert_eq!(positions(&p), vec![(0, 0), (5, 2), (10, 5)]);
    }

    #[test]
    fn test_stitch_line_has_at_least_two_points() {
        let mut p = Pattern::new();
        p.add_stitch_line((0, 0), (3, 0), 50.0);
        assert_eq!(positions(&p), vec![(0, 0), (3, 0)]);
    }

    #[test]
    fn test_zero_length_line() {
        let mut p = Pattern::new();
        p.add_stitch_line((4, 4), (4, 4), 10.0);
        assert_eq!(positions(&p), vec![(4, 4)]);

        p.add_stitch_line_segment((4, 4), (4, 4), 10.0, true);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn test_segment_skips_first_vertex() {
        let mut p = Pattern::new();
        p.add_stitch_line_segment((0, 0), (20, 0), 10.0, true);
        assert_eq!(positions(&p), vec![(10, 0), (20, 0)]);
    }

    #[test]
    fn test_rectangle_outline() {
        let mut p = Pattern::new();
        p.add_rectangle_stitches((0, 0), 20, 10, 10.0);
        assert_eq!(
            positions(&p),
            vec![
                (-10, -5),
                (-10, -5),
                (0, -5),
                (10, -5),
                (10, 5),
                (0, 5),
                (-10, 5),
                (-10, -5),
            ]
        );
        assert_eq!(kinds(&p)[0], StitchKind::Move);
        assert!(kinds(&p)[1..].iter().all(|k| *k == StitchKind::Stitch));
    }

    #[test]
    fn test_area_checks() {
        let mut p = Pattern::new();
        p.add_stitch(0, 0);
        p.add_stitch(150, 0);
        p.add_color_change();
        p.add_stitch(-100, 100);
        assert!(p.is_within_stitch_area(100, 100));
        assert!(!p.is_within_stitch_area(0, -101));
        assert_eq!(p.out_of_area_indices(), vec![1]);
    }

    #[test]
    fn test_delete_command() {
        let mut p = Pattern::new();
        p.add_stitch(1, 2);
        p.add_stitch(3, 4);
        let removed = p.delete_command(0);
        assert_eq!(removed.map(|c| c.position()), Some((1, 2)));
        assert!(p.delete_command(5).is_none());
        assert_eq!(positions(&p), vec![(3, 4)]);
    }

    #[test]
    fn test_center_on_origin_clears_raw() {
        let decoded = format_a::parse(&[0x61, 0x00, 0x0a, 0x00, 0x61, 0x00, 0x1e, 0x00]);
        let mut p = Pattern::from_commands(decoded, StitchArea::default());
        assert_eq!(p.len(), 2);

        let offset = p.center_on_origin();
        assert_eq!(offset, (-25, 0));
        assert_eq!(positions(&p), vec![(-15, 0), (15, 0)]);
        assert!(p.commands().iter().all(|c| c.raw().is_none()));

        let report = p.encode(EncodeOptions::default());
        let reparsed = format_a::parse(&report.bytes);
        assert_eq!(reparsed[0].position(), (-15, 0));
        assert_eq!(reparsed[1].position(), (15, 0));
    }

    fn saved_positions(p: &Pattern, kind: StitchKind) -> Vec<Point> {
        format_a::parse(&p.encode(EncodeOptions::default()).bytes)
            .iter()
            .filter(|c| c.kind() == kind)
            .map(StitchCommand::position)
            .collect()
    }

    #[test]
    fn test_delete_middle_command_survives_save() {
        let bytes = [
            0x61, 0x00, 0x0a, 0x00, 0x61, 0x00, 0x0a, 0x00, 0x61, 0x00, 0x0a, 0x00, 0x1f, 0x00,
            0x00, 0x00,
        ];
        let mut p = Pattern::from_commands(format_a::parse(&bytes), StitchArea::default());
        p.delete_command(1);

        assert_eq!(positions(&p), vec![(10, 0), (30, 0), (30, 0)]);
        assert_eq!(saved_positions(&p, StitchKind::Stitch), vec![(10, 0), (30, 0)]);
    }

    #[test]
    fn test_center_on_origin_moves_color_change_motion() {
        // +10 stitch, color change carrying +5, +10 stitch.
        let bytes = [
            0x61, 0x00, 0x0a, 0x00, 0x02, 0x00, 0x05, 0x00, 0x61, 0x00, 0x0a, 0x00, 0x1f, 0x00,
            0x00, 0x00,
        ];
        let mut p = Pattern::from_commands(format_a::parse(&bytes), StitchArea::default());

        assert_eq!(p.center_on_origin(), (-17, 0));
        assert_eq!(positions(&p), vec![(-7, 0), (-2, 0), (7, 0), (7, 0)]);
        assert_eq!(saved_positions(&p, StitchKind::Stitch), vec![(-7, 0), (7, 0)]);
        assert_eq!(saved_positions(&p, StitchKind::ColorChange), vec![(-2, 0)]);
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let mut p = Pattern::new();
        p.add_stitch_line((i32::MIN, 0), (i32::MAX, 0), 0.0);
        assert_eq!(positions(&p), vec![(i32::MIN, 0), (i32::MAX, 0)]);

        p.add_backtack(4, DEFAULT_BACKTACK_STEPS);
        assert_eq!(p.len(), 6);

        let mut rect = Pattern::new();
        rect.add_rectangle_stitches((i32::MAX, i32::MIN), 10, 10, 0.0);
        assert_eq!(rect.commands()[0].position(), (i32::MAX - 5, i32::MIN));
        assert_eq!(rect.len(), 6);
        assert_eq!(
            rect.commands().last().map(StitchCommand::position),
            Some((i32::MAX - 5, i32::MIN))
        );
    }

    #[test]
    fn test_center_on_origin_truncates_half_units() {
        let mut p = Pattern::new();
        p.add_stitch(0, 0);
        p.add_stitch(5, 3);
        p.center_on_origin();
        // centre (2.5, 1.5): -2.5 -> -2, 2.5 -> 2, -1.5 -> -1, 1.5 -> 1
        assert_eq!(positions(&p), vec![(-2, -1), (2, 1)]);
    }

    #[test]
    fn test_center_on_origin_without_coordinates_is_noop() {
        let mut p = Pattern::new();
        p.add_color_change();
        assert_eq!(p.center_on_origin(), (0, 0));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rectangle_is_closed_and_bounded(
                cx in -200i32..=200,
                cy in -200i32..=200,
                width in 1i32..=300,
                height in 1i32..=300,
                spacing in 1.0f64..40.0,
            ) {
                let mut p = Pattern::new();
                p.add_rectangle_stitches((cx, cy), width, height, spacing);
                let (hw, hh) = (width / 2, height / 2);

                let first = p.commands()[0].position();
                prop_assert_eq!(first, (cx - hw, cy - hh));
                prop_assert_eq!(p.commands().last().map(StitchCommand::position), Some(first));
                for (x, y) in positions(&p) {
                    prop_assert!((cx - hw..=cx + hw).contains(&x));
                    prop_assert!((cy - hh..=cy + hh).contains(&y));
                }
            }

            #[test]
            fn backtack_stays_near_last_stitch(
                prev in (-50i32..=50, -50i32..=50),
                start in (-50i32..=50, -50i32..=50),
                length in 1usize..=12,
            ) {
                let mut p = Pattern::new();
                p.add_stitch(prev.0, prev.1);
                p.add_stitch(start.0, start.1);
                p.add_backtack(length, DEFAULT_BACKTACK_STEPS);

                let backtacks: Vec<Point> =
                    p.commands()[2..].iter().map(StitchCommand::position).collect();
                prop_assert_eq!(backtacks.len(), length);
                let reach = (length as i32 / 2 + 1) * 101;
                for (x, y) in backtacks {
                    prop_assert!((x - start.0).abs() <= reach);
                    prop_assert!((y - start.1).abs() <= reach);
                }
            }
        }
    }
}
