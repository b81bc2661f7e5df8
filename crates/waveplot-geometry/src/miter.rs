//! Miter join math.
//!
//! A join sits at an interior sample where the incoming segment (slope `k1`)
//! meets the outgoing one (slope `k2`). The two boundary points of the
//! stroke at that sample are found either by offsetting the sample point
//! perpendicular to the incoming segment, or by intersecting the offset
//! boundary lines of both segments.

/// Slope difference below which a join uses the plain perpendicular offset.
///
/// Line intersection gets unstable as the segments approach parallel.
pub const NEAR_PARALLEL_THRESHOLD: f32 = 0.3;

/// A point in output (screen) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Which branch produced a join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Near-straight run: perpendicular offset of the sample point
    Offset,
    /// Sharp turn: intersection of the two segments' offset boundaries
    Intersection,
}

/// The two boundary points of the stroke at one interior sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Join {
    /// Left boundary when walking along increasing x (`+normal` side)
    pub upper: Point2,
    /// Right boundary
    pub lower: Point2,
    pub kind: JoinKind,
}

impl Join {
    pub fn is_finite(&self) -> bool {
        self.upper.is_finite() && self.lower.is_finite()
    }
}

/// Perpendicular offset `(h * sin(atan(k)), h * cos(atan(k)))` for a segment of slope `k`.
fn offset_for_slope(slope: f32, half_width: f32) -> (f32, f32) {
    let angle = slope.atan();
    (half_width * angle.sin(), half_width * angle.cos())
}

/// Intersect `y = k1 (x - a.x) + a.y` with `y = k2 (x - b.x) + b.y`.
///
/// Callers guarantee `|k1 - k2| >= NEAR_PARALLEL_THRESHOLD`.
fn intersect(a: Point2, k1: f32, b: Point2, k2: f32) -> Point2 {
    let x = (k1 * a.x - a.y - k2 * b.x + b.y) / (k1 - k2);
    Point2::new(x, k1 * (x - a.x) + a.y)
}

/// Pull `point` towards `center` so it lies at most `max_distance` away.
fn clamp_to(center: Point2, point: Point2, max_distance: f32) -> Point2 {
    let distance = center.distance(point);
    if distance <= max_distance {
        return point;
    }
    let scale = max_distance / distance;
    Point2::new(
        center.x + (point.x - center.x) * scale,
        center.y + (point.y - center.y) * scale,
    )
}

/// Compute the join at `center`, between the segment from `prev` and the segment to `next`.
///
/// Slopes are measured over the constant horizontal step `x_step`. With
/// `miter_limit = Some(m)` each boundary point is clamped to `m * half_width`
/// from `center`; `None` keeps the raw intersection, overshoot included.
pub fn compute_join(
    prev: Point2,
    center: Point2,
    next: Point2,
    x_step: f32,
    half_width: f32,
    miter_limit: Option<f32>,
) -> Join {
    let k1 = (center.y - prev.y) / x_step;
    let k2 = (next.y - center.y) / x_step;

    let (px, py) = offset_for_slope(k1, half_width);

    let mut join = if (k1 - k2).abs() < NEAR_PARALLEL_THRESHOLD {
        Join {
            upper: Point2::new(center.x - px, center.y + py),
            lower: Point2::new(center.x + px, center.y - py),
            kind: JoinKind::Offset,
        }
    } else {
        let (qx, qy) = offset_for_slope(k2, half_width);

        let upper = intersect(
            Point2::new(center.x - px, center.y + py),
            k1,
            Point2::new(next.x - qx, next.y + qy),
            k2,
        );
        let lower = intersect(
            Point2::new(center.x + px, center.y - py),
            k1,
            Point2::new(next.x + qx, next.y - qy),
            k2,
        );

        Join {
            upper,
            lower,
            kind: JoinKind::Intersection,
        }
    };

    if let Some(limit) = miter_limit {
        let max_distance = limit * half_width;
        join.upper = clamp_to(center, join.upper, max_distance);
        join.lower = clamp_to(center, join.lower, max_distance);
    }

    join
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_close(actual: Point2, expected: Point2) {
        assert!(
            actual.distance(expected) < EPSILON,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_flat_join_is_pure_vertical_offset() {
        let join = compute_join(
            Point2::new(0.0, 10.0),
            Point2::new(1.0, 10.0),
            Point2::new(2.0, 10.0),
            1.0,
            0.5,
            None,
        );

        assert_eq!(join.kind, JoinKind::Offset);
        assert_eq!(join.upper, Point2::new(1.0, 10.5));
        assert_eq!(join.lower, Point2::new(1.0, 9.5));
    }

    #[test]
    fn test_near_straight_uses_perpendicular_offset() {
        // k1 = 0.5, k2 = 0.7: difference below the threshold
        let join = compute_join(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(2.0, 1.2),
            1.0,
            1.0,
            None,
        );

        let angle = 0.5_f32.atan();
        assert_eq!(join.kind, JoinKind::Offset);
        assert_eq!(join.upper, Point2::new(1.0 - angle.sin(), 0.5 + angle.cos()));
        assert_eq!(join.lower, Point2::new(1.0 + angle.sin(), 0.5 - angle.cos()));
    }

    #[test]
    fn test_threshold_boundary_takes_intersection() {
        // Exactly representable slopes: k1 = 0.5, k2 = 0.25 differ by 0.25 (offset),
        // k1 = 0.5, k2 = 0.0 differ by 0.5 (intersection)
        let below = compute_join(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(2.0, 0.75),
            1.0,
            1.0,
            None,
        );
        assert_eq!(below.kind, JoinKind::Offset);

        let above = compute_join(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(2.0, 0.5),
            1.0,
            1.0,
            None,
        );
        assert_eq!(above.kind, JoinKind::Intersection);
    }

    #[test]
    fn test_slope_difference_at_threshold_intersects() {
        // k1 = 0.3, k2 = 0.0: the difference equals the threshold exactly
        let at = compute_join(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, NEAR_PARALLEL_THRESHOLD),
            Point2::new(2.0, NEAR_PARALLEL_THRESHOLD),
            1.0,
            1.0,
            None,
        );
        assert_eq!(at.kind, JoinKind::Intersection);
    }

    #[test]
    fn test_peak_matches_closed_form_intersection() {
        // k1 = 1, k2 = -1: boundaries are y = x ± sqrt(2) and y = 2 - x ± sqrt(2)
        let join = compute_join(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 0.0),
            1.0,
            1.0,
            None,
        );

        let sqrt2 = std::f32::consts::SQRT_2;
        assert_eq!(join.kind, JoinKind::Intersection);
        assert_close(join.upper, Point2::new(1.0, 1.0 + sqrt2));
        assert_close(join.lower, Point2::new(1.0, 1.0 - sqrt2));
    }

    #[test]
    fn test_intersection_lies_on_both_boundaries() {
        let prev = Point2::new(0.0, 0.0);
        let center = Point2::new(1.0, 3.0);
        let next = Point2::new(2.0, 2.0);
        let half_width = 0.75;

        let join = compute_join(prev, center, next, 1.0, half_width, None);

        // Distance from the join point to each centerline segment's line equals the half width
        let line_distance = |p: Point2, a: Point2, b: Point2| {
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / dx.hypot(dy)
        };
        for point in [join.upper, join.lower] {
            assert!((line_distance(point, prev, center) - half_width).abs() < EPSILON);
            assert!((line_distance(point, center, next) - half_width).abs() < EPSILON);
        }
    }

    #[test]
    fn test_tight_turn_overshoots_without_limit() {
        // A spike: the miter lands far from the sample point
        let join = compute_join(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 50.0),
            Point2::new(2.0, 0.0),
            1.0,
            1.0,
            None,
        );

        assert!(join.upper.distance(Point2::new(1.0, 50.0)) > 10.0);
    }

    #[test]
    fn test_miter_limit_clamps_overshoot() {
        let center = Point2::new(1.0, 50.0);
        let join = compute_join(
            Point2::new(0.0, 0.0),
            center,
            Point2::new(2.0, 0.0),
            1.0,
            1.0,
            Some(4.0),
        );

        assert!(join.upper.distance(center) <= 4.0 + EPSILON);
        assert!(join.lower.distance(center) <= 4.0 + EPSILON);
        // Direction is preserved: the upper point stays above the peak
        assert!(join.upper.y > center.y);
    }

    #[test]
    fn test_miter_limit_leaves_short_joins_alone() {
        let prev = Point2::new(0.0, 0.0);
        let center = Point2::new(1.0, 1.0);
        let next = Point2::new(2.0, 0.0);

        let unclamped = compute_join(prev, center, next, 1.0, 1.0, None);
        let clamped = compute_join(prev, center, next, 1.0, 1.0, Some(10.0));
        assert_eq!(unclamped, clamped);
    }
}
