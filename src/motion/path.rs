use kurbo::{ParamCurve, QuadBez};

use crate::{
    foundation::core::{Bounds, Point},
    foundation::error::{GlowdriftError, GlowdriftResult},
    random::geometry::random_point,
    random::source::RandomSource,
};

/// One quadratic step of a travel path: a control point and an end point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    /// Quadratic control point.
    pub ctrl: Point,
    /// Segment end point.
    pub end: Point,
}

/// Draw `count` waypoints over the current bounds.
///
/// Control and end points use the same half-extent-offset sampling as shape
/// anchors, so a path can wander partially off canvas.
pub fn sample_waypoints(
    rng: &mut dyn RandomSource,
    bounds: Bounds,
    extent: f64,
    count: u32,
) -> Vec<Waypoint> {
    (0..count)
        .map(|_| Waypoint {
            ctrl: random_point(rng, bounds, extent),
            end: random_point(rng, bounds, extent),
        })
        .collect()
}

/// A smooth multi-segment curve a unit's translation travels along.
///
/// Built from quadratic segments chained through waypoints; the time fraction
/// maps linearly onto segment index plus local curve parameter (no arc-length
/// parameterization).
#[derive(Clone, Debug, PartialEq)]
pub struct TravelPath {
    segments: Vec<QuadBez>,
}

impl TravelPath {
    /// Chain `waypoints.len()` quadratic segments starting at `start`.
    pub fn build(start: Point, waypoints: &[Waypoint]) -> GlowdriftResult<Self> {
        if waypoints.is_empty() {
            return Err(GlowdriftError::validation(
                "TravelPath needs at least one waypoint",
            ));
        }

        let mut segments = Vec::with_capacity(waypoints.len());
        let mut cursor = start;
        for w in waypoints {
            segments.push(QuadBez::new(cursor, w.ctrl, w.end));
            cursor = w.end;
        }
        Ok(Self { segments })
    }

    /// Number of quadratic segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The chained segments, in travel order.
    pub fn segments(&self) -> &[QuadBez] {
        &self.segments
    }

    /// Point on the curve at time fraction `t` in `[0, 1]` (clamped).
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let n = self.segments.len();
        let scaled = t * n as f64;
        let idx = (scaled as usize).min(n - 1);
        let local = scaled - idx as f64;
        self.segments[idx].eval(local)
    }
}
