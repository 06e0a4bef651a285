/// Easing function applied to a timeline's elapsed fraction.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Identity mapping.
    Linear,
    /// Symmetric cubic acceleration/deceleration.
    InOutCubic,
    /// Arbitrary cubic bezier easing through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier {
        /// First control point x.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x.
        x2: f64,
        /// Second control point y.
        y2: f64,
    },
}

impl Ease {
    /// The slow-in, long-glide curve used for shape travel.
    pub fn drift() -> Self {
        Self::CubicBezier {
            x1: 0.2,
            y1: 0.0,
            x2: 0.4,
            y2: 1.0,
        }
    }

    /// Apply the easing to `t`, clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => solve_cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

/// Evaluate the easing bezier at time fraction `x_target`.
///
/// Newton iteration on the x polynomial recovers the curve parameter; the y
/// polynomial at that parameter is the eased value. Eight iterations are ample
/// for the gentle control points easing curves use.
fn solve_cubic_bezier(x_target: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let mut t = x_target.clamp(0.0, 1.0);

    for _ in 0..8 {
        let x = cubic_bezier_1d(t, 0.0, x1, x2, 1.0);
        let slope = cubic_bezier_derivative_1d(t, 0.0, x1, x2, 1.0);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= (x - x_target) / slope;
        t = t.clamp(0.0, 1.0);
    }

    cubic_bezier_1d(t, 0.0, y1, y2, 1.0)
}

fn cubic_bezier_1d(t: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

fn cubic_bezier_derivative_1d(t: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * (p1 - p0) + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_eases_hit_endpoints() {
        for ease in [Ease::Linear, Ease::InOutCubic, Ease::drift()] {
            assert!(ease.apply(0.0).abs() < 1e-9);
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn inputs_are_clamped() {
        assert_eq!(Ease::Linear.apply(-1.0), 0.0);
        assert_eq!(Ease::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn drift_curve_is_monotone() {
        let ease = Ease::drift();
        let mut prev = ease.apply(0.0);
        for i in 1..=100 {
            let v = ease.apply(f64::from(i) / 100.0);
            assert!(v >= prev - 1e-9, "not monotone at step {i}: {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn bezier_solver_matches_known_points() {
        // A symmetric curve: x controls mirror y controls, so the curve passes
        // through (0.5, 0.5).
        let ease = Ease::CubicBezier {
            x1: 0.2,
            y1: 0.0,
            x2: 0.8,
            y2: 1.0,
        };
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn in_out_cubic_midpoint() {
        assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-9);
    }
}
