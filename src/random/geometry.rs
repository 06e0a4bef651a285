use crate::{
    foundation::core::{Bounds, Point, Rgba8},
    random::source::RandomSource,
};

/// The two shape silhouettes a unit can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ShapeKind {
    /// Circular silhouette; twice as likely as [`ShapeKind::Rect`].
    Oval,
    /// Square silhouette.
    Rect,
}

/// Sample a top-left position for a square of side `extent`.
///
/// Each axis is drawn over `[0, dim)` and offset by `-extent / 2`, so the
/// square can straddle the container edges. No clamping is applied.
pub fn random_point(rng: &mut dyn RandomSource, bounds: Bounds, extent: f64) -> Point {
    let half = extent / 2.0;
    Point::new(
        rng.next_f64() * bounds.width_f() - half,
        rng.next_f64() * bounds.height_f() - half,
    )
}

/// Draw a shape kind from three equally-likely outcomes, two of which map to
/// [`ShapeKind::Oval`].
pub fn random_shape_kind(rng: &mut dyn RandomSource) -> ShapeKind {
    match (rng.next_f64() * 3.0) as u32 {
        0 | 1 => ShapeKind::Oval,
        _ => ShapeKind::Rect,
    }
}

/// Draw an opaque color with each channel uniform over [0, 255].
pub fn random_color(rng: &mut dyn RandomSource) -> Rgba8 {
    fn channel(rng: &mut dyn RandomSource) -> u8 {
        ((rng.next_f64() * 256.0) as u32).min(255) as u8
    }

    let r = channel(rng);
    let g = channel(rng);
    let b = channel(rng);
    Rgba8::opaque(r, g, b)
}

/// Return `color` with its alpha scaled by `fraction` (clamped to [0, 1]).
pub fn with_alpha(color: Rgba8, fraction: f64) -> Rgba8 {
    let f = fraction.clamp(0.0, 1.0);
    Rgba8 {
        a: ((f64::from(color.a) * f).round()).clamp(0.0, 255.0) as u8,
        ..color
    }
}
