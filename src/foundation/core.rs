use crate::foundation::error::{GlowdriftError, GlowdriftResult};

pub use kurbo::{Point, Rect, Vec2};
pub use vello_cpu::Pixmap;

/// Pixel dimensions of the hosting container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Bounds {
    /// Build bounds, rejecting zero-area dimensions.
    pub fn new(width: u32, height: u32) -> GlowdriftResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlowdriftError::validation("Bounds must be non-zero on both axes"));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`, for geometry sampling.
    pub fn width_f(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`, for geometry sampling.
    pub fn height_f(self) -> f64 {
        f64::from(self.height)
    }
}

/// A straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Build a fully opaque color.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Premultiply into an `[r, g, b, a]` byte quad.
    pub fn to_premul_bytes(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Per-edge padding applied by the measurement contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    /// Leading horizontal padding.
    pub left: u32,
    /// Top padding.
    pub top: u32,
    /// Trailing horizontal padding.
    pub right: u32,
    /// Bottom padding.
    pub bottom: u32,
}

/// One axis of a host measurement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasureSpec {
    /// Size requested or suggested by the parent, in pixels.
    pub size: u32,
    /// Whether `size` is an exact constraint.
    pub exact: bool,
}

/// Resolve one measured axis: exact constraints are honored as-is, otherwise
/// the parent suggestion grows by the container's own padding on that axis.
pub fn resolve_measured_extent(spec: MeasureSpec, padding_lead: u32, padding_trail: u32) -> u32 {
    if spec.exact {
        spec.size
    } else {
        spec.size
            .saturating_add(padding_lead)
            .saturating_add(padding_trail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_reject_zero_axes() {
        assert!(Bounds::new(0, 10).is_err());
        assert!(Bounds::new(10, 0).is_err());
        assert!(Bounds::new(1, 1).is_ok());
    }

    #[test]
    fn premul_bytes_match_rounded_scaling() {
        let c = Rgba8 {
            r: 200,
            g: 100,
            b: 0,
            a: 128,
        };
        let p = c.to_premul_bytes();
        assert_eq!(p, [100, 50, 0, 128]);

        let opaque = Rgba8::opaque(9, 90, 200);
        assert_eq!(opaque.to_premul_bytes(), [9, 90, 200, 255]);
    }

    #[test]
    fn exact_measure_ignores_padding() {
        let spec = MeasureSpec {
            size: 640,
            exact: true,
        };
        assert_eq!(resolve_measured_extent(spec, 16, 24), 640);
    }

    #[test]
    fn unconstrained_measure_adds_own_padding() {
        let spec = MeasureSpec {
            size: 640,
            exact: false,
        };
        assert_eq!(resolve_measured_extent(spec, 16, 24), 680);
    }
}
