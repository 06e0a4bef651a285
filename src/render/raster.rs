use std::sync::Arc;

use kurbo::Shape as _;

use crate::{
    foundation::core::{Bounds, Pixmap, Rect, Rgba8},
    foundation::error::{GlowdriftError, GlowdriftResult},
    foundation::math::lerp_u8,
    random::geometry::ShapeKind,
};

/// Everything needed to rasterize one unit's shape at full opacity.
///
/// Captured when a unit regenerates; a resize mid-cycle does not alter an
/// in-flight job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterJob {
    /// Silhouette to fill.
    pub kind: ShapeKind,
    /// Fixed-size square the shape is drawn into, in container coordinates.
    /// May extend outside the container bounds.
    pub anchor: Rect,
    /// Gradient start color (opaque base).
    pub start: Rgba8,
    /// Gradient end color (base at half alpha).
    pub end: Rgba8,
    /// Container bounds at capture time; the raster is allocated at this size.
    pub bounds: Bounds,
}

/// Per-unit offscreen raster with an invalidation flag.
///
/// The cached pixmap holds the fully-opaque shape; per-frame paints reuse it
/// with only an alpha multiply and a translation offset, so paint cost stays
/// O(pixels) instead of O(shape complexity) every frame.
#[derive(Clone)]
pub struct SurfaceCache {
    raster: Option<Arc<Pixmap>>,
    dirty: bool,
}

impl SurfaceCache {
    /// Empty cache, marked dirty.
    pub fn new() -> Self {
        Self {
            raster: None,
            dirty: true,
        }
    }

    /// Mark the cached raster stale; the next [`SurfaceCache::ensure`] call
    /// re-rasterizes.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the cache must be regenerated before the next paint.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The valid cached raster, if any.
    pub fn cached(&self) -> Option<Arc<Pixmap>> {
        if self.dirty { None } else { self.raster.clone() }
    }

    /// Return the cached raster, rasterizing `job` first if the cache is
    /// dirty. Two calls without an intervening [`SurfaceCache::invalidate`]
    /// return the identical allocation.
    ///
    /// On failure the cache stays dirty and empty; callers degrade to "shape
    /// not drawn this cycle" and retry on the next regeneration.
    pub fn ensure(&mut self, job: &RasterJob) -> GlowdriftResult<Arc<Pixmap>> {
        if !self.dirty
            && let Some(r) = &self.raster
        {
            return Ok(r.clone());
        }

        let pixmap = rasterize(job)?;
        let raster = Arc::new(pixmap);
        self.raster = Some(raster.clone());
        self.dirty = false;
        Ok(raster)
    }
}

fn rasterize(job: &RasterJob) -> GlowdriftResult<Pixmap> {
    let w: u16 = job
        .bounds
        .width
        .try_into()
        .map_err(|_| GlowdriftError::raster("surface width exceeds u16"))?;
    let h: u16 = job
        .bounds
        .height
        .try_into()
        .map_err(|_| GlowdriftError::raster("surface height exceeds u16"))?;

    let extent = job.anchor.width();
    let paint = gradient_paint(job.start, job.end, extent)?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        job.anchor.x0,
        job.anchor.y0,
    )));
    ctx.set_paint(paint);

    match job.kind {
        ShapeKind::Rect => {
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, extent, extent));
        }
        ShapeKind::Oval => {
            let radius = extent / 2.0;
            let ellipse = kurbo::Ellipse::new((radius, radius), (radius, radius), 0.0);
            let mut path = vello_cpu::kurbo::BezPath::new();
            for el in ellipse.path_elements(0.1) {
                push_element(&mut path, el);
            }
            ctx.fill_path(&path);
        }
    }

    ctx.flush();
    let mut pixmap = Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

fn push_element(path: &mut vello_cpu::kurbo::BezPath, el: kurbo::PathEl) {
    use kurbo::PathEl;

    let cv = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    match el {
        PathEl::MoveTo(p) => path.move_to(cv(p)),
        PathEl::LineTo(p) => path.line_to(cv(p)),
        PathEl::QuadTo(p1, p2) => path.quad_to(cv(p1), cv(p2)),
        PathEl::CurveTo(p1, p2, p3) => path.curve_to(cv(p1), cv(p2), cv(p3)),
        PathEl::ClosePath => path.close_path(),
    }
}

/// Build the two-stop gradient image for one anchor square.
///
/// The ramp runs along the square's diagonal from `start` at the top-left to
/// `end` at the bottom-right, interpolating straight RGBA and storing
/// premultiplied pixels.
fn gradient_paint(start: Rgba8, end: Rgba8, extent: f64) -> GlowdriftResult<vello_cpu::Image> {
    if !extent.is_finite() || extent < 1.0 {
        return Err(GlowdriftError::raster("gradient extent must be >= 1"));
    }
    let side = extent.ceil() as u32;
    let side_u16: u16 = side
        .try_into()
        .map_err(|_| GlowdriftError::raster("gradient extent exceeds u16"))?;

    let n = side as usize;
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(n * n);
    let denom = ((2 * (side - 1)).max(1)) as f64;
    for y in 0..side {
        for x in 0..side {
            let t = f64::from(x + y) / denom;
            let c = Rgba8 {
                r: lerp_u8(start.r, end.r, t),
                g: lerp_u8(start.g, end.g, t),
                b: lerp_u8(start.b, end.b, t),
                a: lerp_u8(start.a, end.a, t),
            };
            pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array(
                c.to_premul_bytes(),
            ));
        }
    }

    let pixmap = Pixmap::from_parts_with_opacity(pixels, side_u16, side_u16, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}
