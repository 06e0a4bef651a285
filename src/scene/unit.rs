use std::sync::Arc;

use crate::{
    animation::ease::Ease,
    animation::timeline::Timeline,
    foundation::core::{Bounds, Pixmap, Point, Rect, Rgba8, Vec2},
    foundation::error::GlowdriftResult,
    motion::path::{TravelPath, sample_waypoints},
    random::geometry::{ShapeKind, random_color, random_point, random_shape_kind, with_alpha},
    random::source::RandomSource,
    render::raster::{RasterJob, SurfaceCache},
    scene::config::SurfaceConfig,
};

/// Opaque unit identity, stable for the unit's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UnitId(pub u32);

/// Lifecycle phase of a shape unit.
///
/// The cycle is infinite: Generating re-rolls geometry and immediately yields
/// to FadingIn; fade-in and travel run concurrently from cycle start; fade-out
/// is gated strictly on travel completion and loops back to Generating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitState {
    /// Re-rolling geometry and rasterizing; transient within one tick.
    Generating,
    /// Alpha ramping 0 to 1 (travel already progressing underneath).
    FadingIn,
    /// Translation following the travel path at full opacity.
    Traveling,
    /// Alpha ramping 1 to 0; ends the cycle.
    FadingOut,
}

/// One independently animating shape.
///
/// A unit owns its raster cache, its fade/travel timelines, and all of its
/// mutable animation state; nothing outside [`ShapeUnit::advance`] writes
/// `alpha` or `translation`. Units are created by the spawn scheduler and
/// never destroyed: they cycle until the container is dropped.
pub struct ShapeUnit {
    id: UnitId,
    cfg: SurfaceConfig,

    kind: ShapeKind,
    anchor: Rect,
    color: Rgba8,
    alpha: f64,
    translation: Vec2,
    state: UnitState,

    fade_in: Timeline,
    travel: Timeline,
    fade_out: Timeline,
    path: TravelPath,

    cache: SurfaceCache,
    job: RasterJob,
    cycles: u64,
}

impl ShapeUnit {
    /// Create a unit and run its first Generating phase against `bounds`.
    pub fn new(
        id: UnitId,
        cfg: &SurfaceConfig,
        bounds: Bounds,
        rng: &mut dyn RandomSource,
    ) -> GlowdriftResult<Self> {
        let fade_in = Timeline::new(cfg.fade_secs, Ease::Linear)?;
        let travel = Timeline::new(cfg.travel_secs(), cfg.travel_ease)?;
        let fade_out = Timeline::new(cfg.fade_secs, Ease::Linear)?;

        let mut unit = Self {
            id,
            cfg: *cfg,
            kind: ShapeKind::Oval,
            anchor: Rect::ZERO,
            color: Rgba8::opaque(0, 0, 0),
            alpha: 0.0,
            translation: Vec2::ZERO,
            state: UnitState::Generating,
            fade_in,
            travel,
            fade_out,
            path: TravelPath::build(
                Point::ZERO,
                &[crate::motion::path::Waypoint {
                    ctrl: Point::ZERO,
                    end: Point::ZERO,
                }],
            )?,
            cache: SurfaceCache::new(),
            job: RasterJob {
                kind: ShapeKind::Oval,
                anchor: Rect::ZERO,
                start: Rgba8::opaque(0, 0, 0),
                end: Rgba8::opaque(0, 0, 0),
                bounds,
            },
            cycles: 0,
        };
        unit.regenerate(bounds, rng)?;
        Ok(unit)
    }

    /// Stable identity.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Current lifecycle phase.
    pub fn state(&self) -> UnitState {
        self.state
    }

    /// Current opacity in [0, 1].
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Current offset applied on top of the anchor rect.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// The anchor square of the current cycle.
    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    /// The silhouette of the current cycle.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The gradient base color of the current cycle.
    pub fn color(&self) -> Rgba8 {
        self.color
    }

    /// Completed Generate→FadeOut cycles so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The in-flight travel path of the current cycle.
    pub fn travel_path(&self) -> &TravelPath {
        &self.path
    }

    /// The cached full-opacity raster, if this cycle's rasterization
    /// succeeded.
    pub fn cached_raster(&self) -> Option<Arc<Pixmap>> {
        self.cache.cached()
    }

    /// Advance the unit's timelines by `dt` seconds.
    ///
    /// `bounds` and `rng` are only consulted when a cycle restarts inside this
    /// tick; an in-flight cycle keeps the geometry it sampled at its own
    /// Generating phase. Returns whether a repaint is needed.
    pub fn advance(
        &mut self,
        dt: f64,
        bounds: Bounds,
        rng: &mut dyn RandomSource,
    ) -> GlowdriftResult<bool> {
        if !dt.is_finite() || dt <= 0.0 {
            return Ok(false);
        }

        let mut remaining = dt;
        loop {
            match self.state {
                UnitState::Generating => {
                    self.regenerate(bounds, rng)?;
                }
                UnitState::FadingIn => {
                    let over = self.fade_in.advance(remaining);
                    // Travel runs concurrently from cycle start; it consumes
                    // the same wall time the fade did.
                    self.travel.advance(remaining - over);
                    self.alpha = self.fade_in.progress();
                    self.translation = self.path.point_at(self.travel.progress()).to_vec2();
                    if self.fade_in.is_done() {
                        self.state = UnitState::Traveling;
                    }
                    remaining = over;
                }
                UnitState::Traveling => {
                    let over = self.travel.advance(remaining);
                    self.translation = self.path.point_at(self.travel.progress()).to_vec2();
                    if self.travel.is_done() {
                        self.state = UnitState::FadingOut;
                    }
                    remaining = over;
                }
                UnitState::FadingOut => {
                    let over = self.fade_out.advance(remaining);
                    self.alpha = 1.0 - self.fade_out.progress();
                    if self.fade_out.is_done() {
                        self.cycles += 1;
                        self.regenerate(bounds, rng)?;
                    }
                    remaining = over;
                }
            }
            if remaining <= 0.0 {
                break;
            }
        }
        Ok(true)
    }

    /// Re-roll geometry and color, rebuild the travel path over the current
    /// bounds, and rasterize once. Rasterization failure degrades to "shape
    /// not drawn this cycle"; the next regeneration retries.
    fn regenerate(&mut self, bounds: Bounds, rng: &mut dyn RandomSource) -> GlowdriftResult<()> {
        self.state = UnitState::Generating;

        let extent = self.cfg.shape_extent;
        self.kind = random_shape_kind(rng);
        let origin = random_point(rng, bounds, extent);
        self.anchor = Rect::new(origin.x, origin.y, origin.x + extent, origin.y + extent);
        self.color = random_color(rng);

        let waypoints = sample_waypoints(rng, bounds, extent, self.cfg.waypoints);
        self.path = TravelPath::build(Point::ZERO, &waypoints)?;

        self.alpha = 0.0;
        self.translation = Vec2::ZERO;
        self.fade_in.reset();
        self.travel.reset();
        self.fade_out.reset();

        self.job = RasterJob {
            kind: self.kind,
            anchor: self.anchor,
            start: self.color,
            end: with_alpha(self.color, 0.5),
            bounds,
        };
        self.cache.invalidate();
        if let Err(e) = self.cache.ensure(&self.job) {
            tracing::warn!(unit = self.id.0, error = %e, "rasterization skipped this cycle");
        }

        self.state = UnitState::FadingIn;
        Ok(())
    }
}
