use crate::{
    effects::blur::{EdgeMode, apply_blur},
    effects::noise::NoiseFilter,
    foundation::core::{Bounds, Edges, MeasureSpec, resolve_measured_extent},
    foundation::error::GlowdriftResult,
    random::source::{EntropySource, RandomSource},
    render::compose::{FrameRgba, blit_premul_over},
    scene::config::SurfaceConfig,
    scene::scheduler::SpawnScheduler,
    scene::unit::{ShapeUnit, UnitId},
};

/// The ambient surface: an arena of independently animating shape units plus
/// the staggered scheduler that populates it.
///
/// All timelines are driven from [`Container::advance`] on one thread; units
/// are appended by the scheduler and only iterated elsewhere, and each unit's
/// mutable state is written solely by its own advance, so no locking exists.
/// Dropping the container drops every unit; the pull model leaves no pending
/// host timers to fire after teardown.
pub struct Container {
    cfg: SurfaceConfig,
    bounds: Bounds,
    padding: Edges,
    scheduler: SpawnScheduler,
    units: Vec<ShapeUnit>,
    rng: Box<dyn RandomSource>,
    noise: Option<Box<dyn NoiseFilter>>,
}

impl Container {
    /// Build a surface with entropy-backed randomness.
    pub fn new(cfg: SurfaceConfig, bounds: Bounds) -> GlowdriftResult<Self> {
        Self::with_random_source(cfg, bounds, Box::new(EntropySource))
    }

    /// Build a surface drawing all randomness from `rng`.
    pub fn with_random_source(
        cfg: SurfaceConfig,
        bounds: Bounds,
        rng: Box<dyn RandomSource>,
    ) -> GlowdriftResult<Self> {
        cfg.validate()?;
        Ok(Self {
            scheduler: SpawnScheduler::new(cfg.max_units, cfg.spawn_delay_max_secs),
            cfg,
            bounds,
            padding: Edges::default(),
            units: Vec::new(),
            rng,
            noise: None,
        })
    }

    /// Current container bounds.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Resize the container. In-flight cycles keep their geometry; only the
    /// next Generating phase of each unit samples the new bounds.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Set the padding used by the measurement contract.
    pub fn set_padding(&mut self, padding: Edges) {
        self.padding = padding;
    }

    /// Resolve a host measurement request and adopt the result as bounds:
    /// exact sizes as requested, unconstrained suggestions grown by this
    /// container's own padding on the relevant axis.
    pub fn measure(&mut self, width: MeasureSpec, height: MeasureSpec) -> GlowdriftResult<Bounds> {
        let w = resolve_measured_extent(width, self.padding.left, self.padding.right);
        let h = resolve_measured_extent(height, self.padding.top, self.padding.bottom);
        let bounds = Bounds::new(w, h)?;
        self.bounds = bounds;
        Ok(bounds)
    }

    /// Install a post-blur noise filter. No filter is installed by default.
    pub fn set_noise_filter(&mut self, filter: Box<dyn NoiseFilter>) {
        self.noise = Some(filter);
    }

    /// The population, in spawn order.
    pub fn units(&self) -> &[ShapeUnit] {
        &self.units
    }

    /// Units spawned so far.
    pub fn spawn_cursor(&self) -> u32 {
        self.scheduler.spawn_cursor()
    }

    /// Advance the scheduler and every unit by `dt` seconds.
    ///
    /// Units spawned within this tick start animating on the next one; the
    /// host may coalesce repaints however it likes. Returns whether anything
    /// progressed.
    pub fn advance(&mut self, dt: f64) -> GlowdriftResult<bool> {
        let bounds = self.bounds;
        let mut repaint = false;

        for unit in self.units.iter_mut() {
            repaint |= unit.advance(dt, bounds, self.rng.as_mut())?;
        }

        let to_spawn = self.scheduler.advance(dt, self.rng.as_mut());
        for _ in 0..to_spawn {
            let id = UnitId(self.units.len() as u32);
            let unit = ShapeUnit::new(id, &self.cfg, bounds, self.rng.as_mut())?;
            self.units.push(unit);
            tracing::debug!(unit = id.0, population = self.units.len(), "unit spawned");
            repaint = true;
        }

        Ok(repaint)
    }

    /// Compose the current frame: every unit's cached raster at its current
    /// alpha and translation, then the blur pass, then the noise hook.
    #[tracing::instrument(skip(self))]
    pub fn render(&self) -> GlowdriftResult<FrameRgba> {
        let mut frame = FrameRgba::transparent(self.bounds)?;

        for unit in &self.units {
            let Some(raster) = unit.cached_raster() else {
                continue;
            };
            let t = unit.translation();
            blit_premul_over(
                &mut frame,
                &raster,
                t.x.round() as i64,
                t.y.round() as i64,
                unit.alpha(),
            )?;
        }

        if self.cfg.blur_radius > 0 {
            apply_blur(
                &mut frame,
                self.cfg.blur_radius,
                self.cfg.blur_radius,
                EdgeMode::Repeat,
            )?;
        }

        if let Some(noise) = &self.noise {
            noise.apply(&mut frame)?;
        }

        Ok(frame)
    }
}
