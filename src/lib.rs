//! Glowdrift renders an ambient decorative surface: a container spawns a
//! bounded series of animated shapes, each with randomized geometry, gradient
//! color, and a multi-segment curved motion path, fading in, drifting, and
//! fading out in a continuous per-shape loop, composited under a blur.
//!
//! # Pipeline overview
//!
//! 1. **Spawn**: [`Container`] staggers up to `max_units` [`ShapeUnit`]s into
//!    existence at randomized short intervals.
//! 2. **Animate**: each unit drives its own Generating → FadingIn → Traveling
//!    → FadingOut cycle from explicit `advance(dt)` calls; fade-in and travel
//!    run concurrently by design.
//! 3. **Compose**: [`Container::render`] blits each unit's cached
//!    full-opacity raster at its current alpha and translation into a
//!    premultiplied [`FrameRgba`], then blurs the result.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Explicit time**: all timelines advance by caller-supplied deltas; there
//!   are no host animation callbacks and nothing fires after teardown.
//! - **Injectable randomness**: every draw goes through [`RandomSource`];
//!   production uses entropy, tests use [`SplitMix64`].
//! - **Rasterize once per cycle**: shape geometry is rendered to an offscreen
//!   raster only when it changes; per-frame cost is an alpha-scaled blit.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod effects;
mod foundation;
mod motion;
mod random;
mod render;
mod scene;

pub use animation::ease::Ease;
pub use animation::timeline::Timeline;
pub use effects::blur::{EdgeMode, apply_blur};
pub use effects::noise::{IdentityNoise, NoiseFilter};
pub use foundation::core::{
    Bounds, Edges, MeasureSpec, Pixmap, Point, Rect, Rgba8, Vec2, resolve_measured_extent,
};
pub use foundation::error::{GlowdriftError, GlowdriftResult};
pub use motion::path::{TravelPath, Waypoint, sample_waypoints};
pub use random::geometry::{
    ShapeKind, random_color, random_point, random_shape_kind, with_alpha,
};
pub use random::source::{EntropySource, RandomSource, SplitMix64};
pub use render::compose::FrameRgba;
pub use render::raster::{RasterJob, SurfaceCache};
pub use scene::config::SurfaceConfig;
pub use scene::container::Container;
pub use scene::scheduler::SpawnScheduler;
pub use scene::unit::{ShapeUnit, UnitId, UnitState};
