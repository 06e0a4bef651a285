use crate::{
    animation::ease::Ease,
    foundation::error::{GlowdriftError, GlowdriftResult},
};

/// Tunables for an ambient surface.
///
/// The defaults reproduce the reference look: 1500-unit shapes, up to 20
/// concurrent units, 5 s fades, ten 8 s travel segments, and a heavy blur.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Side length of every shape's anchor square, in pixels.
    pub shape_extent: f64,
    /// Population cap; the scheduler goes inert once reached.
    pub max_units: u32,
    /// Duration of each fade-in and fade-out, in seconds.
    pub fade_secs: f64,
    /// Duration of one travel segment, in seconds.
    pub segment_secs: f64,
    /// Number of waypoints (and so quadratic segments) per travel path.
    pub waypoints: u32,
    /// Upper bound of the randomized delay between spawns, in seconds.
    pub spawn_delay_max_secs: f64,
    /// Gaussian blur radius applied to the composed frame; 0 disables.
    pub blur_radius: u32,
    /// Easing applied to the travel timeline.
    pub travel_ease: Ease,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            shape_extent: 1500.0,
            max_units: 20,
            fade_secs: 5.0,
            segment_secs: 8.0,
            waypoints: 10,
            spawn_delay_max_secs: 5.0,
            blur_radius: 170,
            travel_ease: Ease::drift(),
        }
    }
}

impl SurfaceConfig {
    /// Total travel duration: `waypoints * segment_secs`.
    pub fn travel_secs(&self) -> f64 {
        f64::from(self.waypoints) * self.segment_secs
    }

    /// Validate static invariants.
    ///
    /// Travel must outlast the fade so fade-out (gated on travel completion)
    /// never overlaps fade-in.
    pub fn validate(&self) -> GlowdriftResult<()> {
        if !self.shape_extent.is_finite() || self.shape_extent < 1.0 {
            return Err(GlowdriftError::validation(
                "shape_extent must be finite and >= 1",
            ));
        }
        if self.max_units == 0 {
            return Err(GlowdriftError::validation("max_units must be > 0"));
        }
        if !self.fade_secs.is_finite() || self.fade_secs <= 0.0 {
            return Err(GlowdriftError::validation(
                "fade_secs must be finite and > 0",
            ));
        }
        if !self.segment_secs.is_finite() || self.segment_secs <= 0.0 {
            return Err(GlowdriftError::validation(
                "segment_secs must be finite and > 0",
            ));
        }
        if self.waypoints == 0 {
            return Err(GlowdriftError::validation("waypoints must be > 0"));
        }
        if !self.spawn_delay_max_secs.is_finite() || self.spawn_delay_max_secs < 0.0 {
            return Err(GlowdriftError::validation(
                "spawn_delay_max_secs must be finite and >= 0",
            ));
        }
        if self.travel_secs() < self.fade_secs {
            return Err(GlowdriftError::validation(
                "travel duration must be >= fade_secs",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_match_reference_timings() {
        let cfg = SurfaceConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.shape_extent, 1500.0);
        assert_eq!(cfg.max_units, 20);
        assert_eq!(cfg.travel_secs(), 80.0);
        assert_eq!(cfg.blur_radius, 170);
    }

    #[test]
    fn zero_durations_are_rejected() {
        let mut cfg = SurfaceConfig::default();
        cfg.fade_secs = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = SurfaceConfig::default();
        cfg.segment_secs = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = SurfaceConfig::default();
        cfg.waypoints = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn travel_shorter_than_fade_is_rejected() {
        let mut cfg = SurfaceConfig::default();
        cfg.waypoints = 1;
        cfg.segment_secs = 1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_spawn_delay_is_allowed() {
        let mut cfg = SurfaceConfig::default();
        cfg.spawn_delay_max_secs = 0.0;
        cfg.validate().unwrap();
    }

    #[test]
    fn config_roundtrips_through_json() {
        let cfg = SurfaceConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: SurfaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_units, cfg.max_units);
        assert_eq!(back.shape_extent, cfg.shape_extent);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SurfaceConfig = serde_json::from_str(r#"{"max_units": 3}"#).unwrap();
        assert_eq!(cfg.max_units, 3);
        assert_eq!(cfg.fade_secs, 5.0);
    }
}
