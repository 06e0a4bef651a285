use crate::{
    animation::ease::Ease,
    foundation::error::{GlowdriftError, GlowdriftResult},
};

/// A single fixed-duration animation window advanced by explicit time deltas.
///
/// Timelines replace host-driven animation listeners: the owner calls
/// [`Timeline::advance`] from its own tick and reads the eased progress back.
#[derive(Clone, Copy, Debug)]
pub struct Timeline {
    duration: f64,
    elapsed: f64,
    ease: Ease,
}

impl Timeline {
    /// Build a timeline over `duration` seconds.
    pub fn new(duration: f64, ease: Ease) -> GlowdriftResult<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(GlowdriftError::validation(
                "Timeline duration must be finite and > 0",
            ));
        }
        Ok(Self {
            duration,
            elapsed: 0.0,
            ease,
        })
    }

    /// Advance by `dt` seconds and return the unconsumed overshoot beyond the
    /// timeline's end (0 while still running).
    ///
    /// Returning the overshoot lets a caller chain timelines without losing
    /// time across a boundary, which keeps mocked-clock tests exact.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let dt = dt.max(0.0);
        let remaining = self.duration - self.elapsed;
        if dt >= remaining {
            self.elapsed = self.duration;
            dt - remaining
        } else {
            self.elapsed += dt;
            0.0
        }
    }

    /// Raw elapsed fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.ease.apply(self.fraction())
    }

    /// Whether the window has fully elapsed.
    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Rewind to the start, keeping duration and easing.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
