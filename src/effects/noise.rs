use crate::{foundation::error::GlowdriftResult, render::compose::FrameRgba};

/// Post-blur frame filter hook.
///
/// Reserved extension point for grain/noise treatments; the container applies
/// it after the blur pass when one is installed. Callers must not assume any
/// visual effect from the default implementation.
pub trait NoiseFilter {
    /// Filter the composed frame in place.
    fn apply(&self, frame: &mut FrameRgba) -> GlowdriftResult<()>;
}

/// Default filter: returns the frame unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityNoise;

impl NoiseFilter for IdentityNoise {
    fn apply(&self, _frame: &mut FrameRgba) -> GlowdriftResult<()> {
        Ok(())
    }
}
