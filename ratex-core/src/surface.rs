/// Seam between the trial state machine and whatever actually draws. The
/// controller mutates the visible surface only through this trait, so a
/// software rasterizer, a DOM binding, or nothing at all can sit behind it.
pub trait TrialSurface {
    /// Move the slider thumb for one scale.
    fn set_thumb(&mut self, index: usize, value: i64);
    /// Mirror a scale's current value into its numeric readout.
    fn set_readout(&mut self, index: usize, value: i64);
    /// Tear down the surface. Dropping the rendered elements also drops any
    /// interaction bindings attached to them; nothing may leak past Done.
    fn clear(&mut self);
}

/// Surface that draws nothing. Backs headless tests and data-only simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl TrialSurface for NullSurface {
    fn set_thumb(&mut self, _index: usize, _value: i64) {}
    fn set_readout(&mut self, _index: usize, _value: i64) {}
    fn clear(&mut self) {}
}
