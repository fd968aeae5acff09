pub(crate) mod decay;
pub(crate) mod oscillator;
pub(crate) mod propagate;
pub(crate) mod scroller;
pub(crate) mod stamper;
pub(crate) mod standingwave;

use std::time::Duration;

use crate::grid::SimulationState;

pub use decay::{Decay, DecayPolicy};
pub use oscillator::PeriodicEmitter;
pub use propagate::Propagate;
pub use scroller::Scroller;
pub use stamper::PatternOverlay;
pub use standingwave::StandingWaveField;

/// One stage of the per-frame pipeline.
pub trait Processor {
    fn name(&self) -> &str;

    /// Called once when the processor joins a pipeline, before the first step.
    fn attach(&mut self, _state: &mut SimulationState) {}

    fn step(&mut self, state: &mut SimulationState, delta: Duration);
}

pub(crate) fn elapsed_ms(delta: Duration) -> f32 {
    delta.as_secs_f32() * 1000.0
}

/// `delta / time_constant`, clamped to [0, 1].
///
/// A zero (or negative) time constant means "instant": any positive delta
/// yields the full effect.
pub(crate) fn time_fraction(delta: Duration, time_constant_ms: f32) -> f32 {
    let elapsed = elapsed_ms(delta);
    if time_constant_ms <= 0.0 {
        return if elapsed > 0.0 { 1.0 } else { 0.0 };
    }
    (elapsed / time_constant_ms).clamp(0.0, 1.0)
}
