use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grid::SimulationState;
use crate::processors::{time_fraction, Processor};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayPolicy {
    /// Every channel loses the same absolute amount.
    LinearSubtract,
    /// Every cell is scaled towards black.
    #[default]
    Multiplicative,
}

/// Fades the whole grid towards black, independent of light sources.
pub struct Decay {
    delay: f32,
    policy: DecayPolicy,
}

impl Decay {
    pub fn new(delay: f32, policy: DecayPolicy) -> Decay {
        Decay { delay, policy }
    }
}

impl Processor for Decay {
    fn name(&self) -> &str {
        "decay"
    }

    fn step(&mut self, state: &mut SimulationState, delta: Duration) {
        let fraction = time_fraction(delta, self.delay);
        if fraction == 0.0 {
            return;
        }

        let lit = state.grid_mut().cells_mut().filter(|cell| !cell.is_black());
        match self.policy {
            DecayPolicy::LinearSubtract => {
                let amount = -(fraction * 255.0).round();
                for cell in lit {
                    *cell = cell.add_components(amount, amount, amount);
                }
            }
            DecayPolicy::Multiplicative => {
                let keep = 1.0 - fraction;
                for cell in lit {
                    *cell = cell.dim(keep);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;

    fn lit_state() -> SimulationState {
        let mut state = SimulationState::with_size(4, 3).unwrap();
        let grid = state.grid_mut();
        grid.set(0, 0, ColorValue::new(255, 255, 255));
        grid.set(1, 2, ColorValue::new(100, 50, 10));
        grid.set(2, 3, ColorValue::new(1, 2, 3));
        state
    }

    #[test]
    fn full_fraction_blacks_out_in_one_step() {
        for policy in [DecayPolicy::Multiplicative, DecayPolicy::LinearSubtract] {
            let mut state = lit_state();
            let mut decay = Decay::new(100.0, policy);
            decay.step(&mut state, Duration::from_millis(100));
            assert!(
                state.grid().cells().iter().all(ColorValue::is_black),
                "{policy:?} left light behind"
            );
        }
    }

    #[test]
    fn multiplicative_scales_proportionally() {
        let mut state = lit_state();
        let mut decay = Decay::new(1000.0, DecayPolicy::Multiplicative);
        decay.step(&mut state, Duration::from_millis(500));
        assert_eq!(state.grid()[(1, 2)], ColorValue::new(50, 25, 5));
        assert_eq!(state.grid()[(0, 0)], ColorValue::new(128, 128, 128));
    }

    #[test]
    fn linear_subtract_removes_same_amount_everywhere() {
        let mut state = lit_state();
        let mut decay = Decay::new(1000.0, DecayPolicy::LinearSubtract);
        // round(0.2 * 255) = 51
        decay.step(&mut state, Duration::from_millis(200));
        assert_eq!(state.grid()[(0, 0)], ColorValue::new(204, 204, 204));
        assert_eq!(state.grid()[(1, 2)], ColorValue::new(49, 0, 0));
        assert_eq!(state.grid()[(2, 3)], ColorValue::BLACK);
    }

    #[test]
    fn zero_delta_is_a_no_op() {
        let mut state = lit_state();
        let before = state.grid().clone();
        let mut decay = Decay::new(0.0, DecayPolicy::Multiplicative);
        decay.step(&mut state, Duration::ZERO);
        assert_eq!(state.grid(), &before);
    }

    #[test]
    fn zero_delay_is_instant() {
        let mut state = lit_state();
        let mut decay = Decay::new(0.0, DecayPolicy::LinearSubtract);
        decay.step(&mut state, Duration::from_millis(1));
        assert!(state.grid().cells().iter().all(ColorValue::is_black));
    }

    #[test]
    fn ignores_light_sources() {
        let mut state = SimulationState::with_size(4, 3).unwrap();
        state.spawn_light(1, 1, ColorValue::WHITE);
        let mut decay = Decay::new(10.0, DecayPolicy::Multiplicative);
        decay.step(&mut state, Duration::from_millis(10));
        assert_eq!(state.lights().len(), 1);
    }
}
