use std::time::Duration;

use crate::grid::SimulationState;
use crate::processors::{elapsed_ms, Processor};

/// Moves every light one column to the right per `shift_delay`, dropping the
/// ones that leave the grid.
pub struct Scroller {
    shift_delay: f32,
    elapsed: f32,
}

impl Scroller {
    pub fn new(shift_delay: f32) -> Scroller {
        Scroller {
            shift_delay,
            elapsed: 0.0,
        }
    }
}

impl Processor for Scroller {
    fn name(&self) -> &str {
        "scroller"
    }

    fn step(&mut self, state: &mut SimulationState, delta: Duration) {
        self.elapsed += elapsed_ms(delta);
        if self.elapsed <= self.shift_delay {
            return;
        }
        self.elapsed = 0.0;

        for light in state.lights_mut() {
            light.col += 1;
        }
        let width = state.grid().width();
        let removed = state.retain_lights(|light| light.col < width);
        if removed > 0 {
            log::debug!("{removed} light(s) scrolled off the grid");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;

    #[test]
    fn drops_lights_leaving_the_right_edge() {
        let mut state = SimulationState::with_size(5, 3).unwrap();
        let last = state.spawn_light(1, 4, ColorValue::WHITE);
        let second_to_last = state.spawn_light(1, 3, ColorValue::WHITE);
        let mut scroller = Scroller::new(50.0);
        scroller.step(&mut state, Duration::from_millis(60));

        assert_eq!(state.lights().len(), 1);
        let survivor = &state.lights()[0];
        assert_eq!(survivor.id(), second_to_last);
        assert_ne!(survivor.id(), last);
        assert_eq!(survivor.col, 4);
    }

    #[test]
    fn waits_for_delay_before_shifting() {
        let mut state = SimulationState::with_size(5, 3).unwrap();
        state.spawn_light(0, 0, ColorValue::WHITE);
        let mut scroller = Scroller::new(100.0);

        scroller.step(&mut state, Duration::from_millis(70));
        assert_eq!(state.lights()[0].col, 0);
        scroller.step(&mut state, Duration::from_millis(70));
        assert_eq!(state.lights()[0].col, 1);

        // One shift per step at most, however long the step was.
        scroller.step(&mut state, Duration::from_secs(10));
        assert_eq!(state.lights()[0].col, 2);
    }

    #[test]
    fn keeps_rows_and_order() {
        let mut state = SimulationState::with_size(5, 3).unwrap();
        state.spawn_light(0, 0, ColorValue::WHITE);
        state.spawn_light(2, 1, ColorValue::WHITE);
        let mut scroller = Scroller::new(0.0);
        scroller.step(&mut state, Duration::from_millis(1));

        let positions: Vec<(usize, usize)> = state
            .lights()
            .iter()
            .map(|light| (light.row, light.col))
            .collect();
        assert_eq!(positions, vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn zero_delta_never_shifts() {
        let mut state = SimulationState::with_size(5, 3).unwrap();
        state.spawn_light(0, 0, ColorValue::WHITE);
        let mut scroller = Scroller::new(0.0);
        scroller.step(&mut state, Duration::ZERO);
        assert_eq!(state.lights()[0].col, 0);
    }
}
