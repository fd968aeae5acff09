use std::f32::consts::TAU;
use std::time::Duration;

use crate::colorgen::ColorFn;
use crate::grid::{SimulationGrid, SimulationState};
use crate::processors::{elapsed_ms, Processor};

/// Injects light pulses at the left edge, sweeping up and down along a sine.
pub struct PeriodicEmitter {
    /// Radians per second.
    speed: f32,
    delay: f32,
    colors: ColorFn,
    phase: f32,
    elapsed: f32,
}

impl PeriodicEmitter {
    pub fn new(speed: f32, delay: f32, colors: ColorFn) -> PeriodicEmitter {
        PeriodicEmitter {
            speed,
            delay,
            colors,
            phase: 0.0,
            elapsed: 0.0,
        }
    }

    fn target_row(&self, grid: &SimulationGrid) -> usize {
        let center = grid.center_row() as i64;
        let row = (self.phase.sin() * center as f32).round() as i64 + center;
        row.clamp(0, grid.height() as i64 - 1) as usize
    }
}

impl Processor for PeriodicEmitter {
    fn name(&self) -> &str {
        "periodic_emitter"
    }

    fn step(&mut self, state: &mut SimulationState, delta: Duration) {
        self.phase = (self.phase + self.speed * delta.as_secs_f32()).rem_euclid(TAU);
        let row = self.target_row(state.grid());

        self.elapsed += elapsed_ms(delta);
        if self.elapsed > self.delay {
            self.elapsed = 0.0;
            let color = (self.colors)();
            let id = state.spawn_light(row, 0, color);
            log::debug!("Spawned light {id:?} at row {row} with {color:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorValue;
    use crate::colorgen::ColorScheme;

    const BLUE: ColorValue = ColorValue::new(0, 0, 255);

    fn emitter(speed: f32, delay: f32) -> PeriodicEmitter {
        PeriodicEmitter::new(speed, delay, ColorScheme::Fixed { color: BLUE }.into_fn())
    }

    #[test]
    fn emits_only_after_delay_is_exceeded() {
        let mut state = SimulationState::with_size(20, 5).unwrap();
        let mut emitter = emitter(0.0, 100.0);

        emitter.step(&mut state, Duration::from_millis(60));
        assert!(state.lights().is_empty());
        emitter.step(&mut state, Duration::from_millis(30));
        assert!(state.lights().is_empty());
        emitter.step(&mut state, Duration::from_millis(20));
        assert_eq!(state.lights().len(), 1);

        // The accumulator restarts from zero after each emission.
        emitter.step(&mut state, Duration::from_millis(60));
        assert_eq!(state.lights().len(), 1);
        emitter.step(&mut state, Duration::from_millis(60));
        assert_eq!(state.lights().len(), 2);
    }

    #[test]
    fn emits_at_left_edge_with_generated_color() {
        let mut state = SimulationState::with_size(20, 5).unwrap();
        let mut emitter = emitter(0.0, 10.0);
        emitter.step(&mut state, Duration::from_millis(20));

        let light = &state.lights()[0];
        assert_eq!(light.col, 0);
        assert_eq!(light.row, 2);
        assert_eq!(light.color, BLUE);
    }

    #[test]
    fn row_follows_sine_around_center() {
        let mut state = SimulationState::with_size(20, 5).unwrap();
        // A quarter turn per second puts the phase at the crest after 1s.
        let mut emitter = emitter(TAU / 4.0, 500.0);
        emitter.step(&mut state, Duration::from_millis(1000));
        assert_eq!(state.lights()[0].row, 4);

        emitter.step(&mut state, Duration::from_millis(2000));
        assert_eq!(state.lights()[1].row, 0);
    }

    #[test]
    fn single_row_grid_stays_on_row_zero() {
        let mut state = SimulationState::with_size(3, 1).unwrap();
        let mut emitter = emitter(1.3, 0.0);
        for _ in 0..5 {
            emitter.step(&mut state, Duration::from_millis(333));
        }
        assert!(state.lights().iter().all(|light| light.row == 0));
    }

    #[test]
    fn zero_delta_does_not_emit() {
        let mut state = SimulationState::with_size(20, 5).unwrap();
        let mut emitter = emitter(1.0, 0.0);
        emitter.step(&mut state, Duration::ZERO);
        assert!(state.lights().is_empty());
    }
}
