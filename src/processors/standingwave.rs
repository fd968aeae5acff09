use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::time::Duration;

use crate::color::ColorValue;
use crate::grid::{LightId, SimulationState};
use crate::processors::{elapsed_ms, Processor};

/// A row of lights, one per column, arranged along a spatial sine whose
/// amplitude oscillates over time and whose shape may scroll sideways.
pub struct StandingWaveField {
    harmonic: u32,
    /// Temporal period in ms; zero holds the wave at full amplitude.
    speed: f32,
    color: ColorValue,
    /// Horizontal phase, in columns.
    offset: f32,
    /// Milliseconds per full horizontal cycle; zero disables scrolling.
    scan_speed: f32,
    accumulator: f32,
    lights: Vec<LightId>,
}

/// Baseline row of the wave shape at horizontal position `x`.
pub(crate) fn shape_row(x: f32, harmonic: u32, width: usize, height: usize) -> f32 {
    let span = width.saturating_sub(1).max(1) as f32;
    let wave = (x / span * PI * harmonic as f32).sin();
    (((wave + 1.0) / 2.0) * (height - 1) as f32).round()
}

impl StandingWaveField {
    /// `harmonic` is taken as given; configs with a zero harmonic are
    /// rejected before a field is built.
    pub fn new(
        harmonic: u32,
        speed: f32,
        color: ColorValue,
        offset: f32,
        scan_speed: f32,
    ) -> StandingWaveField {
        StandingWaveField {
            harmonic,
            speed,
            color,
            offset,
            scan_speed,
            accumulator: 0.0,
            lights: Vec::new(),
        }
    }

    fn wave_phase(&self) -> f32 {
        if self.speed > 0.0 {
            self.accumulator / self.speed * TAU
        } else {
            FRAC_PI_2
        }
    }
}

impl Processor for StandingWaveField {
    fn name(&self) -> &str {
        "standing_wave"
    }

    fn attach(&mut self, state: &mut SimulationState) {
        let width = state.grid().width();
        let height = state.grid().height();
        self.lights = (0..width)
            .map(|col| {
                let row = shape_row(col as f32 + self.offset, self.harmonic, width, height);
                state.spawn_light(row as usize, col, self.color)
            })
            .collect();
    }

    fn step(&mut self, state: &mut SimulationState, delta: Duration) {
        let elapsed = elapsed_ms(delta);
        let width = state.grid().width();
        let height = state.grid().height();
        let center = state.grid().center_row() as f32;

        if self.speed > 0.0 {
            self.accumulator = (self.accumulator + elapsed).rem_euclid(self.speed);
        }
        if self.scan_speed > 0.0 {
            let shift = elapsed / self.scan_speed * width as f32;
            self.offset = (self.offset + shift).rem_euclid(2.0 * width as f32);
        }
        let amplitude = self.wave_phase().sin();

        for light in state.lights_mut() {
            // Ids are handed out in ascending order, so the list stays sorted.
            if self.lights.binary_search(&light.id()).is_err() {
                continue;
            }
            let baseline = shape_row(light.col as f32 + self.offset, self.harmonic, width, height);
            let row = ((baseline - center) * amplitude + center).round();
            light.row = row.clamp(0.0, (height - 1) as f32) as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: ColorValue = ColorValue::new(0, 255, 0);

    fn attached(field: &mut StandingWaveField, width: usize, height: usize) -> SimulationState {
        let mut state = SimulationState::with_size(width, height).unwrap();
        field.attach(&mut state);
        state
    }

    fn rows(state: &SimulationState) -> Vec<usize> {
        state.lights().iter().map(|light| light.row).collect()
    }

    #[test]
    fn harmonic_one_endpoints_sit_on_center() {
        assert_eq!(shape_row(0.0, 1, 5, 5), 2.0);
        assert_eq!(shape_row(4.0, 1, 5, 5), 2.0);
        // Crest in the middle column.
        assert_eq!(shape_row(2.0, 1, 5, 5), 4.0);
    }

    #[test]
    fn spawns_one_light_per_column() {
        let mut field = StandingWaveField::new(1, 0.0, GREEN, 0.0, 0.0);
        let state = attached(&mut field, 5, 5);

        assert_eq!(field.lights.len(), 5);
        let cols: Vec<usize> = state.lights().iter().map(|light| light.col).collect();
        assert_eq!(cols, vec![0, 1, 2, 3, 4]);
        assert_eq!(rows(&state), vec![2, 3, 4, 3, 2]);
        assert!(state.lights().iter().all(|light| light.color == GREEN));
    }

    #[test]
    fn zero_speed_holds_full_amplitude() {
        let mut field = StandingWaveField::new(1, 0.0, GREEN, 0.0, 0.0);
        let mut state = attached(&mut field, 5, 5);
        for _ in 0..3 {
            field.step(&mut state, Duration::from_millis(123));
            assert_eq!(rows(&state), vec![2, 3, 4, 3, 2]);
        }
    }

    #[test]
    fn amplitude_oscillates_over_time() {
        let mut field = StandingWaveField::new(1, 1000.0, GREEN, 0.0, 0.0);
        let mut state = attached(&mut field, 5, 5);

        // Quarter period: sin(π/2) = 1, full shape.
        field.step(&mut state, Duration::from_millis(250));
        assert_eq!(rows(&state), vec![2, 3, 4, 3, 2]);

        // Half period: flat on the center row.
        field.step(&mut state, Duration::from_millis(250));
        assert_eq!(rows(&state), vec![2, 2, 2, 2, 2]);

        // Three quarters: mirrored around the center.
        field.step(&mut state, Duration::from_millis(250));
        assert_eq!(rows(&state), vec![2, 1, 0, 1, 2]);

        // Full period wraps back to the start.
        field.step(&mut state, Duration::from_millis(250));
        assert_eq!(rows(&state), vec![2, 2, 2, 2, 2]);
    }

    #[test]
    fn scanning_shifts_the_shape() {
        // 4000ms per cycle over 5 columns: 800ms moves the shape by one column.
        let mut field = StandingWaveField::new(1, 0.0, GREEN, 0.0, 4000.0);
        let mut state = attached(&mut field, 5, 5);
        field.step(&mut state, Duration::from_millis(800));
        assert_eq!(rows(&state), vec![3, 4, 3, 2, 1]);
    }

    #[test]
    fn offset_wraps_after_two_widths() {
        let mut field = StandingWaveField::new(1, 0.0, GREEN, 0.0, 1000.0);
        let mut state = attached(&mut field, 5, 5);
        let initial = rows(&state);
        field.step(&mut state, Duration::from_millis(2000));
        assert!(field.offset.abs() < 0.001);
        assert_eq!(rows(&state), initial);
    }

    #[test]
    fn rows_stay_in_bounds() {
        let mut field = StandingWaveField::new(3, 700.0, GREEN, 1.5, 300.0);
        let mut state = attached(&mut field, 9, 7);
        for _ in 0..50 {
            field.step(&mut state, Duration::from_millis(37));
            assert!(state.lights().iter().all(|light| light.row < 7));
        }
    }

    #[test]
    fn leaves_foreign_lights_alone() {
        let mut state = SimulationState::with_size(5, 5).unwrap();
        let stranger = state.spawn_light(0, 3, GREEN);
        let mut field = StandingWaveField::new(1, 0.0, GREEN, 0.0, 0.0);
        field.attach(&mut state);
        field.step(&mut state, Duration::from_millis(10));

        let light = state
            .lights()
            .iter()
            .find(|light| light.id() == stranger)
            .unwrap();
        assert_eq!((light.row, light.col), (0, 3));
    }

    #[test]
    fn tolerates_removed_lights() {
        let mut field = StandingWaveField::new(1, 0.0, GREEN, 0.0, 0.0);
        let mut state = attached(&mut field, 5, 5);
        state.retain_lights(|light| light.col < 2);
        field.step(&mut state, Duration::from_millis(10));
        assert_eq!(rows(&state), vec![2, 3]);
    }

    #[test]
    fn single_column_grid() {
        let mut field = StandingWaveField::new(1, 0.0, GREEN, 0.0, 0.0);
        let mut state = attached(&mut field, 1, 3);
        field.step(&mut state, Duration::from_millis(10));
        assert_eq!(rows(&state), vec![1]);
    }
}
