use std::time::Duration;

use crate::grid::SimulationState;
use crate::processors::{time_fraction, Processor};

const NEIGHBOURS: [(i64, i64); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Composites every light source onto the grid, optionally bleeding into
/// the four orthogonal neighbours.
pub struct Propagate {
    transmission_delay: f32,
    diffuse: f32,
}

impl Propagate {
    pub fn new(transmission_delay: f32, diffuse: f32) -> Propagate {
        Propagate {
            transmission_delay,
            diffuse: diffuse.clamp(0.0, 1.0),
        }
    }
}

impl Processor for Propagate {
    fn name(&self) -> &str {
        "propagate"
    }

    fn step(&mut self, state: &mut SimulationState, delta: Duration) {
        let luminosity = time_fraction(delta, self.transmission_delay);
        let (grid, lights) = state.split_mut();

        for light in lights {
            if light.row >= grid.height() || light.col >= grid.width() {
                continue;
            }
            grid.add(light.row, light.col, light.color.dim(luminosity));

            if self.diffuse > 0.0 {
                let spill = light.color.dim(self.diffuse * luminosity);
                for (d_row, d_col) in NEIGHBOURS {
                    let row = light.row as i64 + d_row;
                    let col = light.col as i64 + d_col;
                    if grid.contains(row, col) {
                        grid.add(row as usize, col as usize, spill);
                    }
                }
            }
        }
    }
}
