use std::time::Duration;

use crate::color::ColorValue;
use crate::grid::SimulationState;
use crate::processors::Processor;

/// Overwrites a fixed bitmap of cells with a single color every frame.
pub struct PatternOverlay {
    anchor: (i64, i64),
    offsets: Vec<(i64, i64)>,
    color: ColorValue,
}

impl PatternOverlay {
    pub fn new(anchor: (i64, i64), offsets: Vec<(i64, i64)>, color: ColorValue) -> PatternOverlay {
        PatternOverlay {
            anchor,
            offsets,
            color,
        }
    }

    /// Builds the offsets from ASCII art: `#` is lit, anything else is
    /// transparent. The first character of the first line sits on the anchor.
    pub fn from_bitmap<S: AsRef<str>>(
        anchor: (i64, i64),
        bitmap: &[S],
        color: ColorValue,
    ) -> PatternOverlay {
        let offsets = bitmap
            .iter()
            .enumerate()
            .flat_map(|(d_row, line)| {
                line.as_ref()
                    .chars()
                    .enumerate()
                    .filter(|(_, c)| *c == '#')
                    .map(move |(d_col, _)| (d_row as i64, d_col as i64))
                    .collect::<Vec<_>>()
            })
            .collect();
        PatternOverlay::new(anchor, offsets, color)
    }
}

impl Processor for PatternOverlay {
    fn name(&self) -> &str {
        "pattern_overlay"
    }

    fn step(&mut self, state: &mut SimulationState, _: Duration) {
        let grid = state.grid_mut();
        for (d_row, d_col) in &self.offsets {
            let (Some(row), Some(col)) = (
                self.anchor.0.checked_add(*d_row),
                self.anchor.1.checked_add(*d_col),
            ) else {
                continue;
            };
            if grid.contains(row, col) {
                grid.set(row as usize, col as usize, self.color);
            }
        }
    }
}
