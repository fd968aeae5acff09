//! The frame buffer and the light sources that get composited into it.

use std::fmt;
use std::ops::Index;

use crate::color::ColorValue;

/// Errors arising from grid construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The grid needs at least one column.
    EmptyWidth,
    /// Vertical centering needs an exact middle row.
    EvenHeight {
        /// The rejected height.
        height: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWidth => write!(f, "grid width must be at least 1"),
            Self::EvenHeight { height } => {
                write!(f, "grid height must be odd, got {height}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Identity of a light source, unique within one [`SimulationState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LightId(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct LightSource {
    id: LightId,
    pub row: usize,
    pub col: usize,
    pub color: ColorValue,
}

impl LightSource {
    pub fn id(&self) -> LightId {
        self.id
    }
}

/// Fixed-size, row-major grid of colors.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationGrid {
    width: usize,
    height: usize,
    cells: Vec<ColorValue>,
}

impl SimulationGrid {
    pub fn new(width: usize, height: usize) -> Result<SimulationGrid, GridError> {
        if width == 0 {
            return Err(GridError::EmptyWidth);
        }
        if height % 2 == 0 {
            return Err(GridError::EvenHeight { height });
        }

        Ok(SimulationGrid {
            width,
            height,
            cells: vec![ColorValue::BLACK; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Index of the middle row, `floor(height / 2)`.
    pub fn center_row(&self) -> usize {
        self.height / 2
    }

    /// Whether a signed coordinate lies inside the grid, edges included.
    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as u64) < self.height as u64 && (col as u64) < self.width as u64
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut ColorValue> {
        match self.index_of(row, col) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    /// Overwrites a cell. Returns `false` if the position is outside the grid.
    pub fn set(&mut self, row: usize, col: usize, color: ColorValue) -> bool {
        match self.get_mut(row, col) {
            Some(cell) => {
                *cell = color;
                true
            }
            None => false,
        }
    }

    /// Adds onto a cell, saturating. Out-of-bounds positions are ignored.
    pub fn add(&mut self, row: usize, col: usize, color: ColorValue) {
        if let Some(cell) = self.get_mut(row, col) {
            *cell = cell.add(color);
        }
    }

    pub fn cells(&self) -> &[ColorValue] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut ColorValue> {
        self.cells.iter_mut()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[ColorValue]> {
        self.cells.chunks(self.width)
    }

    fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }
}

impl Index<(usize, usize)> for SimulationGrid {
    type Output = ColorValue;

    fn index(&self, (row, col): (usize, usize)) -> &ColorValue {
        match self.index_of(row, col) {
            Some(i) => &self.cells[i],
            None => panic!(
                "cell ({row}, {col}) outside {}x{} grid",
                self.width, self.height
            ),
        }
    }
}

/// The grid plus every active light source.
#[derive(Clone, Debug)]
pub struct SimulationState {
    grid: SimulationGrid,
    lights: Vec<LightSource>,
    next_id: u64,
}

impl SimulationState {
    pub fn new(grid: SimulationGrid) -> SimulationState {
        SimulationState {
            grid,
            lights: Vec::new(),
            next_id: 0,
        }
    }

    pub fn with_size(width: usize, height: usize) -> Result<SimulationState, GridError> {
        SimulationGrid::new(width, height).map(SimulationState::new)
    }

    pub fn grid(&self) -> &SimulationGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut SimulationGrid {
        &mut self.grid
    }

    pub fn lights(&self) -> &[LightSource] {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut [LightSource] {
        &mut self.lights
    }

    /// Borrow the grid mutably while reading the lights.
    pub fn split_mut(&mut self) -> (&mut SimulationGrid, &[LightSource]) {
        (&mut self.grid, &self.lights)
    }

    pub fn spawn_light(&mut self, row: usize, col: usize, color: ColorValue) -> LightId {
        let id = LightId(self.next_id);
        self.next_id += 1;
        self.lights.push(LightSource {
            id,
            row,
            col,
            color,
        });
        id
    }

    /// Keeps only the lights matching `keep`, in their original order.
    /// Returns how many were removed.
    pub fn retain_lights<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&LightSource) -> bool,
    {
        let before = self.lights.len();
        self.lights.retain(keep);
        before - self.lights.len()
    }
}
