use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color},
    terminal,
};

use crate::framedriver::Renderer;
use crate::grid::SimulationGrid;

/// Draws the grid as true-color blocks, two columns per cell.
pub struct TerminalOutput<W: Write> {
    out: W,
}

impl TerminalOutput<io::Stdout> {
    pub fn stdout() -> io::Result<Self> {
        let mut output = TerminalOutput::new(io::stdout());
        queue!(
            output.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        output.out.flush()?;
        Ok(output)
    }
}

impl<W: Write> TerminalOutput<W> {
    pub fn new(out: W) -> Self {
        TerminalOutput { out }
    }

    pub fn draw(&mut self, grid: &SimulationGrid) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0))?;
        for row in grid.rows() {
            for cell in row {
                let (r, g, b) = cell.into_components();
                queue!(
                    self.out,
                    style::SetBackgroundColor(Color::Rgb { r, g, b }),
                    style::Print("  ")
                )?;
            }
            queue!(self.out, style::ResetColor, style::Print("\r\n"))?;
        }
        self.out.flush()
    }
}

impl<W: Write> Renderer for TerminalOutput<W> {
    fn render(&mut self, grid: &SimulationGrid) {
        if let Err(err) = self.draw(grid) {
            log::warn!("Failed to draw frame: {err}");
        }
    }
}

impl<W: Write> Drop for TerminalOutput<W> {
    fn drop(&mut self) {
        let restored = queue!(self.out, style::ResetColor, cursor::Show);
        if let Err(err) = restored.and_then(|_| self.out.flush()) {
            log::error!("Cannot restore terminal: {err}");
        }
    }
}
