//! Turns wall-clock time into pipeline steps and hands finished frames to a
//! renderer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::grid::SimulationGrid;
use crate::pipeline::Pipeline;

/// Receives every completed frame.
pub trait Renderer {
    fn render(&mut self, grid: &SimulationGrid);
}

impl<F> Renderer for F
where
    F: FnMut(&SimulationGrid),
{
    fn render(&mut self, grid: &SimulationGrid) {
        self(grid)
    }
}

/// Blocks until the host wants the next frame.
pub trait FrameScheduler {
    fn wait_for_frame(&mut self);
}

pub struct FrameDriver<R: Renderer> {
    pipeline: Pipeline,
    renderer: R,
    last_frame: Option<Instant>,
    frames: u64,
}

impl<R: Renderer> FrameDriver<R> {
    pub fn new(pipeline: Pipeline, renderer: R) -> FrameDriver<R> {
        FrameDriver {
            pipeline,
            renderer,
            last_frame: None,
            frames: 0,
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Renders the frame for `now`. The first frame gets a zero delta, later
    /// ones the time since the previous call (never negative).
    pub fn frame_at(&mut self, now: Instant) -> Duration {
        let delta = match self.last_frame {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last_frame = Some(now);
        self.advance(delta);
        delta
    }

    /// Steps the pipeline by an explicit delta and renders the result.
    pub fn advance(&mut self, delta: Duration) {
        self.pipeline.step(delta);
        self.renderer.render(self.pipeline.grid());
        self.frames += 1;
    }

    /// Renders frames until `running` is cleared or `max_frames` were drawn
    /// by this call. Returns how many frames were drawn.
    pub fn run<S: FrameScheduler>(
        &mut self,
        scheduler: &mut S,
        running: &AtomicBool,
        max_frames: Option<u64>,
    ) -> u64 {
        let mut rendered = 0;
        while running.load(Ordering::SeqCst) {
            if max_frames.is_some_and(|max| rendered >= max) {
                break;
            }
            scheduler.wait_for_frame();
            self.frame_at(Instant::now());
            rendered += 1;
        }
        rendered
    }
}
