use std::time::Duration;

use crate::grid::{SimulationGrid, SimulationState};
use crate::processors::Processor;

/// An ordered chain of processors and the state they share.
///
/// Processors run in the order they were added, every step. Each one sees
/// the finished work of those before it.
pub struct Pipeline {
    state: SimulationState,
    processors: Vec<Box<dyn Processor>>,
}

impl Pipeline {
    pub fn new(state: SimulationState) -> Pipeline {
        Pipeline {
            state,
            processors: Vec::new(),
        }
    }

    pub fn push(&mut self, mut processor: Box<dyn Processor>) {
        processor.attach(&mut self.state);
        self.processors.push(processor);
    }

    pub fn step(&mut self, delta: Duration) {
        for processor in &mut self.processors {
            processor.step(&mut self.state, delta);
        }
    }

    pub fn grid(&self) -> &SimulationGrid {
        self.state.grid()
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }
}

#[cfg(test)]
impl Pipeline {
    pub fn with<P: Processor + 'static>(mut self, processor: P) -> Pipeline {
        self.push(Box::new(processor));
        self
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }
}
