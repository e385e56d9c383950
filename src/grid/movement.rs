//! Stepped movement along a computed path
//!
//! An external driver advances one step per tick. There is no suspended
//! execution context: the whole movement is this value, and cancelling it
//! is clearing the value.

use serde::{Deserialize, Serialize};

use crate::grid::hex::HexCoord;
use crate::grid::pathfinding::Path;

/// Step-state for an entity walking a path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathProgress {
    path: Path,
    next_index: usize,
}

impl PathProgress {
    pub fn new(path: Path) -> Self {
        Self {
            path,
            next_index: 0,
        }
    }

    /// The step the driver would take next, without taking it
    pub fn peek_step(&self) -> Option<HexCoord> {
        self.path.steps.get(self.next_index).copied()
    }

    /// Take the next step, returning the coordinate arrived at
    pub fn advance(&mut self) -> Option<HexCoord> {
        let step = self.peek_step()?;
        self.next_index += 1;
        Some(step)
    }

    /// Steps not yet taken
    pub fn remaining_steps(&self) -> &[HexCoord] {
        &self.path.steps[self.next_index..]
    }

    pub fn is_complete(&self) -> bool {
        self.next_index >= self.path.steps.len()
    }

    /// Abandon the rest of the route
    ///
    /// Legal between any two completed steps; the already-walked prefix
    /// stays walked.
    pub fn cancel(&mut self) {
        self.path.steps.truncate(self.next_index);
    }
}
