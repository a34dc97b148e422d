//! Points-to worklist: FIFO of (pointer, objects to add)

use crate::features::points_to::domain::{PointerId, PointsToSet};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct WorkList {
    entries: VecDeque<(PointerId, PointsToSet)>,
}

impl WorkList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pointer: PointerId, pts: PointsToSet) {
        self.entries.push_back((pointer, pts));
    }

    pub fn pop(&mut self) -> Option<(PointerId, PointsToSet)> {
        self.entries.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
