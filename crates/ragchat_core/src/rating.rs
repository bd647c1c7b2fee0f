//! Preferred-answer thumbs shared across lanes.
//!
//! A lane that turns its thumb up publishes a [`RatingEvent`]; every other
//! lane receives it through [`crate::PanelState::on_sibling_rating`] and
//! turns its own thumb down.

use std::collections::VecDeque;

use crate::PanelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingEvent {
    pub source: PanelId,
    pub rating: Rating,
}

/// FIFO of rating changes awaiting delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingBus {
    queue: VecDeque<RatingEvent>,
}

impl RatingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, event: RatingEvent) {
        self.queue.push_back(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = RatingEvent> + '_ {
        self.queue.drain(..)
    }
}
