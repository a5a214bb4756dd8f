//! Hit feedback - render requests handed to the presentation layer

use crate::geometry::{Point, Shape};
use crate::types::{Color, SkillId};
use serde::{Deserialize, Serialize};

/// One visual request for a resolved hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitFeedback {
    pub skill: SkillId,
    pub position: Point,
    pub color: Color,
    pub shape: Shape,
    /// Damage dealt per target
    pub magnitude: u32,
    pub is_crit: bool,
}

/// Outbound feedback, drained once per frame by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackBuffer {
    pending: Vec<HitFeedback>,
}

impl FeedbackBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feedback: HitFeedback) {
        self.pending.push(feedback);
    }

    pub fn drain(&mut self) -> Vec<HitFeedback> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
