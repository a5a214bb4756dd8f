//! TimerQueue - timestamped payloads owned by a skill

use crate::types::{Millis, SkillId};
use serde::{Deserialize, Serialize};

/// One scheduled payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerEntry<P> {
    pub fire_at: Millis,
    /// Skill whose teardown cancels this entry
    pub owner: SkillId,
    pub payload: P,
    /// Insertion order, breaks ties between equal timestamps
    seq: u64,
}

/// Pending timers, drained in timestamp order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerQueue<P> {
    entries: Vec<TimerEntry<P>>,
    next_seq: u64,
}

impl<P> Default for TimerQueue<P> {
    fn default() -> Self {
        TimerQueue {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<P> TimerQueue<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at: Millis, owner: SkillId, payload: P) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(TimerEntry {
            fire_at,
            owner,
            payload,
            seq,
        });
    }

    /// Remove and return every entry due at `now`, earliest first
    pub fn drain_due(&mut self, now: Millis) -> Vec<TimerEntry<P>> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|entry| entry.fire_at <= now);
        self.entries = pending;
        due.sort_by_key(|entry| (entry.fire_at, entry.seq));
        due
    }

    /// Drop every entry owned by `owner`, returning how many were dropped
    pub fn cancel_owner(&mut self, owner: SkillId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.owner != owner);
        before - self.entries.len()
    }

    /// Push every pending entry forward by `delta`
    pub fn shift(&mut self, delta: Millis) {
        for entry in &mut self.entries {
            entry.fire_at = entry.fire_at.saturating_add(delta);
        }
    }

    /// Earliest pending timestamp
    pub fn next_fire_at(&self) -> Option<Millis> {
        self.entries.iter().map(|entry| entry.fire_at).min()
    }

    pub fn pending_for(&self, owner: SkillId) -> usize {
        self.entries.iter().filter(|entry| entry.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
