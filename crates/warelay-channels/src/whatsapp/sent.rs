//! Bounded record of reply IDs sent by this device.

use std::collections::{HashSet, VecDeque};

/// Number of reply IDs remembered for echo suppression.
pub(super) const SENT_ID_CAPACITY: usize = 256;

/// Insertion-ordered set of sent message IDs, evicting the oldest at capacity.
pub(super) struct SentIds {
    order: VecDeque<String>,
    ids: HashSet<String>,
    capacity: usize,
}

impl SentIds {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            ids: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember a sent ID, evicting the oldest if at capacity.
    pub(super) fn record(&mut self, id: String) {
        if self.ids.contains(&id) {
            return;
        }
        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.ids.remove(&oldest);
            }
        }
        self.ids.insert(id.clone());
        self.order.push_back(id);
    }

    /// Forget `id`, returning whether it was remembered.
    pub(super) fn take(&mut self, id: &str) -> bool {
        if !self.ids.remove(id) {
            return false;
        }
        self.order.retain(|known| known != id);
        true
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.order.len()
    }
}

impl Default for SentIds {
    fn default() -> Self {
        Self::new(SENT_ID_CAPACITY)
    }
}
