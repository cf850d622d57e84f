//! LRU Tracker Module
//!
//! Access ordering for the in-memory store's capacity bound.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Front = most recently written or read, back = next eviction candidate.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `key` to the front, inserting it if unseen.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    /// Pops the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.order.len()
    }

    #[cfg(test)]
    fn oldest(&self) -> Option<&str> {
        self.order.back().map(String::as_str)
    }
}
