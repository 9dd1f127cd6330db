// Recycling allocator for numeric IDs.
//
// Hands out IDs from a monotonically increasing counter, reusing freed IDs
// in FIFO order. Freeing the most recently issued ID rolls the counter back
// instead of queueing it. Queued IDs at or above the counter (left behind by
// a rollback) are stale and skipped when drawn.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdProvider {
    next_id: u64,
    available: VecDeque<u64>,
}

impl IdProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw an ID: the oldest valid freed ID, else the next fresh one.
    pub fn new_id(&mut self) -> u64 {
        while let Some(id) = self.available.pop_front() {
            if id < self.next_id {
                return id;
            }
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Return an ID for reuse. IDs never issued are ignored.
    pub fn free(&mut self, id: u64) {
        if id >= self.next_id {
            tracing::warn!(id, next_id = self.next_id, "freeing an ID that was never issued");
            return;
        }
        if id + 1 == self.next_id {
            self.next_id -= 1;
        } else {
            self.available.push_back(id);
        }
    }

    /// Whether `id` is currently handed out: issued and not freed since.
    pub fn is_issued(&self, id: u64) -> bool {
        id < self.next_id && !self.available.contains(&id)
    }

    /// The next fresh ID (ignoring the free queue).
    pub fn peek_fresh(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_count_up() {
        let mut ids = IdProvider::new();
        assert_eq!(ids.new_id(), 0);
        assert_eq!(ids.new_id(), 1);
        assert_eq!(ids.new_id(), 2);
    }

    #[test]
    fn freeing_last_id_rolls_back() {
        let mut ids = IdProvider::new();
        ids.new_id();
        ids.new_id();
        ids.free(1);
        assert_eq!(ids.peek_fresh(), 1);
        assert_eq!(ids.new_id(), 1);
    }

    #[test]
    fn freed_ids_reused_fifo() {
        let mut ids = IdProvider::new();
        for _ in 0..5 {
            ids.new_id();
        }
        ids.free(2);
        ids.free(0);
        assert_eq!(ids.new_id(), 2);
        assert_eq!(ids.new_id(), 0);
        assert_eq!(ids.new_id(), 5);
    }

    #[test]
    fn stale_queued_ids_are_skipped() {
        let mut ids = IdProvider::new();
        for _ in 0..3 {
            ids.new_id();
        }
        ids.free(1); // queued
        ids.free(2); // counter back to 2
        ids.free(1); // counter back to 1, queued 1 is now stale
        assert_eq!(ids.peek_fresh(), 1);
        assert_eq!(ids.new_id(), 1);
        assert_eq!(ids.new_id(), 2);
    }

    #[test]
    fn issued_ids_exclude_freed_ones() {
        let mut ids = IdProvider::new();
        for _ in 0..3 {
            ids.new_id();
        }
        ids.free(0);
        assert!(!ids.is_issued(0));
        assert!(ids.is_issued(1));
        assert!(ids.is_issued(2));
        assert!(!ids.is_issued(3));
        assert_eq!(ids.new_id(), 0);
        assert!(ids.is_issued(0));
    }

    #[test]
    fn freeing_unissued_id_is_ignored() {
        let mut ids = IdProvider::new();
        ids.new_id();
        ids.free(10);
        assert_eq!(ids.new_id(), 1);
    }

    #[test]
    fn free_queue_survives_serialization() {
        let mut ids = IdProvider::new();
        for _ in 0..4 {
            ids.new_id();
        }
        ids.free(1);
        let json = serde_json::to_string(&ids).unwrap();
        let mut restored: IdProvider = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.new_id(), 1);
        assert_eq!(restored.new_id(), 4);
    }
}
