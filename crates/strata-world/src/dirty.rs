//! Duplicate-safe FIFO of chunk coordinates awaiting a remesh.

use std::collections::VecDeque;

use glam::IVec3;
use rustc_hash::FxHashSet;

/// Pending rebuilds. A coordinate is queued at most once at any time.
#[derive(Debug, Default)]
pub struct DirtyQueue {
    order: VecDeque<IVec3>,
    pending: FxHashSet<IVec3>,
}

impl DirtyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `coord`. Returns `false` if it was already pending.
    pub fn enqueue(&mut self, coord: IVec3) -> bool {
        if self.pending.insert(coord) {
            self.order.push_back(coord);
            true
        } else {
            false
        }
    }

    /// Takes the oldest pending coordinate.
    pub fn pop(&mut self) -> Option<IVec3> {
        while let Some(coord) = self.order.pop_front() {
            if self.pending.remove(&coord) {
                return Some(coord);
            }
        }
        None
    }

    /// Drops `coord` from the queue. Returns `true` if it was pending.
    pub fn remove(&mut self, coord: IVec3) -> bool {
        if self.pending.remove(&coord) {
            self.order.retain(|queued| *queued != coord);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, coord: IVec3) -> bool {
        self.pending.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_twice_yields_once() {
        let mut queue = DirtyQueue::new();
        let coord = IVec3::new(1, 2, 3);
        assert!(queue.enqueue(coord));
        assert!(!queue.enqueue(coord), "second enqueue is a no-op");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop(), Some(coord));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = DirtyQueue::new();
        for x in 0..5 {
            queue.enqueue(IVec3::new(x, 0, 0));
        }
        queue.enqueue(IVec3::new(2, 0, 0));
        let drained: Vec<i32> = std::iter::from_fn(|| queue.pop()).map(|c| c.x).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_then_requeue_moves_to_back() {
        let mut queue = DirtyQueue::new();
        let (a, b) = (IVec3::ZERO, IVec3::X);
        queue.enqueue(a);
        queue.enqueue(b);
        assert!(queue.remove(a));
        assert!(!queue.remove(a));
        queue.enqueue(a);
        assert_eq!(queue.pop(), Some(b));
        assert_eq!(queue.pop(), Some(a));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_requeue_after_pop() {
        let mut queue = DirtyQueue::new();
        queue.enqueue(IVec3::Y);
        queue.pop();
        assert!(!queue.contains(IVec3::Y));
        assert!(queue.enqueue(IVec3::Y), "drained coordinates can be queued again");
    }
}
