//! Deferred task queue.
//!
//! Several renderer protocols promise "next tick" ordering: interaction
//! notifications, focus-after-change, the restore completion callback and
//! stale-blur cancellation all run after the current mutation settles. The
//! queue makes that ordering explicit and deterministic; the owner drains
//! it at well-defined points.

use std::collections::VecDeque;

pub struct TaskQueue<T> {
    tasks: VecDeque<Box<dyn FnOnce(&mut T)>>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        TaskQueue {
            tasks: VecDeque::new(),
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: impl FnOnce(&mut T) + 'static) {
        self.tasks.push_back(Box::new(task));
    }

    /// Removes and returns the oldest pending task.
    pub fn pop(&mut self) -> Option<Box<dyn FnOnce(&mut T)>> {
        self.tasks.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}
