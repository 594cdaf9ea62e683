use std::collections::VecDeque;

/// Fixed-capacity FIFO of items waiting to be read again before the
/// underlying source is consulted. Pushing into a full queue is a no-op.
#[derive(Clone, Debug)]
pub struct Pushback<T, const N: usize> {
    queue: VecDeque<T>,
}

impl<T, const N: usize> Pushback<T, N> {
    pub fn new() -> Self {
        Pushback {
            queue: VecDeque::with_capacity(N),
        }
    }

    /// Returns `false` when the item was dropped because the queue is full.
    pub fn push(&mut self, item: T) -> bool {
        if self.queue.len() >= N {
            return false;
        }

        self.queue.push_back(item);
        true
    }

    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T, const N: usize> Default for Pushback<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
