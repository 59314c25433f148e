// SPDX-FileCopyrightText: 2026 Banana Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blocking FIFO queue shared by producers and the executor.
//!
//! One mutex guards the items and the closed flag; `not_empty` wakes
//! consumers and `not_full` wakes producers blocked on a bounded queue.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// A push the queue refused. The rejected item is handed back.
#[derive(Debug, Error)]
pub enum QueueError<T: std::fmt::Debug> {
    #[error("command queue is closed")]
    Closed(T),
    #[error("command queue is full")]
    Full(T),
}

impl<T: std::fmt::Debug> QueueError<T> {
    pub fn into_inner(self) -> T {
        match self {
            QueueError::Closed(item) | QueueError::Full(item) => item,
        }
    }
}

struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Thread-safe FIFO with blocking pop and an optional capacity.
pub struct CommandQueue<T> {
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: Option<usize>,
}

impl<T: std::fmt::Debug> CommandQueue<T> {
    /// A queue that never blocks producers.
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// A queue holding at most `capacity` items when `Some`.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Append `item` and wake one consumer.
    ///
    /// Never blocks on an unbounded queue. On a bounded queue, waits for
    /// space. Rejects with [`QueueError::Closed`] once the queue is closed.
    pub fn push(&self, item: T) -> Result<(), QueueError<T>> {
        let mut state = self.state.lock();
        if let Some(capacity) = self.capacity {
            while !state.closed && state.items.len() >= capacity {
                self.not_full.wait(&mut state);
            }
        }
        if state.closed {
            return Err(QueueError::Closed(item));
        }
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Like [`push`](Self::push), but a full bounded queue rejects with
    /// [`QueueError::Full`] instead of waiting.
    pub fn try_push(&self, item: T) -> Result<(), QueueError<T>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(QueueError::Closed(item));
        }
        if self.capacity.is_some_and(|c| state.items.len() >= c) {
            return Err(QueueError::Full(item));
        }
        state.items.push_back(item);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Remove and return the head, waiting while the queue is empty.
    ///
    /// Returns `None` only once the queue is closed and fully drained.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(item);
            }
            if state.closed {
                return None;
            }
            self.not_empty.wait(&mut state);
        }
    }

    /// Stop accepting items. Queued items remain poppable; blocked producers
    /// and idle consumers are woken.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        drop(state);
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn pop_returns_items_in_push_order() {
        let queue = CommandQueue::unbounded();
        for i in 0..5 {
            queue.push(i).unwrap();
        }
        let popped: Vec<i32> = (0..5).filter_map(|_| queue.pop()).collect();
        assert_eq!(popped, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn unbounded_push_never_blocks() {
        let queue = CommandQueue::unbounded();
        for i in 0..100_000 {
            queue.push(i).unwrap();
        }
        assert_eq!(queue.len(), 100_000);
    }

    #[test]
    fn pop_blocks_until_push() {
        let queue = Arc::new(CommandQueue::unbounded());
        let popped = Arc::new(AtomicBool::new(false));

        let consumer = {
            let queue = Arc::clone(&queue);
            let popped = Arc::clone(&popped);
            thread::spawn(move || {
                let item = queue.pop();
                popped.store(true, Ordering::SeqCst);
                item
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!popped.load(Ordering::SeqCst), "pop should still be waiting");

        queue.push("banana").unwrap();
        assert_eq!(consumer.join().unwrap(), Some("banana"));
    }

    #[test]
    fn close_drains_then_ends() {
        let queue = CommandQueue::unbounded();
        queue.push(1).unwrap();
        queue.push(2).unwrap();
        queue.close();

        assert!(matches!(queue.push(3), Err(QueueError::Closed(3))));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn close_wakes_idle_consumer() {
        let queue: Arc<CommandQueue<u8>> = Arc::new(CommandQueue::unbounded());
        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.pop())
        };
        thread::sleep(Duration::from_millis(20));
        queue.close();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn try_push_rejects_when_full() {
        let queue = CommandQueue::with_capacity(Some(2));
        queue.try_push('a').unwrap();
        queue.try_push('b').unwrap();
        let err = queue.try_push('c').unwrap_err();
        assert!(matches!(err, QueueError::Full(_)));
        assert_eq!(err.into_inner(), 'c');
    }

    #[test]
    fn bounded_push_waits_for_space() {
        let queue = Arc::new(CommandQueue::with_capacity(Some(1)));
        queue.push(1).unwrap();

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.push(2))
        };

        thread::sleep(Duration::from_millis(50));
        assert_eq!(queue.len(), 1, "second push should be waiting for space");

        assert_eq!(queue.pop(), Some(1));
        producer.join().unwrap().unwrap();
        assert_eq!(queue.pop(), Some(2));
    }

    #[test]
    fn close_releases_blocked_producer() {
        let queue = Arc::new(CommandQueue::with_capacity(Some(1)));
        queue.push(1).unwrap();
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.push(2))
        };
        thread::sleep(Duration::from_millis(20));
        queue.close();
        assert!(matches!(
            producer.join().unwrap(),
            Err(QueueError::Closed(2))
        ));
    }

    #[test]
    fn many_consumers_never_share_an_item() {
        let queue = Arc::new(CommandQueue::unbounded());
        for i in 0..1000 {
            queue.push(i).unwrap();
        }
        queue.close();

        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut taken = Vec::new();
                    while let Some(item) = queue.pop() {
                        taken.push(item);
                    }
                    taken
                })
            })
            .collect();

        let mut all: Vec<i32> = consumers
            .into_iter()
            .flat_map(|c| c.join().unwrap())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..1000).collect::<Vec<_>>());
    }
}
