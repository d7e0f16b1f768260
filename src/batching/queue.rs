//! Bounded FIFO queue with backpressure
//!
//! The queue is the only structure shared between producers and the
//! assembler. Producers wait (or are rejected) when it is full, the single
//! consumer waits when it is empty. Waiting is done on two [`Notify`]s so
//! neither side ever holds the lock across an `.await`.
//!
//! Every waiter registers interest with [`Notified::enable`] *before* it
//! inspects the state, so a wakeup issued between the check and the await
//! is never lost.
//!
//! [`Notified::enable`]: tokio::sync::futures::Notified::enable

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

/// Rejected enqueue. The item is handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError<T> {
    /// No space became available in time
    Full(T),
    /// The queue has been closed
    Closed(T),
}

impl<T> QueueError<T> {
    /// Recover the rejected item
    pub fn into_inner(self) -> T {
        match self {
            QueueError::Full(item) | QueueError::Closed(item) => item,
        }
    }
}

impl<T> fmt::Display for QueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Full(_) => write!(f, "queue is full"),
            QueueError::Closed(_) => write!(f, "queue is closed"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for QueueError<T> {}

struct State<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Multi-producer, single-consumer bounded queue.
///
/// Any number of tasks may enqueue concurrently. Only one task may call
/// [`take_one`](Self::take_one) and [`drain_up_to`](Self::drain_up_to);
/// with more consumers ordering is still FIFO but wakeups are not fair.
pub struct BoundedQueue<T> {
    state: Mutex<State<T>>,
    capacity: usize,
    not_empty: Notify,
    not_full: Notify,
}

impl<T> BoundedQueue<T> {
    /// Creates a new bounded queue with the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        Self {
            state: Mutex::new(State {
                items: VecDeque::with_capacity(capacity.min(4096)),
                closed: false,
            }),
            capacity,
            not_empty: Notify::new(),
            not_full: Notify::new(),
        }
    }

    /// Insert at the tail without waiting.
    pub fn try_enqueue(&self, item: T) -> Result<(), QueueError<T>> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(QueueError::Closed(item));
        }
        if state.items.len() >= self.capacity {
            return Err(QueueError::Full(item));
        }
        state.items.push_back(item);
        drop(state);

        self.not_empty.notify_one();
        Ok(())
    }

    /// Insert at the tail, waiting as long as it takes for space.
    ///
    /// Dropping the returned future before it completes leaves the queue
    /// untouched: the item is never inserted.
    pub async fn enqueue(&self, item: T) -> Result<(), QueueError<T>> {
        self.enqueue_until(item, None).await
    }

    /// Insert at the tail, waiting at most `wait` for space.
    pub async fn enqueue_timeout(&self, item: T, wait: Duration) -> Result<(), QueueError<T>> {
        self.enqueue_until(item, Some(Instant::now() + wait)).await
    }

    async fn enqueue_until(&self, item: T, deadline: Option<Instant>) -> Result<(), QueueError<T>> {
        let mut item = item;
        loop {
            let notified = self.not_full.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match self.try_enqueue(item) {
                Ok(()) => return Ok(()),
                Err(QueueError::Full(returned)) => item = returned,
                Err(closed) => return Err(closed),
            }

            match deadline {
                Some(deadline) => {
                    if tokio::time::timeout_at(deadline, notified).await.is_err() {
                        return Err(QueueError::Full(item));
                    }
                }
                None => notified.await,
            }
        }
    }

    /// Remove the head item, waiting until one is present.
    ///
    /// Returns `None` only once the queue is closed and empty.
    pub async fn take_one(&self) -> Option<T> {
        loop {
            let notified = self.not_empty.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.state.lock();
                if let Some(item) = state.items.pop_front() {
                    drop(state);
                    self.not_full.notify_one();
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Remove up to `max` items that are already present, in FIFO order.
    /// Never waits; an empty queue yields an empty vector.
    pub fn drain_up_to(&self, max: usize) -> Vec<T> {
        let drained: Vec<T> = {
            let mut state = self.state.lock();
            let count = max.min(state.items.len());
            state.items.drain(..count).collect()
        };

        // One wakeup per freed slot
        for _ in 0..drained.len() {
            self.not_full.notify_one();
        }
        drained
    }

    /// Stop accepting items and wake every waiting producer and consumer.
    ///
    /// Items already queued stay available to the consumer. Returns `false`
    /// if the queue was already closed.
    pub fn close(&self) -> bool {
        let was_open = {
            let mut state = self.state.lock();
            !std::mem::replace(&mut state.closed, true)
        };

        self.not_full.notify_waiters();
        self.not_empty.notify_waiters();
        was_open
    }

    /// Returns the number of items currently in the queue.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Returns true if the queue is full.
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Returns the capacity of the queue.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedQueue")
            .field("len", &state.items.len())
            .field("capacity", &self.capacity)
            .field("closed", &state.closed)
            .finish()
    }
}
