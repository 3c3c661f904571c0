//! Round-robin waiting line for a single shared resource.

use indexmap::IndexSet;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

/// Mutations a [`FairQueue`] refuses. The queue is left unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueueError {
    /// A bounded queue was asked to hold more than its capacity.
    #[error("queue of capacity {capacity} overflowed at time {time}")]
    CapacityExceeded { time: f64, capacity: usize },
    /// A mutation was dated before the previous one, which would shrink the length integral.
    #[error("queue mutated at time {time}, before its last mutation at {last_time}")]
    OutOfOrder { time: f64, last_time: f64 },
}

/// An ordered set of distinct items served in cyclic order.
///
/// Items keep their arrival order and are visited by a cursor that wraps around: [`next()`] hands out the item under
/// the cursor and moves it one step along. An item stays in the queue until it is explicitly [`remove()`]d, so a
/// resource that keeps calling [`next()`] shares itself round-robin among everything currently waiting.
///
/// Every mutation first adds `len * (time - last mutation time)` to a running length integral, so the queue reports
/// its own time-averaged occupancy. Mutation times must therefore be non-decreasing; an earlier time is rejected with
/// [`QueueError::OutOfOrder`].
///
/// Membership is by `Eq`/`Hash` identity: adding an item that is already present does nothing. Backed by an
/// [`IndexSet`], so membership checks are O(1) while position stays index-addressable for the cursor.
///
/// Single writer only; there is no internal synchronization.
///
/// [`next()`]: FairQueue::next
/// [`remove()`]: FairQueue::remove
#[derive(Debug, Clone)]
pub struct FairQueue<T> {
    items: IndexSet<T>,
    cursor: usize,
    capacity: Option<usize>,
    total_queue_length: f64,
    served: u64,
    last_time: f64,
}

impl<T> Default for FairQueue<T> {
    fn default() -> Self {
        Self {
            items: IndexSet::new(),
            cursor: 0,
            capacity: None,
            total_queue_length: 0.0,
            served: 0,
            last_time: 0.0,
        }
    }
}

impl<T> FairQueue<T>
where
    T: Hash + Eq,
{
    /// An unbounded queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue that refuses to grow past `capacity` items.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Append `item` at `time` unless it is already queued.
    ///
    /// Returns whether the item was inserted.
    ///
    /// # Errors
    ///
    /// [`QueueError::CapacityExceeded`] when a bounded queue is already full, [`QueueError::OutOfOrder`] when `time`
    /// precedes the last mutation.
    pub fn add(&mut self, item: T, time: f64) -> Result<bool, QueueError> {
        if self.items.contains(&item) {
            return Ok(false);
        }
        if let Some(capacity) = self.capacity {
            if self.items.len() >= capacity {
                return Err(QueueError::CapacityExceeded { time, capacity });
            }
        }

        self.update(time)?;
        self.items.insert(item);
        Ok(true)
    }

    /// Take `item` out of the queue at `time`, counting it as served.
    ///
    /// Does nothing on an empty queue. The cursor is re-normalized against the new length, so it may land on a
    /// different item than before when an earlier position was removed. Returns whether the item was present.
    ///
    /// # Errors
    ///
    /// [`QueueError::OutOfOrder`] when `time` precedes the last mutation.
    pub fn remove(&mut self, item: &T, time: f64) -> Result<bool, QueueError> {
        if self.items.is_empty() {
            return Ok(false);
        }

        self.update(time)?;
        let removed = self.items.shift_remove(item);
        if removed {
            self.served += 1;
        }
        self.cursor %= self.items.len().max(1);
        Ok(removed)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T> FairQueue<T> {
    /// The item under the cursor, advancing the cursor cyclically.
    ///
    /// `None` only when the queue is empty; callers serving a resource are expected to check [`has_next()`] first.
    ///
    /// [`has_next()`]: FairQueue::has_next
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }

        let index = self.cursor;
        self.cursor = (index + 1) % self.items.len();
        self.items.get_index(index)
    }

    pub fn has_next(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Length integral over time up to the latest mutation.
    pub fn total_queue_length(&self) -> f64 {
        self.total_queue_length
    }

    /// Number of items removed so far.
    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Bring the length integral up to `time` without changing the contents, e.g. when a run ends between
    /// mutations.
    ///
    /// # Errors
    ///
    /// [`QueueError::OutOfOrder`] when `time` precedes the last mutation.
    pub fn accumulate_until(&mut self, time: f64) -> Result<(), QueueError> {
        self.update(time)
    }

    fn update(&mut self, time: f64) -> Result<(), QueueError> {
        if time.is_nan() || time < self.last_time {
            return Err(QueueError::OutOfOrder {
                time,
                last_time: self.last_time,
            });
        }

        self.total_queue_length += self.items.len() as f64 * (time - self.last_time);
        self.last_time = time;
        Ok(())
    }
}

impl<T> Display for FairQueue<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "index: {}, size: {}, elements: {:?}", self.cursor, self.items.len(), self.items)
    }
}
