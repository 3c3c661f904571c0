mod scheduled;
pub(super) mod event_traits;

use crate::{SimState, SimTime};
use scheduled::{Scheduled, SlotKey};
use event_traits::Event;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use std::ops::Sub;
use tracing::trace;

/// Priority queue of scheduled events together with the simulation clock.
///
/// Events execute in ascending order of execution time, with ties broken by the order in which they were scheduled.
/// The queue owns a binary heap rather than exposing one, so the only ways to touch it are scheduling, which refuses
/// times in the past, and [`next()`], which advances the clock. The clock is therefore monotonically non-decreasing
/// and `last_event_time() <= current_time()` always holds.
///
/// Two clock readings are tracked: [`current_time()`] is the execution time of the most recently popped event, and
/// [`last_event_time()`] is the execution time of the pop before that. Their difference is the interval over which
/// time-weighted statistics accumulate.
///
/// Once popped, an event belongs to the caller; the queue keeps no reference to it.
///
/// [`next()`]: EventQueue::next
/// [`current_time()`]: EventQueue::current_time
/// [`last_event_time()`]: EventQueue::last_event_time
#[derive(Debug)]
pub struct EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    events: BinaryHeap<Reverse<Scheduled<State, Time>>>,
    now: Time,
    last_event_time: Time,
    events_added: u64,
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Construct a new [`EventQueue`] with no scheduled events and both clock readings set to the provided time.
    pub(crate) fn new(start_time: Time) -> Self
    where
        Time: Clone,
    {
        Self {
            events: BinaryHeap::default(),
            now: start_time.clone(),
            last_event_time: start_time,
            events_added: 0,
        }
    }

    /// Schedule the provided event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time, returns an [`Error::BackInTime`] to indicate the likely presence
    /// of a logical bug at the call site, with no modifications to the queue.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule<EventType>(&mut self, event: EventType, time: Time) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        self.schedule_from_boxed(Box::new(event), time)
    }

    /// Schedule the provided boxed event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time, returns an [`Error::BackInTime`] with no modifications to the
    /// queue.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule_from_boxed(&mut self, event: Box<dyn Event<State, Time>>, time: Time) -> crate::Result {
        if time < self.now {
            trace!(now = ?self.now, requested = ?time, "rejected event scheduled in the past");
            return Err(crate::Error::BackInTime);
        }

        let sequence = self.events_added;
        self.events_added += 1;
        trace!(time = ?time, sequence, pending = self.events.len() + 1, "scheduled event");
        self.events.push(Reverse(Scheduled {
            key: SlotKey { time, sequence },
            event,
        }));
        Ok(())
    }

    /// Pop the imminent event and advance the clock to its execution time.
    ///
    /// Returns `None` once the queue is empty, which is the sentinel that ends a run; the clock does not move in that
    /// case.
    pub fn next(&mut self) -> Option<Box<dyn Event<State, Time>>> {
        let Reverse(Scheduled { key, event }) = self.events.pop()?;
        self.last_event_time = std::mem::replace(&mut self.now, key.time);
        trace!(now = ?self.now, sequence = key.sequence, "advanced clock");
        Some(event)
    }

    /// Get a shared reference to the simulation's current clock time.
    pub fn current_time(&self) -> &Time {
        &self.now
    }

    /// Get a shared reference to the clock time of the extraction before the most recent one.
    pub fn last_event_time(&self) -> &Time {
        &self.last_event_time
    }

    /// Number of events still waiting to execute.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events remain.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone,
{
    /// Schedule the provided event to execute at the current sim time. Events previously scheduled for "now" will still
    /// execute before this event does.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackInTime`] only if cloning the clock produced a smaller value, which no sensible
    /// implementation of [`Clone`] does.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule_now<EventType>(&mut self, event: EventType) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        let event_time = self.now.clone();
        self.schedule(event, event_time)
    }
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone + Sub<Output = Time>,
{
    /// Elapsed clock time between the two most recent extractions.
    pub fn time_since_last_event(&self) -> Time {
        self.now.clone() - self.last_event_time.clone()
    }
}

impl<State, Time> std::fmt::Display for EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            formatter,
            "EventQueue with {} scheduled events at current time {:?} (previous event at {:?})",
            self.events.len(),
            self.now,
            self.last_event_time
        )
    }
}
