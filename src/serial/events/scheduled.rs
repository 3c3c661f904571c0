use super::event_traits::Event;
use crate::{SimState, SimTime};

use std::cmp::Ordering;

/// Where an event sits in the execution order: its time, then the running count of schedule calls at the moment it
/// was scheduled.
///
/// Field order matters, since the derived ordering is lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct SlotKey<Time> {
    pub time: Time,
    pub sequence: u64,
}

/// A pending event together with its [`SlotKey`]. Compares by key only.
#[derive(Debug)]
pub(super) struct Scheduled<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    pub key: SlotKey<Time>,
    pub event: Box<dyn Event<State, Time>>,
}

impl<State, Time> PartialEq for Scheduled<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<State, Time> Eq for Scheduled<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
}

impl<State, Time> PartialOrd for Scheduled<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<State, Time> Ord for Scheduled<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}
