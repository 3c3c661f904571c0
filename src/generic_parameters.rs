use crate::serial::EventQueue;

use std::fmt::Debug;

/// The generic type used for a simulation's clock.
///
/// Kept generic so the same kernel can drive integer-clocked test models and the float-clocked time-shared computer.
/// This trait is a superset of [`Ord`] and [`Debug`] with no additional requirements or functionality.
///
/// Your implementation of this trait should use the [`Ord`] trait to account for the overall sequencing of events.
/// Events execute in ascending order of execution time, i.e. if `A.cmp(&B) == std::cmp::Ordering::Less` then event A
/// executes before event B. Ties are resolved by the order in which events were scheduled (first in, first out), so
/// two runs that schedule the same events in the same order always execute them in the same order.
///
/// Implementations are provided for integral builtin types and for the [`OrderedFloat`] and [`NotNan`] wrappers from
/// [`ordered-float`], but not for bare floating-point types as those do not implement [`Ord`].
///
/// [`ordered-float`]: https://docs.rs/ordered-float/4
/// [`OrderedFloat`]: https://docs.rs/ordered-float/4/ordered_float/struct.OrderedFloat.html
/// [`NotNan`]: https://docs.rs/ordered-float/4/ordered_float/struct.NotNan.html
pub trait SimTime: Ord + Debug {}

impl SimTime for u8 {}
impl SimTime for u16 {}
impl SimTime for u32 {}
impl SimTime for u64 {}
impl SimTime for u128 {}
impl SimTime for usize {}
impl SimTime for i8 {}
impl SimTime for i16 {}
impl SimTime for i32 {}
impl SimTime for i64 {}
impl SimTime for i128 {}
impl SimTime for isize {}

impl<Float> SimTime for ordered_float::OrderedFloat<Float> where Float: ordered_float::FloatCore + Debug {}

impl<Float> SimTime for ordered_float::NotNan<Float> where Float: ordered_float::FloatCore + Debug {}

/// The generic type used for a simulation's overall state.
///
/// This type may include to-date summary statistics, collections of simulated entities, random-number streams, or
/// whatever else is necessary to describe the modeled system. One value of this type is one simulation context: it is
/// owned by exactly one [`Simulation`], so a fresh value gives a clean re-initialization with no global state.
///
/// Two hooks let the driver loop in [`Simulation::run()`] cooperate with the state:
///
/// * [`is_complete()`] is asked before popping each event whether the run should wrap up. The default always answers
///   "no," and so a simulation running with the default will continue until the event queue becomes empty.
/// * [`update_time_averages()`] is invoked after the clock advances to a newly popped event but before that event
///   executes. This is the place to accumulate time-weighted integrals (areas under step functions) using the state as
///   it was over the elapsed interval. The default does nothing.
///
/// [`Simulation`]: crate::serial::Simulation
/// [`Simulation::run()`]: crate::serial::Simulation::run
/// [`is_complete()`]: SimState::is_complete
/// [`update_time_averages()`]: SimState::update_time_averages
pub trait SimState<Time>
where
    Time: SimTime,
{
    /// Reports whether the simulation has run to completion. `true` indicates that the simulation is finished and
    /// that `run()` should break out of its loop, whereas `false` means that `run()` should continue with the next
    /// scheduled event.
    ///
    /// The `current_time` argument will provide shared access to the internally tracked simulation clock.
    // expect that other implementations will make use of the
    // argument even though this one doesn't
    #[allow(unused_variables)]
    fn is_complete(&self, current_time: &Time) -> bool {
        false
    }

    /// Accumulates time-weighted statistics over the interval between the previous event and the one about to
    /// execute. The queue's clock has already advanced, so [`EventQueue::last_event_time()`] and
    /// [`EventQueue::current_time()`] bound the interval, while `self` still holds the state from before the event.
    #[allow(unused_variables)]
    fn update_time_averages(&mut self, event_queue: &EventQueue<Self, Time>)
    where
        Self: Sized,
    {
    }
}
