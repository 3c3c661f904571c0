use super::{EventQueue, SimState, SimTime};
use std::fmt::Debug;

/// A state change that occurs within a simulation.
///
/// This trait has one required method that describes what happens when the implementing type executes. It is generic
/// over the types used to represent simulation state and clock time so that a model's state, clock and events all
/// work together within the kernel.
///
/// Requiring implementors to be [`Debug`] enables printing the full contents of an [`EventQueue`] and logging each
/// event as it executes.
///
/// The kernel has no notion of cancelling a scheduled event. An event whose relevance may have changed since it was
/// scheduled must re-check the current state when it executes.
pub trait Event<State, Time>: Debug
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Update the simulation according to the specific type of event. Exclusive access is provided to both the
    /// simulation's current state and the event queue, allowing for both mutation of the state and scheduling of new
    /// events.
    ///
    /// The clock on `event_queue` is advanced to this event's execution time, and
    /// [`SimState::update_time_averages()`] has already run, before this method is invoked.
    ///
    /// # Errors
    ///
    /// Any error returned here halts [`Simulation::run()`] and is handed back to the caller unchanged. Model code
    /// wraps its own failures in [`Error::BadExecution`]; scheduling failures surface as [`Error::BackInTime`].
    ///
    /// [`Simulation::run()`]: crate::serial::Simulation::run
    /// [`Error::BadExecution`]: crate::Error::BadExecution
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>) -> crate::Result;
}

/// An [`Event`] that is guaranteed not to return an [`Error`] on execution.
///
/// An implementation of [`Event`] is provided for all implementors of this trait which simply invokes
/// [`OkEvent::execute()`] then returns `Ok(())`.
///
/// [`Error`]: crate::Error
pub trait OkEvent<State, Time>: Debug
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Update the simulation according to the specific type of event.
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>);
}

impl<State, Time, OkEventType> Event<State, Time> for OkEventType
where
    State: SimState<Time>,
    Time: SimTime,
    OkEventType: OkEvent<State, Time>,
{
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>) -> crate::Result {
        OkEvent::execute(self, simulation_state, event_queue);
        Ok(())
    }
}
