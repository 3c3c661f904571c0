use super::{Event, EventQueue};
use crate::{SimState, SimTime};

use std::fmt::Formatter;
use tracing::{debug, trace};

/// Contains the event queue and the state belonging to one simulation run.
///
/// A [`Simulation`] owns both its state and its event queue, providing both shared and mutable access to each so
/// clients can set up and tear down runs as needed - for example, scheduling initial events or reading the final
/// statistics. Nothing is shared between two [`Simulation`] values, so repeated runs start from a clean slate.
///
/// The expected workflow for a Simulation is:
///
/// 1. Initialize a struct that implements [`SimState`].
/// 2. Pass this struct and the start time to [`new()`].
/// 3. Schedule at least one initial event.
/// 4. Call [`run()`] or [`run_until_complete()`]. Handle any error it might return.
/// 5. Use the [`state()`] accessor, or [`into_state()`], to finish processing the results.
///
/// [`new()`]: Simulation::new
/// [`run()`]: Simulation::run
/// [`run_until_complete()`]: Simulation::run_until_complete
/// [`state()`]: Simulation::state
/// [`into_state()`]: Simulation::into_state
#[derive(Debug)]
pub struct Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// A priority queue of events that have been scheduled to execute, ordered ascending by execution time.
    event_queue: EventQueue<State, Time>,
    /// The current shared state of the Simulation. Exclusive access will be granted to each event that executes.
    state: State,
}

impl<State, Time> Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Initialize a Simulation instance with the provided starting state and an event queue with clock set to the
    /// provided starting time.
    pub fn new(initial_state: State, start_time: Time) -> Self
    where
        Time: Clone,
    {
        Self {
            event_queue: EventQueue::new(start_time),
            state: initial_state,
        }
    }

    /// Execute events from the priority queue, one at a time, in ascending order by execution time.
    ///
    /// Follows this loop:
    ///
    /// 1. Does [`state.is_complete()`] return true? If so, return `Ok(())`.
    /// 2. Attempt to pop the next event from the queue, advancing the clock. If there isn't one, return `Ok(())`.
    /// 3. Call [`state.update_time_averages()`] so statistics cover the interval that just elapsed.
    /// 4. Pass exclusive references to the state and event queue to [`event.execute()`].
    ///     1. If an error is returned, forward it as-is to the caller.
    ///     2. Otherwise, go back to step 1.
    ///
    /// # Errors
    ///
    /// Errors raised by events are passed back to the caller unchanged. The variants directly supported are:
    ///
    /// 1. [`Error::BackInTime`] means that a model attempted to schedule an event at some point in the simulation's
    ///    past.
    /// 2. [`Error::BadExecution`] wraps a model-generated error. To handle the underlying error, either unpack the
    ///    [`BadExecution`] or call its [`source()`] method.
    ///
    /// [`state.is_complete()`]: SimState::is_complete
    /// [`state.update_time_averages()`]: SimState::update_time_averages
    /// [`event.execute()`]: Event::execute
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    /// [`Error::BadExecution`]: crate::Error::BadExecution
    /// [`BadExecution`]: crate::Error::BadExecution
    /// [`source()`]: crate::Error#method.source
    pub fn run(&mut self) -> crate::Result {
        self.drive().map(|_| ())
    }

    /// Execute events exactly as [`run()`] does, but treat an event queue that runs dry before [`is_complete()`]
    /// reports `true` as a failure of the model rather than a normal ending.
    ///
    /// # Errors
    ///
    /// Everything [`run()`] may return, plus [`Error::EventListExhausted`] when the queue empties early.
    ///
    /// [`run()`]: Simulation::run
    /// [`is_complete()`]: SimState::is_complete
    /// [`Error::EventListExhausted`]: crate::Error::EventListExhausted
    pub fn run_until_complete(&mut self) -> crate::Result {
        match self.drive()? {
            Ending::Completed => Ok(()),
            Ending::Exhausted => Err(crate::Error::EventListExhausted),
        }
    }

    fn drive(&mut self) -> std::result::Result<Ending, crate::Error> {
        let mut executed: u64 = 0;
        let ending = loop {
            if self.state.is_complete(self.event_queue.current_time()) {
                break Ending::Completed;
            }

            let Some(mut next_event) = self.event_queue.next() else {
                break Ending::Exhausted;
            };

            self.state.update_time_averages(&self.event_queue);
            trace!(now = ?self.event_queue.current_time(), event = ?next_event, "executing event");
            next_event.execute(&mut self.state, &mut self.event_queue)?;
            executed += 1;
        };

        debug!(
            executed,
            pending = self.event_queue.len(),
            now = ?self.event_queue.current_time(),
            ending = ?ending,
            "event loop finished"
        );
        Ok(ending)
    }

    /// Schedule the provided event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time, returns an [`Error::BackInTime`] with no modifications to the
    /// queue.
    ///
    /// [`Error::BackInTime`]: crate::Error::BackInTime
    pub fn schedule<EventType>(&mut self, event: EventType, time: Time) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        self.event_queue.schedule(event, time)
    }

    /// Get a shared reference to the simulation state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Get an exclusive reference to the simulation state.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Get a shared reference to the event queue.
    pub fn event_queue(&self) -> &EventQueue<State, Time> {
        &self.event_queue
    }

    /// Get an exclusive reference to the event queue.
    pub fn event_queue_mut(&mut self) -> &mut EventQueue<State, Time> {
        &mut self.event_queue
    }

    /// Split into the state and the event queue, both mutable, for setup code that needs the two at once.
    pub fn parts_mut(&mut self) -> (&mut State, &mut EventQueue<State, Time>) {
        (&mut self.state, &mut self.event_queue)
    }

    /// Consume the simulation, keeping only its state.
    pub fn into_state(self) -> State {
        self.state
    }
}

/// How the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    Completed,
    Exhausted,
}

impl<State, Time> std::fmt::Display for Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Simulation at time {:?}", self.event_queue.current_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::OkEvent;

    #[derive(Debug)]
    struct State {
        executed_event_values: Vec<u32>,
        complete: bool,
        area: u32,
        level: u32,
    }

    impl SimState<u32> for State {
        fn is_complete(&self, _: &u32) -> bool {
            self.complete
        }

        fn update_time_averages(&mut self, event_queue: &EventQueue<Self, u32>) {
            self.area += self.level * event_queue.time_since_last_event();
        }
    }

    #[derive(Debug)]
    struct TestEvent {
        value: u32,
    }

    impl Event<State, u32> for TestEvent {
        fn execute(&mut self, simulation_state: &mut State, _: &mut EventQueue<State, u32>) -> crate::Result {
            simulation_state.executed_event_values.push(self.value);
            simulation_state.level = self.value;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct CompletionEvent {}

    impl OkEvent<State, u32> for CompletionEvent {
        fn execute(&mut self, simulation_state: &mut State, _: &mut EventQueue<State, u32>) {
            simulation_state.complete = true;
        }
    }

    #[derive(Debug)]
    struct RewindEvent {}

    impl Event<State, u32> for RewindEvent {
        fn execute(&mut self, _: &mut State, event_queue: &mut EventQueue<State, u32>) -> crate::Result {
            event_queue.schedule(TestEvent { value: 99 }, 0)
        }
    }

    fn setup() -> Simulation<State, u32> {
        let mut sim = Simulation::new(
            State {
                executed_event_values: Vec::with_capacity(3),
                complete: false,
                area: 0,
                level: 0,
            },
            0,
        );

        let events: [TestEvent; 3] = [TestEvent { value: 1 }, TestEvent { value: 3 }, TestEvent { value: 2 }];

        for (i, event) in events.into_iter().enumerate() {
            sim.schedule(event, 2 * i as u32).unwrap();
        }
        sim
    }

    #[test]
    fn simulation_executes_events() {
        let mut sim = setup();
        sim.run().unwrap();

        assert_eq!(
            vec![1, 3, 2],
            sim.state().executed_event_values,
            "events did not execute in correct order"
        );
    }

    #[test]
    fn time_averages_use_state_before_each_event() {
        let mut sim = setup();
        sim.run().unwrap();

        // level 1 over [0, 2), level 3 over [2, 4)
        assert_eq!(2 + 6, sim.state().area, "area should integrate the prior level");
    }

    #[test]
    fn simulation_stops_with_events_still_in_queue() {
        let mut sim = setup();
        sim.schedule(CompletionEvent {}, 3).unwrap();
        sim.run_until_complete().unwrap();

        assert_eq!(
            vec![1, 3],
            sim.state().executed_event_values,
            "simulation did not terminate with completion event"
        );
        assert_eq!(1, sim.event_queue().len(), "the event at time 4 should remain queued");
    }

    #[test]
    fn exhausted_queue_is_an_error_when_completion_is_required() {
        let mut sim = setup();
        assert_eq!(Err(crate::Error::EventListExhausted), sim.run_until_complete());
        assert_eq!(3, sim.state().executed_event_values.len(), "all events should still have executed");
    }

    #[test]
    fn scheduling_errors_halt_the_run() {
        let mut sim = setup();
        sim.schedule(RewindEvent {}, 1).unwrap();

        assert_eq!(Err(crate::Error::BackInTime), sim.run());
        assert_eq!(vec![1], sim.state().executed_event_values, "run should stop at the failing event");
        assert_eq!(1, *sim.event_queue().current_time());
    }
}
