/// Errors that may be encountered while executing a simulation.
///
/// The [`BackInTime`] variant originates from the [`EventQueue`] to indicate that an event's scheduled execution time
/// is prior to the queue's current time. This error likely corresponds to a logical bug in a model, e.g. forgetting to
/// add an offset to the current time when scheduling a new event.
///
/// The [`EventListExhausted`] variant originates from [`Simulation::run_until_complete()`] when the queue empties
/// before the simulation state reports completion. A model is expected to keep itself alive until its own completion
/// criterion fires, so this also signals a bug.
///
/// The [`BadExecution`] variant originates from model code, providing a wrapper that can pass through
/// [`Simulation::run()`] in a type-safe manner. Invoking [`std::error::Error::source()`] on this variant will acquire
/// a shared reference to the wrapped error.
///
/// [`EventQueue`]: crate::serial::EventQueue
/// [`Simulation::run()`]: crate::serial::Simulation::run
/// [`Simulation::run_until_complete()`]: crate::serial::Simulation::run_until_complete
/// [`BackInTime`]: Error::BackInTime
/// [`EventListExhausted`]: Error::EventListExhausted
/// [`BadExecution`]: Error::BadExecution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The event queue rejected an event that would have been scheduled for a time that has already passed.
    #[error("event execution time is less than current simulation time")]
    BackInTime,
    /// The event queue ran dry while the simulation state still reported unfinished work.
    #[error("event list exhausted before the simulation reached completion")]
    EventListExhausted,
    /// A model-generated error was encountered while executing an event. Call [`source()`] or unpack this value to
    /// handle it directly.
    ///
    /// [`source()`]: #method.source
    #[error("error while executing event: {0}")]
    BadExecution(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wrap a model error so it can travel back through the event loop.
    pub fn bad_execution(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::BadExecution(Box::new(error))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::BackInTime, Error::BackInTime) => true,
            (Error::EventListExhausted, Error::EventListExhausted) => true,
            (Error::BadExecution(e1), Error::BadExecution(e2)) => {
                let e1: *const dyn std::error::Error = e1.as_ref();
                let e2: *const dyn std::error::Error = e2.as_ref();
                std::ptr::eq(e1, e2)
            },
            _ => false,
        }
    }
}

impl Eq for Error {}

/// [`std::result::Result`]`<(), `[`timeshare::Error`]`>`
///
/// A type alias that simplifies the signatures of event handlers and the scheduling interface.
///
/// [`timeshare::Error`]: Error
pub type Result = std::result::Result<(), Error>;
