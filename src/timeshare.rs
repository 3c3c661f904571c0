//! The time-shared computer: a preemptive round-robin CPU scheduler serving a closed population of terminals.
//!
//! Terminals think for an exponentially distributed time, then submit a job with an exponentially distributed CPU
//! demand. Jobs share the single CPU through a [`FairQueue`], each receiving at most one quantum per turn followed by
//! a fixed swap overhead. When a job's demand is exhausted its response time is recorded and its terminal starts
//! thinking again. The run ends once the required number of jobs has completed, or at the configured horizon.
//!
//! ```no_run
//! use timeshare::params::SimParams;
//!
//! let stats = timeshare::timeshare::simulate(SimParams::default(), 1)?;
//! println!("utilization {:.3}", stats.utilization());
//! # Ok::<(), timeshare::timeshare::RunError>(())
//! ```
//!
//! [`FairQueue`]: crate::fair_queue::FairQueue

mod computer;
mod events;
mod job;

pub use computer::{CompletedJob, CpuStatus, TimeSharedComputer, TraceEntry};
pub use events::{ComputerEvent, EventKind};
pub use job::{Job, JobId, JobIdAllocator, COMPLETION_EPSILON};

use crate::fair_queue::QueueError;
use crate::params::{ConfigError, SimParams};
use crate::stats::Stats;

use ordered_float::NotNan;
use tracing::info;

/// Simulation clock of the model.
pub type Clock = NotNan<f64>;

/// Broken invariants of the model. Any of these aborts the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("event at time {time} refers to {job}, which is not in the system")]
    UnknownJob { job: JobId, time: f64 },
    #[error("{job} would be left with negative remaining demand {remaining}")]
    NegativeDemand { job: JobId, remaining: f64 },
    #[error("{job} arrived at time {time} while no terminal was waiting to submit it")]
    UnexpectedArrival { job: JobId, time: f64 },
    #[error("run queue: {0}")]
    Queue(#[from] QueueError),
    #[error("computed event time is not a number")]
    NotANumber,
}

impl From<ModelError> for crate::Error {
    fn from(error: ModelError) -> Self {
        crate::Error::bad_execution(error)
    }
}

/// Why a whole run could not produce statistics.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Simulation(#[from] crate::Error),
}

/// Convert a raw time into a clock value.
pub(crate) fn clock_at(time: f64) -> Result<Clock, ModelError> {
    NotNan::new(time).map_err(|_| ModelError::NotANumber)
}

/// Run the model once from a fresh context and return its statistics.
///
/// # Errors
///
/// Invalid parameters, or any invariant violation raised while the run executes.
#[tracing::instrument(skip(params), fields(terminals = params.terminals()))]
pub fn simulate(params: SimParams, seed: u64) -> Result<Stats, RunError> {
    let mut simulation = TimeSharedComputer::new(params, seed)?.into_simulation()?;
    simulation.run_until_complete()?;

    let stats = simulation.state().stats(*simulation.event_queue().current_time());
    info!(
        final_time = stats.final_time,
        completed = stats.completed_jobs,
        utilization = stats.utilization(),
        "run finished"
    );
    Ok(stats)
}
