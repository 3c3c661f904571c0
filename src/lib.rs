//! # Overview
//!
//! timeshare is a small discrete-event simulation kernel together with the model it was built for: a time-shared
//! computer whose single CPU is shared round-robin, with a fixed quantum and swap overhead, among a closed population
//! of terminals.
//!
//! The kernel is generic and knows nothing about CPUs:
//!
//! * [`serial::EventQueue`] is a time-ordered event list that owns the simulation clock. Events leave it in ascending
//!   time order, simultaneous events in the order they were scheduled, and it refuses to schedule anything in the
//!   past.
//! * [`serial::Simulation`] owns one queue and one state value and runs the event loop. Before each event executes it
//!   calls [`SimState::update_time_averages()`], so time-weighted statistics always integrate the state as it was over
//!   the interval that just elapsed.
//! * Parameterizing over the [`SimTime`] trait gives full control over how events are sequenced, determined entirely
//!   through your type's implementation of [`Ord`]. The model uses [`ordered_float::NotNan`]`<f64>`.
//!
//! Around the kernel sit the pieces every model in this family reuses: [`variate::VariateStream`] for reproducible
//! random draws, [`stats::StatsAccumulator`] for areas and counters, and [`fair_queue::FairQueue`] for a round-robin
//! waiting line that measures its own occupancy. The [`timeshare`] module assembles them into the scheduler, and
//! [`params`] reads its run parameters.
//!
//! Everything is single-threaded. A simulation owns all data associated with a run, so two runs never share state and
//! a run is fully determined by its parameters and seed.

mod error;
pub mod fair_queue;
mod generic_parameters;
pub mod params;
pub mod report;
pub mod serial;
pub mod stats;
pub mod timeshare;
pub mod variate;

pub use error::{Error, Result};
pub use generic_parameters::{SimState, SimTime};
