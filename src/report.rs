//! Plain-text summary of one run of the time-shared computer.

use crate::params::SimParams;
use crate::stats::Stats;

use std::fmt::{Display, Formatter};

/// Parameters and statistics of a finished run, formatted by [`Display`].
#[derive(Debug, Clone)]
pub struct Report<'a> {
    params: &'a SimParams,
    seed: u64,
    stats: &'a Stats,
}

impl<'a> Report<'a> {
    pub fn new(params: &'a SimParams, seed: u64, stats: &'a Stats) -> Self {
        Self { params, seed, stats }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let params = self.params;
        let stats = self.stats;

        writeln!(f, "Time-shared Computer Model")?;
        writeln!(f)?;
        writeln!(f, "{:<31}{:>12}", "Number of terminals", params.terminals())?;
        writeln!(f, "{:<31}{:>12.3}", "Mean think time", params.mean_think_time())?;
        writeln!(f, "{:<31}{:>12.3}", "Mean service time", params.mean_service_time())?;
        writeln!(f, "{:<31}{:>12.3}", "Quantum", params.quantum())?;
        writeln!(f, "{:<31}{:>12.3}", "Swap time", params.swap())?;
        writeln!(f, "{:<31}{:>12}", "Number of jobs required", params.required_jobs())?;
        writeln!(f, "{:<31}{:>12}", "Seed", self.seed)?;
        writeln!(f)?;
        writeln!(f, "{:<31}{:>12.3}", "Simulation ended at", stats.final_time)?;
        writeln!(f, "{:<31}{:>12}", "Jobs completed", stats.completed_jobs)?;
        writeln!(f, "{:<31}{:>12.3}", "Average utilization", stats.utilization())?;
        writeln!(f, "{:<31}{:>12.3}", "Average response time", stats.average_response_time())?;
        writeln!(f, "{:<31}{:>12.3}", "Average number in queue", stats.average_queue_length())?;
        writeln!(f, "{:<31}{:>12.3}", "Job queue average length", stats.queue_average_length())?;
        write!(f, "{:<31}{:>12.3}", "Job queue time per job", stats.queue_time_per_job())
    }
}
