use super::ModelError;

use std::fmt::{Display, Formatter};

/// Remaining demand at or below this counts as finished.
pub const COMPLETION_EPSILON: f64 = 1e-6;

/// Identity of a job, unique within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

impl JobId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

/// Hands out job ids for one run. Each run owns its own allocator, so ids restart with every fresh run.
#[derive(Debug, Default)]
pub struct JobIdAllocator {
    next: u64,
}

impl JobIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> JobId {
        self.next += 1;
        JobId(self.next)
    }

    /// How many ids have been handed out.
    pub fn allocated(&self) -> u64 {
        self.next
    }
}

/// A unit of CPU work submitted by a terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: JobId,
    terminal: usize,
    submit_time: f64,
    total_demand: f64,
    remaining_demand: f64,
    consumed: f64,
    slices: u32,
}

impl Job {
    pub fn new(id: JobId, terminal: usize, submit_time: f64, total_demand: f64) -> Self {
        Self {
            id,
            terminal,
            submit_time,
            total_demand,
            remaining_demand: total_demand,
            consumed: 0.0,
            slices: 0,
        }
    }

    /// Take one CPU slice of at most `quantum`, returning the slice length.
    ///
    /// # Errors
    ///
    /// [`ModelError::NegativeDemand`] if the slice would drive the remaining demand below zero.
    pub fn run_slice(&mut self, quantum: f64) -> Result<f64, ModelError> {
        let slice = self.remaining_demand.min(quantum);
        let remaining = self.remaining_demand - slice;
        if remaining < 0.0 {
            return Err(ModelError::NegativeDemand {
                job: self.id,
                remaining,
            });
        }

        self.remaining_demand = remaining;
        self.consumed += slice;
        self.slices += 1;
        Ok(slice)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_demand <= COMPLETION_EPSILON
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn terminal(&self) -> usize {
        self.terminal
    }

    pub fn submit_time(&self) -> f64 {
        self.submit_time
    }

    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    pub fn remaining_demand(&self) -> f64 {
        self.remaining_demand
    }

    /// Sum of all slices taken so far.
    pub fn consumed(&self) -> f64 {
        self.consumed
    }

    pub fn slices(&self) -> u32 {
        self.slices
    }
}

impl Display for Job {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (terminal: {}, submitted: {:.3}, demand: {:.3}, left: {:.3})",
            self.id, self.terminal, self.submit_time, self.total_demand, self.remaining_demand
        )
    }
}
