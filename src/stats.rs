//! Time-weighted statistics.

/// Running integrals and counters for one simulation run.
///
/// The areas are integrals of step functions (CPU busy indicator, number of jobs in the system) over simulated time.
/// Every field only ever grows. [`update_time_averages()`] must be called with the state as it was over the elapsed
/// interval, i.e. before the event at the end of that interval changes anything.
///
/// [`update_time_averages()`]: StatsAccumulator::update_time_averages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsAccumulator {
    area_busy: f64,
    area_queue_length: f64,
    completed_jobs: u64,
    total_response_time: f64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `elapsed` worth of area for the given CPU status and queue length.
    pub fn update_time_averages(&mut self, elapsed: f64, cpu_busy: bool, queue_length: usize) {
        debug_assert!(elapsed >= 0.0, "elapsed time must not be negative, got {elapsed}");
        if cpu_busy {
            self.area_busy += elapsed;
        }
        self.area_queue_length += elapsed * queue_length as f64;
    }

    /// Count a finished job and its response time.
    pub fn record_completion(&mut self, response_time: f64) {
        debug_assert!(response_time >= 0.0, "response time must not be negative, got {response_time}");
        self.completed_jobs += 1;
        self.total_response_time += response_time;
    }

    pub fn area_busy(&self) -> f64 {
        self.area_busy
    }

    pub fn area_queue_length(&self) -> f64 {
        self.area_queue_length
    }

    pub fn completed_jobs(&self) -> u64 {
        self.completed_jobs
    }

    pub fn total_response_time(&self) -> f64 {
        self.total_response_time
    }
}

/// End-of-run snapshot handed to whatever formats the report.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    /// Clock time when the run stopped.
    pub final_time: f64,
    pub area_busy: f64,
    pub area_queue_length: f64,
    pub completed_jobs: u64,
    pub total_response_time: f64,
    /// The fair queue's own length integral.
    pub queue_total_length: f64,
    /// Jobs the fair queue saw leave.
    pub queue_served: u64,
}

impl Stats {
    pub(crate) fn from_accumulator(
        accumulator: &StatsAccumulator,
        final_time: f64,
        queue_total_length: f64,
        queue_served: u64,
    ) -> Self {
        Self {
            final_time,
            area_busy: accumulator.area_busy,
            area_queue_length: accumulator.area_queue_length,
            completed_jobs: accumulator.completed_jobs,
            total_response_time: accumulator.total_response_time,
            queue_total_length,
            queue_served,
        }
    }

    /// Fraction of simulated time the CPU was busy.
    pub fn utilization(&self) -> f64 {
        ratio(self.area_busy, self.final_time)
    }

    pub fn average_response_time(&self) -> f64 {
        ratio(self.total_response_time, self.completed_jobs as f64)
    }

    /// Time-averaged number of jobs in the system.
    pub fn average_queue_length(&self) -> f64 {
        ratio(self.area_queue_length, self.final_time)
    }

    /// Time-averaged length as measured by the fair queue itself.
    pub fn queue_average_length(&self) -> f64 {
        ratio(self.queue_total_length, self.final_time)
    }

    /// Fair-queue length integral per completed job.
    pub fn queue_time_per_job(&self) -> f64 {
        ratio(self.queue_total_length, self.completed_jobs as f64)
    }
}

// a run that never advanced the clock has no meaningful averages
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_area_only_grows_while_busy() {
        let mut stats = StatsAccumulator::new();
        stats.update_time_averages(2.0, true, 3);
        stats.update_time_averages(1.5, false, 0);
        stats.update_time_averages(0.5, true, 1);

        assert_eq!(2.5, stats.area_busy(), "idle intervals should not count as busy");
        assert_eq!(6.5, stats.area_queue_length(), "queue area should weight by length");
    }

    #[test]
    fn completions_accumulate() {
        let mut stats = StatsAccumulator::new();
        stats.record_completion(1.0);
        stats.record_completion(3.0);

        let snapshot = Stats::from_accumulator(&stats, 10.0, 4.0, 2);
        assert_eq!(2, snapshot.completed_jobs);
        assert_eq!(2.0, snapshot.average_response_time());
        assert_eq!(2.0, snapshot.queue_time_per_job());
        assert_eq!(0.4, snapshot.queue_average_length());
    }

    #[test]
    fn averages_of_an_empty_run_are_zero() {
        let snapshot = Stats::from_accumulator(&StatsAccumulator::new(), 0.0, 0.0, 0);
        assert_eq!(0.0, snapshot.utilization());
        assert_eq!(0.0, snapshot.average_response_time());
        assert_eq!(0.0, snapshot.average_queue_length());
    }
}
