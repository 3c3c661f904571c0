use super::{clock_at, Clock, ComputerEvent, EventKind, Job, JobId, JobIdAllocator, ModelError};
use crate::fair_queue::FairQueue;
use crate::params::{ConfigError, SimParams};
use crate::serial::{EventQueue, Simulation};
use crate::stats::{Stats, StatsAccumulator};
use crate::variate::VariateStream;
use crate::SimState;

use std::collections::BTreeMap;
use tracing::{debug, info};

/// Service demands are redrawn until they exceed this, so no job arrives with nothing to do.
const MIN_SERVICE_DEMAND: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuStatus {
    Idle,
    Busy,
}

/// One line of the optional event trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub time: f64,
    pub kind: EventKind,
    pub job: Option<JobId>,
}

/// A job that left the system, kept when tracing is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedJob {
    pub job: Job,
    pub completion_time: f64,
    pub response_time: f64,
}

#[derive(Debug, Default)]
struct Trace {
    events: Vec<TraceEntry>,
    completed: Vec<CompletedJob>,
}

/// State of the time-shared computer: a closed population of terminals sharing one CPU round-robin.
///
/// Each terminal alternates between thinking and waiting on a submitted job. Submitted jobs join the run queue and
/// stay there until their demand is used up; the CPU repeatedly takes the next job in cyclic order, runs it for at
/// most one quantum, and pays a fixed swap cost afterwards. A job that still has demand left after its slice is not
/// re-queued, because it never left: the cursor of the [`FairQueue`] alone rotates service among waiting jobs.
///
/// This value is the whole context of one run (variates, job ids, jobs, queue, statistics). Build a new one for
/// every run.
#[derive(Debug)]
pub struct TimeSharedComputer {
    params: SimParams,
    variates: VariateStream,
    job_ids: JobIdAllocator,
    jobs: BTreeMap<JobId, Job>,
    run_queue: FairQueue<JobId>,
    cpu: CpuStatus,
    stats: StatsAccumulator,
    arrivals_scheduled: u64,
    thinking: usize,
    cpu_runs: u64,
    stopping: bool,
    finished: bool,
    trace: Option<Trace>,
}

impl TimeSharedComputer {
    /// Fresh state for a run with the given parameters and variate seed.
    ///
    /// # Errors
    ///
    /// Any parameter outside its valid range.
    pub fn new(params: SimParams, seed: u64) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            variates: VariateStream::new(seed),
            job_ids: JobIdAllocator::new(),
            jobs: BTreeMap::new(),
            run_queue: FairQueue::new(),
            cpu: CpuStatus::Idle,
            stats: StatsAccumulator::new(),
            arrivals_scheduled: 0,
            thinking: 0,
            cpu_runs: 0,
            stopping: false,
            finished: false,
            trace: None,
        })
    }

    /// Cap the run queue at `capacity` jobs. An arrival that finds it full aborts the run with
    /// [`QueueError::CapacityExceeded`].
    ///
    /// [`QueueError::CapacityExceeded`]: crate::fair_queue::QueueError::CapacityExceeded
    pub fn with_run_queue_capacity(mut self, capacity: usize) -> Self {
        self.run_queue = FairQueue::bounded(capacity);
        self
    }

    /// Keep an event trace and every completed job.
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Trace::default());
        self
    }

    /// Wrap this state in a simulation starting at time zero, with every terminal's first job and the end-of-run
    /// horizon already scheduled.
    ///
    /// # Errors
    ///
    /// Scheduling errors from the event queue.
    pub fn into_simulation(self) -> Result<Simulation<Self, Clock>, crate::Error> {
        let mut simulation = Simulation::new(self, clock_at(0.0)?);
        let (computer, event_queue) = simulation.parts_mut();
        computer.start(event_queue)?;
        Ok(simulation)
    }

    fn start(&mut self, event_queue: &mut EventQueue<Self, Clock>) -> crate::Result {
        let now = event_queue.current_time().into_inner();
        info!(
            terminals = self.params.terminals(),
            quantum = self.params.quantum(),
            swap = self.params.swap(),
            required_jobs = self.params.required_jobs(),
            "starting time-shared computer"
        );

        for terminal in 0..self.params.terminals() {
            let job = self.think_and_generate_job(terminal, now);
            self.schedule_arrival(job, event_queue)?;
        }

        let horizon = clock_at(self.params.end_simulation_time())?;
        event_queue.schedule(ComputerEvent::EndOfSimulation, horizon)
    }

    /// Draw a think time from `now` and the demand of the job submitted after it.
    pub fn think_and_generate_job(&mut self, terminal: usize, now: f64) -> Job {
        let submit_time = now + self.variates.exponential(self.params.mean_think_time());
        let demand = self
            .variates
            .positive_exponential(self.params.mean_service_time(), MIN_SERVICE_DEMAND);
        Job::new(self.job_ids.allocate(), terminal, submit_time, demand)
    }

    /// Schedule a job with a chosen demand, outside the terminals' own think cycle.
    ///
    /// # Errors
    ///
    /// A submit time before the current clock, or one that is not a number.
    pub fn schedule_job(
        &mut self,
        terminal: usize,
        submit_time: f64,
        demand: f64,
        event_queue: &mut EventQueue<Self, Clock>,
    ) -> Result<JobId, crate::Error> {
        let job = Job::new(self.job_ids.allocate(), terminal, submit_time, demand);
        let id = job.id();
        self.schedule_arrival(job, event_queue)?;
        Ok(id)
    }

    fn schedule_arrival(&mut self, job: Job, event_queue: &mut EventQueue<Self, Clock>) -> crate::Result {
        let time = clock_at(job.submit_time())?;
        event_queue.schedule(ComputerEvent::JobArrival(job), time)?;
        self.arrivals_scheduled += 1;
        self.thinking += 1;
        Ok(())
    }

    pub(super) fn job_arrival(&mut self, job: Job, event_queue: &mut EventQueue<Self, Clock>) -> crate::Result {
        let now = event_queue.current_time().into_inner();
        let id = job.id();
        self.thinking = self
            .thinking
            .checked_sub(1)
            .ok_or(ModelError::UnexpectedArrival { job: id, time: now })?;
        debug!(now, job = %job, queued = self.run_queue.len(), "job arrived");

        self.jobs.insert(id, job);
        self.run_queue.add(id, now).map_err(ModelError::from)?;

        if self.cpu == CpuStatus::Idle && !self.stopping {
            self.start_cpu_run(id, event_queue)?;
        }
        Ok(())
    }

    /// Give `id` one slice of CPU and schedule the end of that slice.
    fn start_cpu_run(&mut self, id: JobId, event_queue: &mut EventQueue<Self, Clock>) -> crate::Result {
        let now = event_queue.current_time().into_inner();
        let quantum = self.params.quantum();
        let swap = self.params.swap();
        let job = self.jobs.get_mut(&id).ok_or(ModelError::UnknownJob { job: id, time: now })?;

        let slice = job.run_slice(quantum)?;
        debug!(now, job = %id, slice, left = job.remaining_demand(), "cpu run started");

        self.cpu = CpuStatus::Busy;
        self.cpu_runs += 1;
        event_queue.schedule(ComputerEvent::EndCpuRun(id), clock_at(now + slice + swap)?)
    }

    pub(super) fn end_cpu_run(&mut self, id: JobId, event_queue: &mut EventQueue<Self, Clock>) -> crate::Result {
        let now = event_queue.current_time().into_inner();
        if !self.run_queue.contains(&id) {
            return Err(ModelError::UnknownJob { job: id, time: now }.into());
        }
        let complete = self
            .jobs
            .get(&id)
            .map(Job::is_complete)
            .ok_or(ModelError::UnknownJob { job: id, time: now })?;

        if complete {
            self.complete_job(id, now, event_queue)?;
            if self.stopping {
                return Ok(());
            }
        }
        self.dispatch_next(event_queue)
    }

    fn complete_job(&mut self, id: JobId, now: f64, event_queue: &mut EventQueue<Self, Clock>) -> crate::Result {
        let job = self
            .jobs
            .remove(&id)
            .ok_or(ModelError::UnknownJob { job: id, time: now })?;
        self.run_queue.remove(&id, now).map_err(ModelError::from)?;

        let response_time = now - job.submit_time();
        self.stats.record_completion(response_time);
        debug!(now, job = %job, response_time, completed = self.stats.completed_jobs(), "job completed");

        let terminal = job.terminal();
        if let Some(trace) = self.trace.as_mut() {
            trace.completed.push(CompletedJob {
                job,
                completion_time: now,
                response_time,
            });
        }

        if self.stats.completed_jobs() >= self.params.required_jobs() {
            info!(now, completed = self.stats.completed_jobs(), "required jobs completed");
            self.stopping = true;
            self.cpu = CpuStatus::Idle;
            return event_queue.schedule_now(ComputerEvent::EndOfSimulation);
        }

        let next_job = self.think_and_generate_job(terminal, now);
        self.schedule_arrival(next_job, event_queue)
    }

    /// Hand the CPU to whichever job is next in cyclic order, or leave it idle.
    fn dispatch_next(&mut self, event_queue: &mut EventQueue<Self, Clock>) -> crate::Result {
        match self.run_queue.next().copied() {
            Some(next) => self.start_cpu_run(next, event_queue),
            None => {
                self.cpu = CpuStatus::Idle;
                Ok(())
            },
        }
    }

    pub(super) fn end_of_simulation(&mut self, event_queue: &mut EventQueue<Self, Clock>) -> crate::Result {
        let now = event_queue.current_time().into_inner();
        self.run_queue.accumulate_until(now).map_err(ModelError::from)?;
        self.finished = true;
        info!(
            now,
            completed = self.stats.completed_jobs(),
            in_system = self.jobs.len(),
            thinking = self.thinking,
            pending_events = event_queue.len(),
            "end of simulation"
        );
        Ok(())
    }

    pub(super) fn record(&mut self, time: f64, kind: EventKind, job: Option<JobId>) {
        if let Some(trace) = self.trace.as_mut() {
            trace.events.push(TraceEntry { time, kind, job });
        }
    }

    /// Snapshot of the statistics for a run that stopped at `final_time`.
    pub fn stats(&self, final_time: Clock) -> Stats {
        Stats::from_accumulator(
            &self.stats,
            final_time.into_inner(),
            self.run_queue.total_queue_length(),
            self.run_queue.served(),
        )
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn cpu_status(&self) -> CpuStatus {
        self.cpu
    }

    pub fn run_queue(&self) -> &FairQueue<JobId> {
        &self.run_queue
    }

    pub fn completed_jobs(&self) -> u64 {
        self.stats.completed_jobs()
    }

    /// Jobs submitted and not yet finished.
    pub fn jobs_in_system(&self) -> usize {
        self.jobs.len()
    }

    /// Terminals whose next arrival is scheduled but has not happened yet.
    pub fn thinking(&self) -> usize {
        self.thinking
    }

    pub fn arrivals_scheduled(&self) -> u64 {
        self.arrivals_scheduled
    }

    /// CPU slices started so far.
    pub fn cpu_runs(&self) -> u64 {
        self.cpu_runs
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Every executed event, when tracing is enabled.
    pub fn trace(&self) -> &[TraceEntry] {
        self.trace
            .as_ref()
            .map(|trace| trace.events.as_slice())
            .unwrap_or_default()
    }

    /// Every completed job, when tracing is enabled.
    pub fn completed(&self) -> &[CompletedJob] {
        self.trace
            .as_ref()
            .map(|trace| trace.completed.as_slice())
            .unwrap_or_default()
    }
}

impl SimState<Clock> for TimeSharedComputer {
    fn is_complete(&self, _: &Clock) -> bool {
        self.finished
    }

    fn update_time_averages(&mut self, event_queue: &EventQueue<Self, Clock>) {
        let elapsed = event_queue.time_since_last_event().into_inner();
        self.stats
            .update_time_averages(elapsed, self.cpu == CpuStatus::Busy, self.run_queue.len());
    }
}
