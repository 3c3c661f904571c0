use super::{Clock, Job, JobId, TimeSharedComputer};
use crate::serial::{Event, EventQueue};

use std::fmt::{Display, Formatter};

/// Everything that can happen to the time-shared computer.
#[derive(Debug, Clone)]
pub enum ComputerEvent {
    /// A terminal finished thinking and submits `Job`.
    JobArrival(Job),
    /// The CPU slice granted to a job, plus the swap that follows it, is over.
    EndCpuRun(JobId),
    EndOfSimulation,
}

/// Tag of a [`ComputerEvent`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    JobArrival,
    EndCpuRun,
    EndOfSimulation,
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            EventKind::JobArrival => "JOB_ARRIVAL",
            EventKind::EndCpuRun => "END_CPU_RUN",
            EventKind::EndOfSimulation => "END_OF_SIMULATION",
        };
        f.write_str(tag)
    }
}

impl ComputerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ComputerEvent::JobArrival(_) => EventKind::JobArrival,
            ComputerEvent::EndCpuRun(_) => EventKind::EndCpuRun,
            ComputerEvent::EndOfSimulation => EventKind::EndOfSimulation,
        }
    }

    pub fn job_id(&self) -> Option<JobId> {
        match self {
            ComputerEvent::JobArrival(job) => Some(job.id()),
            ComputerEvent::EndCpuRun(id) => Some(*id),
            ComputerEvent::EndOfSimulation => None,
        }
    }
}

impl Event<TimeSharedComputer, Clock> for ComputerEvent {
    fn execute(
        &mut self,
        computer: &mut TimeSharedComputer,
        event_queue: &mut EventQueue<TimeSharedComputer, Clock>,
    ) -> crate::Result {
        computer.record(event_queue.current_time().into_inner(), self.kind(), self.job_id());
        match self {
            ComputerEvent::JobArrival(job) => computer.job_arrival(job.clone(), event_queue),
            ComputerEvent::EndCpuRun(id) => computer.end_cpu_run(*id, event_queue),
            ComputerEvent::EndOfSimulation => computer.end_of_simulation(event_queue),
        }
    }
}
