//! The single-threaded event loop.
//!
//! Everything in this module is driven by one synchronous loop over [`EventQueue::next()`]: no operation suspends,
//! blocks, or yields to another unit of execution. Events receive exclusive (`&mut`) access to the simulation state
//! and the queue, so the single-writer discipline is enforced by the borrow checker rather than by locks.

mod events;
mod simulation;

pub use events::event_traits::{Event, OkEvent};
pub use events::EventQueue;
pub use simulation::Simulation;
