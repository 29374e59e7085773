//! Vacuum fluorescent display transports

pub mod flip03600;

pub use flip03600::{Flip03600, ParallelBus};
