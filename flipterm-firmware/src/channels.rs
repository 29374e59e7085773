//! Inter-task communication
//!
//! The receive queue is the only shared mutable state in the firmware: one
//! producer (serial RX task) and one consumer (terminal task). The signal
//! exists purely to wake the consumer; it carries no data.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use flipterm_core::config::RX_QUEUE_SIZE;
use flipterm_core::queue::RxQueue;

/// Raw serial bytes from the RX task to the terminal task
pub static RX_QUEUE: RxQueue<RX_QUEUE_SIZE> = RxQueue::new();

/// Wakes the terminal task after bytes were pushed
pub static RX_WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
