//! Embassy async tasks
//!
//! Each task runs independently; the serial RX task is the producer side
//! of the receive queue and the terminal task is the consumer.

pub mod serial;
pub mod status;
pub mod terminal;

pub use serial::serial_rx_task;
pub use status::status_task;
pub use terminal::terminal_task;
