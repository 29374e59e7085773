//! Hardware abstraction traits

pub mod display;

pub use display::{DisplayError, DisplayTransport, DisplayTransportExt};
