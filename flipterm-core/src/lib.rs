//! Board-agnostic core logic for the Flipterm VFD terminal firmware
//!
//! This crate contains all terminal logic that does not depend on specific
//! hardware implementations:
//!
//! - Interrupt-to-main receive queue (lock-free SPSC)
//! - Escape sequence decoder for navigation keys
//! - History ring and cursor engine (scrollback pages)
//! - Render policy (entry modes, window computation, replay)
//! - Display transport trait
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod decode;
pub mod history;
pub mod queue;
pub mod render;
pub mod session;
pub mod traits;
