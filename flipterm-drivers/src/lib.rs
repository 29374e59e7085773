//! Hardware driver implementations
//!
//! Concrete implementations of the transport traits defined in
//! flipterm-core:
//!
//! - IEE FLIP 03600-20-040 VFD over its 8-bit parallel interface

#![no_std]
#![deny(unsafe_code)]

pub mod vfd;
