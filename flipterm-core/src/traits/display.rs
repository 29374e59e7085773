//! Display transport trait
//!
//! Abstracts the write path to the one-line display. The IEE FLIP
//! 03600-20-040 interprets a handful of control codes on its own (cursor
//! motion, end-of-line policy); everything else the core does goes through
//! the explicit operations below. Implementations live in the drivers
//! crate; tests use in-memory fakes.

use crate::render::{RenderOp, RenderOps};

// Control codes the 8041 display controller understands. The core forwards
// some of these verbatim (BS/TAB cursor motion, BEL) and uses CR/LF itself.
/// Return cursor to column 0, keep content
pub const CR: u8 = 0x0d;
/// Return cursor to column 0 and erase the line
pub const LF: u8 = 0x0a;
/// Controller reset/clear command (written with A0 high)
pub const CLR: u8 = 0x00;
/// Cursor back one column, no erase
pub const BS: u8 = 0x08;
/// Cursor forward one column, no erase
pub const TAB: u8 = 0x09;
/// Bell
pub const BEL: u8 = 0x07;
/// End-of-line wrap mode select
pub const EOL_WRAP: u8 = 0x11;
/// End-of-line stop mode select
pub const EOL_STOP: u8 = 0x12;

/// Errors from a display transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Operation not available on this transport/wiring
    Unsupported,
    /// Bus-level failure
    Bus,
}

/// Write path to the one-line display
pub trait DisplayTransport {
    /// Clear the line and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Assert chip select / power the interface up
    fn enable(&mut self) -> Result<(), DisplayError>;

    /// Release chip select
    fn disable(&mut self) -> Result<(), DisplayError>;

    /// Write one byte at the cursor; the display advances the cursor itself
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError>;

    /// Write a run of bytes at the cursor
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Move the cursor to `column`
    ///
    /// Out-of-range columns wrap modulo the display width; the wrapped
    /// column actually reached is returned.
    fn set_cursor_column(&mut self, column: usize) -> Result<usize, DisplayError>;

    /// Read back the last byte written (display-dependent)
    fn read_last_byte(&mut self) -> Result<u8, DisplayError> {
        Err(DisplayError::Unsupported)
    }
}

/// Frame execution over any transport
pub trait DisplayTransportExt: DisplayTransport {
    /// Issue one computed frame of render operations
    fn run_frame(&mut self, ops: &RenderOps<'_>) -> Result<(), DisplayError> {
        for op in ops {
            match *op {
                RenderOp::Clear => self.clear()?,
                RenderOp::SetColumn(col) => {
                    self.set_cursor_column(col)?;
                }
                RenderOp::WriteByte(byte) => self.write_byte(byte)?,
                RenderOp::WriteBytes(bytes) => self.write_bytes(bytes)?,
            }
        }
        Ok(())
    }
}

// Blanket implementation for all transports
impl<T: DisplayTransport> DisplayTransportExt for T {}
