//! IEE FLIP 03600-20-040 display transport
//!
//! One-line, 40-character vacuum fluorescent display with an Intel
//! 8041-based 8-bit parallel interface. Control lines: /CS (chip select),
//! /WR (write strobe, byte latched on the rising edge), A0 (command/data
//! select), /RD (read back the last written byte).
//!
//! The controller has no direct cursor-addressing command; positioning is
//! done by returning to column 0 with CR and tab-walking forward. The only
//! command write (A0 high) that does anything is 0x00, which resets the
//! controller; clear is that reset followed by LF.

use embedded_hal::delay::DelayNs;

use flipterm_core::config::DISPLAY_WIDTH;
use flipterm_core::traits::display::{DisplayError, DisplayTransport, CLR, CR, LF, TAB};

/// Settle time between successive writes
///
/// The 8041 latches within nanoseconds; this covers the display's internal
/// processing of a character.
const WRITE_SETTLE_US: u32 = 1_000;

/// Minimal bus abstraction for the display's parallel interface
///
/// Levels are electrical: the strobe lines are active low, and callers pass
/// the level to drive, not the logical assertion.
pub trait ParallelBus {
    /// Drive the 8-bit data bus
    fn write_data(&mut self, value: u8);

    /// Sample the 8-bit data bus
    fn read_data(&mut self) -> u8;

    /// Drive /WR
    fn set_wr(&mut self, high: bool);

    /// Drive /CS
    fn set_cs(&mut self, high: bool);

    /// Drive A0
    fn set_a0(&mut self, high: bool);

    /// Drive /RD
    fn set_rd(&mut self, high: bool);
}

/// IEE FLIP 03600-20-040 over a [`ParallelBus`]
pub struct Flip03600<B, D> {
    bus: B,
    delay: D,
}

impl<B: ParallelBus, D: DelayNs> Flip03600<B, D> {
    /// Take ownership of the bus and a delay source
    ///
    /// Leaves every control line deasserted; call
    /// [`DisplayTransport::enable`] before writing.
    pub fn new(mut bus: B, delay: D) -> Self {
        bus.set_wr(true);
        bus.set_rd(true);
        bus.set_cs(true);
        bus.set_a0(false);
        Self { bus, delay }
    }

    /// Release the bus
    pub fn free(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Latch the byte currently on the data bus
    fn strobe(&mut self) {
        self.bus.set_wr(false);
        self.bus.set_wr(true);
        self.delay.delay_us(WRITE_SETTLE_US);
    }

    fn write_raw(&mut self, value: u8) {
        self.bus.write_data(value);
        self.strobe();
    }
}

impl<B: ParallelBus, D: DelayNs> DisplayTransport for Flip03600<B, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        // Controller reset (the one command write it honors), then LF to
        // erase the line and home the cursor
        self.bus.set_a0(true);
        self.write_raw(CLR);
        self.bus.set_a0(false);
        self.write_raw(LF);
        Ok(())
    }

    fn enable(&mut self) -> Result<(), DisplayError> {
        self.bus.set_cs(false);
        Ok(())
    }

    fn disable(&mut self) -> Result<(), DisplayError> {
        self.bus.set_cs(true);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write_raw(byte);
        Ok(())
    }

    fn set_cursor_column(&mut self, column: usize) -> Result<usize, DisplayError> {
        // No direct addressing: CR to column 0, then tab forward. Columns
        // past the end wrap rather than error.
        let column = column % DISPLAY_WIDTH;
        self.write_raw(CR);
        for _ in 0..column {
            self.write_raw(TAB);
        }
        Ok(column)
    }

    fn read_last_byte(&mut self) -> Result<u8, DisplayError> {
        self.bus.set_rd(false);
        let value = self.bus.read_data();
        self.bus.set_rd(true);
        Ok(value)
    }
}
