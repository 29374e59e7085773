//! Configuration type definitions
//!
//! Sizing constants for the display and history storage, plus the runtime
//! tunables the firmware hands to the terminal session. The constants are
//! compile-time because they size fixed arrays; everything else lives in
//! [`TerminalConfig`].

use crate::render::EntryMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Visible columns on the display (IEE FLIP 03600-20-040: one 40-character line)
pub const DISPLAY_WIDTH: usize = 40;

/// Characters a history page retains (two display widths of scrollback per line)
pub const LINE_CAPACITY: usize = 80;

/// Line buffer size: capacity plus the terminator slot
pub const LINE_BUF: usize = LINE_CAPACITY + 1;

/// Pages in the history ring
pub const PAGE_COUNT: usize = 200;

/// Receive queue size in bytes (must be a power of two)
pub const RX_QUEUE_SIZE: usize = 64;

/// Runtime terminal settings
///
/// Defaults match the original hardware tuning: the escape deadline must
/// exceed one character time at 115200 baud with margin, and the replay
/// delay is slow enough to read the animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerminalConfig {
    /// Entry mode selected when a new line starts
    pub default_mode: EntryMode,
    /// Deadline for disambiguating a lone ESC from a sequence (ms)
    pub escape_timeout_ms: u16,
    /// Inter-character delay during replay animation (ms)
    pub replay_delay_ms: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            default_mode: EntryMode::LeftEntry,
            escape_timeout_ms: 20,
            replay_delay_ms: 50,
        }
    }
}
