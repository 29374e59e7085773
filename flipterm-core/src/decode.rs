//! Escape sequence decoder
//!
//! Splits the inbound byte stream into pass-through characters and
//! multi-byte navigation sequences. A lone ESC keypress and the start of a
//! sequence are indistinguishable until either the next byte arrives or a
//! deadline expires, so the decoder drives an external single-shot timer:
//! every byte stops the previous wait, and the decoder asks for a re-arm
//! whenever it is left mid-sequence. Timer expiry is reported back via
//! [`EscapeDecoder::deadline_elapsed`] from the consumer context.
//!
//! Sequence grammar (VT style):
//! - `ESC [ A/B/C/D` - arrow keys, complete on the third byte
//! - `ESC [ 1/2/4/5/6 ~` - Home/Insert/End/PageUp/PageDown, complete on the
//!   `~` terminator (Home fires on its third byte already; the terminator
//!   is then consumed silently)
//!
//! Mismatched bytes abort the sequence and are discarded, not replayed as
//! input.

use heapless::Vec;

/// Escape lead-in byte
pub const ESC: u8 = 0x1b;

/// Second byte of every recognized sequence (`[`)
const BRACKET: u8 = 0x5b;

/// Final byte of four-byte sequences (`~`)
const TERMINATOR: u8 = 0x7e;

/// Longest recognized sequence, also the diagnostic buffer size
pub const MAX_SEQUENCE: usize = 4;

// Third-byte key codes
const KEY_UP: u8 = b'A';
const KEY_DOWN: u8 = b'B';
const KEY_RIGHT: u8 = b'C';
const KEY_LEFT: u8 = b'D';
const KEY_HOME: u8 = b'1';
const KEY_INSERT: u8 = b'2';
const KEY_END: u8 = b'4';
const KEY_PAGE_UP: u8 = b'5';
const KEY_PAGE_DOWN: u8 = b'6';

/// Navigation keys recognized by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
}

/// Decoded input handed to the terminal session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TerminalInput {
    /// Printable or control byte, passed through unmodified
    Byte(u8),
    /// Completed navigation sequence
    Key(NavKey),
    /// ESC with no sequence following it before the deadline
    LoneEscape,
    /// Unrecognized third byte of a bracket sequence (diagnostic only)
    Unrecognized(u8),
}

/// Requested action for the external deadline timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerOp {
    /// Start (or restart) the single-shot deadline
    Arm,
    /// Stop the deadline; no sequence is pending
    Disarm,
}

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decoded {
    /// Input produced by this byte, if any
    pub input: Option<TerminalInput>,
    /// What the caller must do with the deadline timer
    pub timer: TimerOp,
}

/// Decoder states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoderState {
    /// Pass-through; not inside a sequence
    Idle,
    /// Got ESC, waiting for `[` or the deadline
    SawEscape,
    /// Got `ESC [`, waiting for the key byte
    SawBracket,
    /// Got a multi-step key byte, waiting for `~`
    AwaitingTerminator,
}

/// State machine for navigation key sequences
#[derive(Debug, Clone)]
pub struct EscapeDecoder {
    state: DecoderState,
    /// Raw bytes of the sequence in flight
    seq: Vec<u8, MAX_SEQUENCE>,
    /// Key to emit when the terminator arrives
    pending: Option<NavKey>,
}

impl Default for EscapeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EscapeDecoder {
    /// Create a decoder in the pass-through state
    pub const fn new() -> Self {
        Self {
            state: DecoderState::Idle,
            seq: Vec::new(),
            pending: None,
        }
    }

    /// Current state (mainly for diagnostics)
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Raw bytes of the sequence currently in flight
    pub fn sequence(&self) -> &[u8] {
        &self.seq
    }

    /// True if a sequence is in flight and the deadline should be running
    pub fn mid_sequence(&self) -> bool {
        self.state != DecoderState::Idle
    }

    fn reset(&mut self) {
        self.state = DecoderState::Idle;
        self.seq.clear();
        self.pending = None;
    }

    fn buffer(&mut self, byte: u8) {
        // Capacity equals the longest sequence; a push can only fail if the
        // state machine is broken, and then the byte is only diagnostics.
        let _ = self.seq.push(byte);
    }

    /// Feed one received byte
    ///
    /// The caller must apply the returned [`TimerOp`] to the deadline timer:
    /// the arrival of any byte ends the previous wait, and `Arm` restarts
    /// the deadline whenever the decoder is left mid-sequence.
    pub fn feed(&mut self, byte: u8) -> Decoded {
        let input = match self.state {
            DecoderState::Idle => {
                if byte == ESC {
                    self.buffer(byte);
                    self.state = DecoderState::SawEscape;
                    None
                } else {
                    Some(TerminalInput::Byte(byte))
                }
            }
            DecoderState::SawEscape => {
                if byte == BRACKET {
                    self.buffer(byte);
                    self.state = DecoderState::SawBracket;
                    None
                } else {
                    // Not a sequence after all; the buffered ESC and this
                    // byte are both dropped.
                    self.reset();
                    None
                }
            }
            DecoderState::SawBracket => {
                self.buffer(byte);
                match byte {
                    KEY_UP => self.complete(NavKey::Up),
                    KEY_DOWN => self.complete(NavKey::Down),
                    KEY_RIGHT => self.complete(NavKey::Right),
                    KEY_LEFT => self.complete(NavKey::Left),
                    KEY_HOME => {
                        // Observably final: the key fires now, and the
                        // trailing ~ completes the sequence silently.
                        self.state = DecoderState::AwaitingTerminator;
                        self.pending = None;
                        Some(TerminalInput::Key(NavKey::Home))
                    }
                    KEY_INSERT => self.await_terminator(NavKey::Insert),
                    KEY_END => self.await_terminator(NavKey::End),
                    KEY_PAGE_UP => self.await_terminator(NavKey::PageUp),
                    KEY_PAGE_DOWN => self.await_terminator(NavKey::PageDown),
                    other => {
                        // Probably a four-byte sequence we do not know;
                        // report it and wait out the terminator.
                        self.state = DecoderState::AwaitingTerminator;
                        self.pending = None;
                        Some(TerminalInput::Unrecognized(other))
                    }
                }
            }
            DecoderState::AwaitingTerminator => {
                if byte == TERMINATOR {
                    let key = self.pending.take();
                    self.reset();
                    key.map(TerminalInput::Key)
                } else {
                    self.reset();
                    None
                }
            }
        };

        let timer = if self.state == DecoderState::Idle {
            TimerOp::Disarm
        } else {
            TimerOp::Arm
        };
        Decoded { input, timer }
    }

    /// The deadline expired with a sequence still in flight
    ///
    /// A timeout mid-sequence means the user pressed and released ESC by
    /// itself; anything buffered beyond the ESC is discarded with it.
    pub fn deadline_elapsed(&mut self) -> Option<TerminalInput> {
        if self.state == DecoderState::Idle {
            return None;
        }
        self.reset();
        Some(TerminalInput::LoneEscape)
    }

    fn complete(&mut self, key: NavKey) -> Option<TerminalInput> {
        self.reset();
        Some(TerminalInput::Key(key))
    }

    fn await_terminator(&mut self, key: NavKey) -> Option<TerminalInput> {
        self.state = DecoderState::AwaitingTerminator;
        self.pending = Some(key);
        None
    }
}
