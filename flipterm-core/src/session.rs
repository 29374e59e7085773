//! Terminal session engine
//!
//! One owned struct ties the pieces together: the history ring, the entry
//! mode, and the configured defaults. Decoded input comes in through
//! [`Session::on_input`]; what comes back is a [`Reaction`] - a frame to
//! draw, a byte to forward to the display's own controller, or a replay
//! animation for the firmware to pace.
//!
//! Everything runs in the consumer context; there is no shared state here.

use crate::config::{TerminalConfig, DISPLAY_WIDTH, LINE_BUF, PAGE_COUNT};
use crate::decode::{NavKey, TerminalInput};
use crate::history::HistoryRing;
use crate::render::{self, EntryMode, RenderOps, Replay};
use crate::traits::display::{BS, CR, EOL_STOP, EOL_WRAP, LF, TAB};

/// Session sized for the product configuration
pub type TerminalSession = Session<PAGE_COUNT, LINE_BUF>;

/// What the caller should do with a handled input
#[derive(Debug)]
pub enum Reaction<'a, const BUF: usize> {
    /// Nothing to draw
    None,
    /// Issue this frame to the transport
    Render(RenderOps<'a>),
    /// Send this byte to the display verbatim (its controller interprets
    /// cursor motion and bell itself)
    Forward(u8),
    /// Run this animation, one frame per configured delay tick
    Replay(Replay<'a, BUF>),
}

/// Terminal session: history ring, entry mode, configuration
#[derive(Debug)]
pub struct Session<const PAGES: usize, const BUF: usize> {
    ring: HistoryRing<PAGES, BUF>,
    mode: EntryMode,
    config: TerminalConfig,
}

impl<const PAGES: usize, const BUF: usize> Session<PAGES, BUF> {
    /// Create a session with an empty history ring
    pub fn new(config: TerminalConfig) -> Self {
        Self {
            ring: HistoryRing::new(),
            mode: config.default_mode,
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Current entry mode
    pub fn mode(&self) -> EntryMode {
        self.mode
    }

    /// Explicitly select an entry mode (configuration path)
    pub fn set_mode(&mut self, mode: EntryMode) {
        self.mode = mode;
    }

    /// Slot currently receiving input
    pub fn active_slot(&self) -> usize {
        self.ring.active_index()
    }

    /// Slot currently displayed
    pub fn recall_slot(&self) -> usize {
        self.ring.recall_index()
    }

    /// History storage (diagnostics and tests)
    pub fn ring(&self) -> &HistoryRing<PAGES, BUF> {
        &self.ring
    }

    /// Append a character to the active page
    ///
    /// Returns the active slot and the frame showing the result. If the
    /// user was browsing history the session returns home first and the
    /// frame redraws the whole live page instead of echoing one byte.
    pub fn append(&mut self, byte: u8) -> (usize, RenderOps<'_>) {
        let was_browsing = self.ring.is_browsing();
        if was_browsing {
            self.ring.return_home();
        }

        let slot = self.ring.append(byte);
        let mode_at_echo = self.mode;
        let page = self.ring.active_page_mut();
        page.advance_cursor(DISPLAY_WIDTH);
        if self.mode == EntryMode::LeftEntry && page.cursor_col() >= DISPLAY_WIDTH - 1 {
            // The line just filled the display; further input scrolls
            self.mode = EntryMode::LeftEntryEolScroll;
        }

        let ops = if was_browsing {
            render::recall_frame(self.mode, self.ring.active_page(), DISPLAY_WIDTH)
        } else {
            render::echo_append(mode_at_echo, self.ring.active_page(), byte, DISPLAY_WIDTH)
        };
        (slot, ops)
    }

    /// Rotate to a fresh page
    ///
    /// The mode returns to the configured default only when that default is
    /// `LeftEntry`; any other default leaves the mode as the user last set
    /// it. Quirk kept from the original firmware.
    pub fn start_new_line(&mut self) -> (usize, RenderOps<'_>) {
        let slot = self.ring.start_new_line();
        if self.config.default_mode == EntryMode::LeftEntry {
            self.mode = EntryMode::LeftEntry;
        }
        let mut ops = RenderOps::new();
        let _ = ops.push(render::RenderOp::Clear);
        (slot, ops)
    }

    /// Show a history page without touching the active one
    ///
    /// Out-of-range slots are a silent no-op (empty frame).
    pub fn recall(&mut self, slot: usize) -> RenderOps<'_> {
        if !self.ring.set_recall(slot) {
            return RenderOps::new();
        }
        match self.ring.page(slot) {
            Some(page) => render::recall_frame(self.mode, page, DISPLAY_WIDTH),
            None => RenderOps::new(),
        }
    }

    /// Browse one page back
    pub fn recall_previous(&mut self) -> RenderOps<'_> {
        let slot = HistoryRing::<PAGES, BUF>::prev_slot(self.ring.recall_index());
        self.recall(slot)
    }

    /// Browse one page forward
    pub fn recall_next(&mut self) -> RenderOps<'_> {
        let slot = HistoryRing::<PAGES, BUF>::next_slot(self.ring.recall_index());
        self.recall(slot)
    }

    /// Animated recall of a page; `None` for out-of-range slots
    pub fn replay(&self, slot: usize) -> Option<Replay<'_, BUF>> {
        self.ring
            .page(slot)
            .map(|page| Replay::new(self.mode, page, DISPLAY_WIDTH))
    }

    /// End browsing and redraw the live page
    pub fn return_home(&mut self) -> RenderOps<'_> {
        self.ring.return_home();
        render::recall_frame(self.mode, self.ring.active_page(), DISPLAY_WIDTH)
    }

    /// Heuristic oldest-page lookup (see [`HistoryRing::find_oldest`])
    pub fn find_oldest(&self) -> usize {
        self.ring.find_oldest()
    }

    /// Handle one decoded input
    pub fn on_input(&mut self, input: TerminalInput) -> Reaction<'_, BUF> {
        match input {
            TerminalInput::Byte(byte) => self.on_byte(byte),
            TerminalInput::Key(key) => self.on_key(key),
            // ESC by itself ends browsing
            TerminalInput::LoneEscape => Reaction::Render(self.return_home()),
            TerminalInput::Unrecognized(_) => Reaction::None,
        }
    }

    fn on_byte(&mut self, byte: u8) -> Reaction<'_, BUF> {
        match byte {
            // The display's own LF semantics (clear + home) make CR and LF
            // equivalent at the page level
            CR | LF => {
                let (_, ops) = self.start_new_line();
                Reaction::Render(ops)
            }
            EOL_WRAP => {
                self.set_mode(EntryMode::LeftEntry);
                Reaction::None
            }
            EOL_STOP => {
                self.set_mode(EntryMode::RightEntry);
                Reaction::None
            }
            0x20..=0x7e => {
                let (_, ops) = self.append(byte);
                Reaction::Render(ops)
            }
            // Remaining control bytes (BS, TAB, BEL, ...) are understood by
            // the 8041 controller directly
            other => Reaction::Forward(other),
        }
    }

    fn on_key(&mut self, key: NavKey) -> Reaction<'_, BUF> {
        match key {
            NavKey::Up => Reaction::Render(self.recall_previous()),
            NavKey::Down => Reaction::Render(self.recall_next()),
            NavKey::Left => Reaction::Forward(BS),
            NavKey::Right => Reaction::Forward(TAB),
            NavKey::Home => Reaction::Render(self.return_home()),
            NavKey::End => {
                let slot = self.find_oldest();
                Reaction::Render(self.recall(slot))
            }
            NavKey::PageUp => match self.replay(self.recall_slot()) {
                Some(replay) => Reaction::Replay(replay),
                None => Reaction::None,
            },
            NavKey::PageDown => match self.replay(self.active_slot()) {
                Some(replay) => Reaction::Replay(replay),
                None => Reaction::None,
            },
            NavKey::Insert => {
                self.mode = match self.mode {
                    EntryMode::RightEntry => EntryMode::LeftEntry,
                    _ => EntryMode::RightEntry,
                };
                Reaction::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderOp;

    type TestSession = Session<4, LINE_BUF>;

    fn session() -> TestSession {
        Session::new(TerminalConfig::default())
    }

    fn type_str(s: &mut TestSession, text: &[u8]) {
        for &b in text {
            s.append(b);
        }
    }

    #[test]
    fn test_append_reports_slot_and_echo() {
        let mut s = session();
        let (slot, ops) = s.append(b'A');
        assert_eq!(slot, 0);
        assert_eq!(ops, [RenderOp::WriteByte(b'A')]);
    }

    #[test]
    fn test_mode_switches_at_display_edge() {
        let mut s = session();
        for _ in 0..38 {
            s.append(b'x');
        }
        assert_eq!(s.mode(), EntryMode::LeftEntry);
        // The 39th character lands on the last free column
        s.append(b'x');
        assert_eq!(s.mode(), EntryMode::LeftEntryEolScroll);

        // The next character redraws as a sliding window
        let (_, ops) = s.append(b'y');
        assert!(matches!(ops[0], RenderOp::Clear));
    }

    #[test]
    fn test_new_line_resets_mode_for_left_default() {
        let mut s = session();
        type_str(&mut s, &[b'x'; 45]);
        assert_eq!(s.mode(), EntryMode::LeftEntryEolScroll);

        let (slot, ops) = s.start_new_line();
        assert_eq!(slot, 1);
        assert_eq!(ops, [RenderOp::Clear]);
        drop(ops);
        assert_eq!(s.mode(), EntryMode::LeftEntry);
    }

    #[test]
    fn test_new_line_keeps_mode_for_right_default() {
        // Quirk: with a non-LeftEntry default the mode survives rotation,
        // whatever it currently is
        let mut s: TestSession = Session::new(TerminalConfig {
            default_mode: EntryMode::RightEntry,
            ..TerminalConfig::default()
        });
        assert_eq!(s.mode(), EntryMode::RightEntry);
        s.set_mode(EntryMode::LeftEntry);
        s.start_new_line();
        assert_eq!(s.mode(), EntryMode::LeftEntry);
    }

    #[test]
    fn test_cr_and_lf_rotate_pages() {
        let mut s = session();
        s.on_input(TerminalInput::Byte(b'a'));
        s.on_input(TerminalInput::Byte(CR));
        assert_eq!(s.active_slot(), 1);
        s.on_input(TerminalInput::Byte(LF));
        assert_eq!(s.active_slot(), 2);
    }

    #[test]
    fn test_eol_codes_select_mode() {
        let mut s = session();
        s.on_input(TerminalInput::Byte(EOL_STOP));
        assert_eq!(s.mode(), EntryMode::RightEntry);
        s.on_input(TerminalInput::Byte(EOL_WRAP));
        assert_eq!(s.mode(), EntryMode::LeftEntry);
    }

    #[test]
    fn test_control_bytes_forwarded() {
        let mut s = session();
        assert!(matches!(
            s.on_input(TerminalInput::Byte(BS)),
            Reaction::Forward(b) if b == BS
        ));
        assert!(matches!(
            s.on_input(TerminalInput::Key(NavKey::Right)),
            Reaction::Forward(b) if b == TAB
        ));
    }

    #[test]
    fn test_up_down_browse_history() {
        let mut s = session();
        type_str(&mut s, b"one");
        s.start_new_line();
        type_str(&mut s, b"two");

        let ops = s.recall_previous();
        assert_eq!(
            ops,
            [
                RenderOp::Clear,
                RenderOp::WriteBytes(b"one"),
                RenderOp::SetColumn(3),
            ]
        );
        drop(ops);
        assert_eq!(s.recall_slot(), 0);
        assert_eq!(s.active_slot(), 1);

        let ops = s.recall_next();
        assert_eq!(
            ops,
            [
                RenderOp::Clear,
                RenderOp::WriteBytes(b"two"),
                RenderOp::SetColumn(3),
            ]
        );
        drop(ops);
        assert_eq!(s.recall_slot(), 1);
    }

    #[test]
    fn test_typing_while_browsing_returns_home() {
        let mut s = session();
        type_str(&mut s, b"old");
        s.start_new_line();
        type_str(&mut s, b"ne");
        s.recall_previous();
        assert!(s.ring().is_browsing());

        // The next character lands on the live page and the frame redraws
        // the whole line, not a one-byte echo
        let (slot, ops) = s.append(b'w');
        assert_eq!(slot, 1);
        assert_eq!(
            ops,
            [
                RenderOp::Clear,
                RenderOp::WriteBytes(b"new"),
                RenderOp::SetColumn(3),
            ]
        );
        drop(ops);
        assert!(!s.ring().is_browsing());
    }

    #[test]
    fn test_recall_out_of_range_is_noop() {
        let mut s = session();
        type_str(&mut s, b"abc");
        let before = s.recall_slot();
        let ops = s.recall(99);
        assert!(ops.is_empty());
        drop(ops);
        assert_eq!(s.recall_slot(), before);
    }

    #[test]
    fn test_replay_out_of_range_is_none() {
        let s = session();
        assert!(s.replay(99).is_none());
    }

    #[test]
    fn test_end_key_recalls_oldest() {
        let mut s = session();
        type_str(&mut s, b"first");
        s.start_new_line();
        type_str(&mut s, b"second");

        match s.on_input(TerminalInput::Key(NavKey::End)) {
            Reaction::Render(_) => {}
            other => panic!("expected a render frame, got {:?}", other),
        }
        assert_eq!(s.recall_slot(), 0);
    }

    #[test]
    fn test_lone_escape_ends_browsing() {
        let mut s = session();
        type_str(&mut s, b"live");
        s.start_new_line();
        type_str(&mut s, b"x");
        s.recall_previous();
        assert!(s.ring().is_browsing());

        let reaction = s.on_input(TerminalInput::LoneEscape);
        assert!(matches!(reaction, Reaction::Render(_)));
        drop(reaction);
        assert!(!s.ring().is_browsing());
    }

    #[test]
    fn test_insert_toggles_entry_mode() {
        let mut s = session();
        s.on_input(TerminalInput::Key(NavKey::Insert));
        assert_eq!(s.mode(), EntryMode::RightEntry);
        s.on_input(TerminalInput::Key(NavKey::Insert));
        assert_eq!(s.mode(), EntryMode::LeftEntry);
    }

    #[test]
    fn test_pageup_replays_viewed_page() {
        let mut s = session();
        type_str(&mut s, b"abc");
        s.start_new_line();
        s.recall(0);

        match s.on_input(TerminalInput::Key(NavKey::PageUp)) {
            Reaction::Replay(replay) => assert_eq!(replay.total_steps(), 3),
            other => panic!("expected a replay, got {:?}", other),
        };
    }
}
