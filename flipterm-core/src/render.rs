//! Render policy
//!
//! Pure translation from (entry mode, page state) to a short list of
//! transport operations. Nothing here touches hardware: the session asks
//! for a frame, and the firmware's executor walks the ops against the
//! transport trait. That split keeps every window computation testable on
//! the host.
//!
//! The display is a single line with an auto-advancing write position, so
//! frames are small: at most a clear, a cursor move or two, and one write.

use heapless::Vec;

use crate::history::HistoryPage;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where newly typed characters enter the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntryMode {
    /// Characters enter left to right from column 0
    #[default]
    LeftEntry,
    /// LeftEntry that has filled the display and now redraws a sliding
    /// window ending at the newest character
    LeftEntryEolScroll,
    /// Characters enter at the rightmost column; existing content crawls
    /// left, ticker style
    RightEntry,
}

/// One transport operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderOp<'a> {
    /// Clear the display and home the hardware cursor
    Clear,
    /// Move the hardware cursor to a column
    SetColumn(usize),
    /// Write one byte at the cursor (the cursor auto-advances)
    WriteByte(u8),
    /// Write a run of bytes at the cursor
    WriteBytes(&'a [u8]),
}

/// Upper bound on ops per frame
pub const MAX_RENDER_OPS: usize = 6;

/// One frame of transport operations
pub type RenderOps<'a> = Vec<RenderOp<'a>, MAX_RENDER_OPS>;

/// Sliding window for a scrolled left-entry line
///
/// Window start per the original firmware: `chars_written - width` once the
/// line buffer has saturated, otherwise `write_pos - width`. The saturated
/// start keeps growing with `chars_written` even though the buffer stopped
/// retaining bytes, so it is clamped to the retained tail here (the C
/// driver reads past its buffer instead).
pub fn left_scroll_window<const BUF: usize>(page: &HistoryPage<BUF>, width: usize) -> &[u8] {
    let count = page.chars_written() as usize;
    let pos = page.write_pos();

    let start = if count >= HistoryPage::<BUF>::CAPACITY {
        count.saturating_sub(width)
    } else {
        pos.saturating_sub(width)
    };
    let start = start.min(pos.saturating_sub(width));
    let end = (start + width).min(pos);
    &page.text()[start..end]
}

/// Frame echoing a byte that was just appended to `page`
///
/// `page` must already contain the byte; `byte` itself is passed in because
/// a saturated page no longer retains it. The caller advances the page
/// cursor and applies the left-entry mode transition after issuing the
/// frame.
pub fn echo_append<'a, const BUF: usize>(
    mode: EntryMode,
    page: &'a HistoryPage<BUF>,
    byte: u8,
    width: usize,
) -> RenderOps<'a> {
    let mut ops = RenderOps::new();
    match mode {
        EntryMode::LeftEntry => {
            // The hardware cursor is already sitting at the entry column
            let _ = ops.push(RenderOp::WriteByte(byte));
        }
        EntryMode::LeftEntryEolScroll => {
            let _ = ops.push(RenderOp::Clear);
            let _ = ops.push(RenderOp::WriteBytes(left_scroll_window(page, width)));
            // Cosmetic: park the cursor on the newest character
            let _ = ops.push(RenderOp::SetColumn(width - 1));
        }
        EntryMode::RightEntry => {
            let count = page.chars_written() as usize;
            let pos = page.write_pos();
            if count > HistoryPage::<BUF>::CAPACITY {
                // Saturated: everything shown is already in place, only the
                // last column changes
                let _ = ops.push(RenderOp::SetColumn(width - 1));
                let _ = ops.push(RenderOp::WriteByte(b' '));
                let _ = ops.push(RenderOp::SetColumn(width - 1));
                let _ = ops.push(RenderOp::WriteByte(byte));
            } else if count > width {
                // Longer than the display: redraw the trailing window
                let _ = ops.push(RenderOp::Clear);
                let _ = ops.push(RenderOp::WriteBytes(&page.text()[pos - width..pos]));
            } else {
                // Still fits: back the cursor off the right edge and
                // rewrite the whole line shifted one column left
                let col = width - count;
                let _ = ops.push(RenderOp::SetColumn(col));
                let _ = ops.push(RenderOp::WriteBytes(page.text()));
            }
        }
    }
    ops
}

/// Frame showing a page from scratch (recall, return-home)
pub fn recall_frame<'a, const BUF: usize>(
    mode: EntryMode,
    page: &'a HistoryPage<BUF>,
    width: usize,
) -> RenderOps<'a> {
    let mut ops = RenderOps::new();
    let pos = page.write_pos();
    match mode {
        EntryMode::LeftEntry | EntryMode::LeftEntryEolScroll if pos > width => {
            let _ = ops.push(RenderOp::Clear);
            let _ = ops.push(RenderOp::WriteBytes(left_scroll_window(page, width)));
            let _ = ops.push(RenderOp::SetColumn(width - 1));
        }
        EntryMode::LeftEntry | EntryMode::LeftEntryEolScroll => {
            let _ = ops.push(RenderOp::Clear);
            if pos > 0 {
                let _ = ops.push(RenderOp::WriteBytes(page.text()));
            }
            let _ = ops.push(RenderOp::SetColumn(pos.min(width - 1)));
        }
        EntryMode::RightEntry => {
            let _ = ops.push(RenderOp::Clear);
            let start = pos.saturating_sub(width);
            let window = &page.text()[start..pos];
            if !window.is_empty() {
                let _ = ops.push(RenderOp::SetColumn(width - window.len()));
                let _ = ops.push(RenderOp::WriteBytes(window));
            }
        }
    }
    ops
}

/// Animated recall: one frame per retained character
///
/// Reproduces the append history of a page with the mode's own growth
/// behavior. Characters that were lost to saturation cannot be replayed;
/// the animation covers the retained buffer.
#[derive(Debug, Clone)]
pub struct Replay<'a, const BUF: usize> {
    page: &'a HistoryPage<BUF>,
    mode: EntryMode,
    width: usize,
    step: usize,
}

impl<'a, const BUF: usize> Replay<'a, BUF> {
    /// Set up a replay of `page` under `mode`
    pub fn new(mode: EntryMode, page: &'a HistoryPage<BUF>, width: usize) -> Self {
        Self {
            page,
            mode,
            width,
            step: 0,
        }
    }

    /// Frames this replay will yield
    pub fn total_steps(&self) -> usize {
        self.page.write_pos()
    }
}

impl<'a, const BUF: usize> Iterator for Replay<'a, BUF> {
    type Item = RenderOps<'a>;

    fn next(&mut self) -> Option<RenderOps<'a>> {
        if self.step >= self.page.write_pos() {
            return None;
        }
        self.step += 1;
        let shown = self.step;
        let text = self.page.text();
        let mut ops = RenderOps::new();

        match self.mode {
            EntryMode::RightEntry => {
                // Growing right-aligned suffix; earlier columns are always
                // rewritten by the next frame, so only the first frame
                // needs a clear
                if shown == 1 {
                    let _ = ops.push(RenderOp::Clear);
                }
                let window = &text[shown.saturating_sub(self.width)..shown];
                let _ = ops.push(RenderOp::SetColumn(self.width - window.len()));
                let _ = ops.push(RenderOp::WriteBytes(window));
            }
            EntryMode::LeftEntry | EntryMode::LeftEntryEolScroll => {
                if shown <= self.width {
                    // Append one character at the auto-advanced cursor
                    if shown == 1 {
                        let _ = ops.push(RenderOp::Clear);
                    }
                    let _ = ops.push(RenderOp::WriteByte(text[shown - 1]));
                } else {
                    // Past the display width: sliding window
                    let _ = ops.push(RenderOp::Clear);
                    let _ = ops.push(RenderOp::WriteBytes(&text[shown - self.width..shown]));
                    let _ = ops.push(RenderOp::SetColumn(self.width - 1));
                }
            }
        }
        Some(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DISPLAY_WIDTH, LINE_BUF};

    fn page_with(text: &[u8]) -> HistoryPage<LINE_BUF> {
        let mut page = HistoryPage::new(0);
        for &b in text {
            page.append(b);
        }
        page
    }

    #[test]
    fn test_left_entry_recall_roundtrip() {
        // Appending a short string then recalling it reproduces the string
        // left-aligned with the cursor parked after it
        let page = page_with(b"HELLO");
        let ops = recall_frame(EntryMode::LeftEntry, &page, DISPLAY_WIDTH);
        assert_eq!(
            ops,
            [
                RenderOp::Clear,
                RenderOp::WriteBytes(b"HELLO"),
                RenderOp::SetColumn(5),
            ]
        );
    }

    #[test]
    fn test_left_entry_recall_empty_page() {
        let page = page_with(b"");
        let ops = recall_frame(EntryMode::LeftEntry, &page, DISPLAY_WIDTH);
        assert_eq!(ops, [RenderOp::Clear, RenderOp::SetColumn(0)]);
    }

    #[test]
    fn test_right_entry_recall_trailing_window() {
        // Longer than the display but within the buffer: exactly the
        // trailing DISPLAY_WIDTH characters are shown
        let mut text = [0u8; 50];
        for (i, b) in text.iter_mut().enumerate() {
            *b = b'0' + (i % 10) as u8;
        }
        let page = page_with(&text);
        let ops = recall_frame(EntryMode::RightEntry, &page, DISPLAY_WIDTH);
        assert_eq!(
            ops,
            [
                RenderOp::Clear,
                RenderOp::SetColumn(0),
                RenderOp::WriteBytes(&text[10..50]),
            ]
        );
    }

    #[test]
    fn test_right_entry_recall_short_line() {
        let page = page_with(b"OK");
        let ops = recall_frame(EntryMode::RightEntry, &page, DISPLAY_WIDTH);
        assert_eq!(
            ops,
            [
                RenderOp::Clear,
                RenderOp::SetColumn(DISPLAY_WIDTH - 2),
                RenderOp::WriteBytes(b"OK"),
            ]
        );
    }

    #[test]
    fn test_echo_left_entry_is_single_write() {
        let mut page = page_with(b"ab");
        page.append(b'c');
        let ops = echo_append(EntryMode::LeftEntry, &page, b'c', DISPLAY_WIDTH);
        assert_eq!(ops, [RenderOp::WriteByte(b'c')]);
    }

    #[test]
    fn test_echo_scroll_window_before_saturation() {
        // 45 characters on a width-40 display: window starts at
        // write_pos - width = 5
        let mut text = [b'x'; 45];
        text[5] = b'A';
        let page = page_with(&text);
        let ops = echo_append(EntryMode::LeftEntryEolScroll, &page, b'x', DISPLAY_WIDTH);
        assert_eq!(
            ops,
            [
                RenderOp::Clear,
                RenderOp::WriteBytes(&text[5..45]),
                RenderOp::SetColumn(DISPLAY_WIDTH - 1),
            ]
        );
    }

    #[test]
    fn test_scroll_window_clamps_when_saturated() {
        // 100 appends on an 80 capacity page: the original start index
        // (chars_written - width = 60) would run past the retained bytes,
        // the window pins to the buffer tail instead
        let text = [b'y'; 100];
        let page = page_with(&text);
        let window = left_scroll_window(&page, DISPLAY_WIDTH);
        assert_eq!(window.len(), DISPLAY_WIDTH);
        assert_eq!(window, &page.text()[40..80]);
    }

    #[test]
    fn test_echo_right_entry_growing() {
        // Case: content still fits the display
        let mut page = page_with(b"hi");
        page.append(b'!');
        let ops = echo_append(EntryMode::RightEntry, &page, b'!', DISPLAY_WIDTH);
        assert_eq!(
            ops,
            [
                RenderOp::SetColumn(DISPLAY_WIDTH - 3),
                RenderOp::WriteBytes(b"hi!"),
            ]
        );
    }

    #[test]
    fn test_echo_right_entry_longer_than_display() {
        let text = [b'z'; 50];
        let page = page_with(&text);
        let ops = echo_append(EntryMode::RightEntry, &page, b'z', DISPLAY_WIDTH);
        assert_eq!(
            ops,
            [RenderOp::Clear, RenderOp::WriteBytes(&text[10..50])]
        );
    }

    #[test]
    fn test_echo_right_entry_saturated() {
        // Past the buffer: only the last column is touched
        let text = [b'q'; 85];
        let page = page_with(&text);
        let ops = echo_append(EntryMode::RightEntry, &page, b'q', DISPLAY_WIDTH);
        assert_eq!(
            ops,
            [
                RenderOp::SetColumn(DISPLAY_WIDTH - 1),
                RenderOp::WriteByte(b' '),
                RenderOp::SetColumn(DISPLAY_WIDTH - 1),
                RenderOp::WriteByte(b'q'),
            ]
        );
    }

    #[test]
    fn test_replay_left_entry_short_line() {
        let page = page_with(b"abc");
        let mut replay = Replay::new(EntryMode::LeftEntry, &page, DISPLAY_WIDTH);
        assert_eq!(replay.total_steps(), 3);

        assert_eq!(
            replay.next().unwrap(),
            [RenderOp::Clear, RenderOp::WriteByte(b'a')]
        );
        assert_eq!(replay.next().unwrap(), [RenderOp::WriteByte(b'b')]);
        assert_eq!(replay.next().unwrap(), [RenderOp::WriteByte(b'c')]);
        assert!(replay.next().is_none());
    }

    #[test]
    fn test_replay_left_entry_switches_to_window() {
        let text = [b'm'; 42];
        let page = page_with(&text);
        let replay = Replay::new(EntryMode::LeftEntry, &page, DISPLAY_WIDTH);
        let frames: Vec<RenderOps<'_>, 64> = replay.collect();
        assert_eq!(frames.len(), 42);

        // First 40 frames append; frame 41 starts redrawing windows
        assert_eq!(frames[39], [RenderOp::WriteByte(b'm')]);
        assert_eq!(
            frames[40],
            [
                RenderOp::Clear,
                RenderOp::WriteBytes(&text[1..41]),
                RenderOp::SetColumn(DISPLAY_WIDTH - 1),
            ]
        );
    }

    #[test]
    fn test_replay_right_entry_suffixes() {
        let page = page_with(b"ab");
        let mut replay = Replay::new(EntryMode::RightEntry, &page, DISPLAY_WIDTH);

        assert_eq!(
            replay.next().unwrap(),
            [
                RenderOp::Clear,
                RenderOp::SetColumn(DISPLAY_WIDTH - 1),
                RenderOp::WriteBytes(b"a"),
            ]
        );
        assert_eq!(
            replay.next().unwrap(),
            [
                RenderOp::SetColumn(DISPLAY_WIDTH - 2),
                RenderOp::WriteBytes(b"ab"),
            ]
        );
        assert!(replay.next().is_none());
    }
}
