//! One logical line of history
//!
//! A page owns the line buffer for one entered line together with its
//! counters: how many characters were ever appended, where the next byte
//! lands, and the last known screen column. Pages are storage slots - the
//! slot id is fixed at ring construction and is not a chronological
//! sequence number.

/// One history page
///
/// `BUF` is the line buffer size; usable capacity is `BUF - 1` and the
/// final slot holds the terminator.
#[derive(Debug, Clone)]
pub struct HistoryPage<const BUF: usize> {
    /// Fixed storage slot index, assigned once by the ring
    slot: usize,
    /// Characters ever appended since the last reset; keeps counting past
    /// capacity and wraps at the integer width
    chars_written: u32,
    /// Next free buffer index; pins at capacity once the line is full
    write_pos: usize,
    /// Last known screen column for this page's content
    cursor_col: usize,
    line: [u8; BUF],
}

impl<const BUF: usize> HistoryPage<BUF> {
    const BUF_CHECK: () = assert!(BUF >= 2, "line buffer needs a character slot plus the terminator");

    /// Usable characters per line; the remaining slot is the terminator
    pub const CAPACITY: usize = BUF - 1;

    /// Create an empty page for the given storage slot
    pub const fn new(slot: usize) -> Self {
        let () = Self::BUF_CHECK;
        Self {
            slot,
            chars_written: 0,
            write_pos: 0,
            cursor_col: 0,
            line: [0; BUF],
        }
    }

    /// Fixed storage slot of this page
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Characters ever appended since the last reset
    pub fn chars_written(&self) -> u32 {
        self.chars_written
    }

    /// Next free buffer index
    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Last known screen column
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// True once more characters arrived than the buffer retains
    pub fn is_saturated(&self) -> bool {
        self.chars_written as usize > Self::CAPACITY
    }

    /// Append one character
    ///
    /// Once the line is full `write_pos` stays pinned at capacity, so every
    /// further byte lands on the terminator slot and is clobbered by the
    /// next terminator write: saturated input is retained only in
    /// `chars_written`. That aliasing matches the original hardware
    /// firmware and is relied on by the render window math.
    pub fn append(&mut self, byte: u8) {
        self.chars_written = self.chars_written.wrapping_add(1);
        self.line[self.write_pos] = byte;
        if self.write_pos < Self::CAPACITY {
            self.write_pos += 1;
            self.line[self.write_pos] = 0;
        }
    }

    /// Advance the cursor one column, capped at the last column
    pub fn advance_cursor(&mut self, width: usize) {
        self.cursor_col = (self.cursor_col + 1).min(width - 1);
    }

    /// Clear the page for reuse as a fresh line
    pub fn reset(&mut self) {
        self.chars_written = 0;
        self.write_pos = 0;
        self.cursor_col = 0;
        self.line = [0; BUF];
    }

    /// Retained line content
    pub fn text(&self) -> &[u8] {
        &self.line[..self.write_pos]
    }

    /// Newest byte sitting on the terminator slot, if the line is saturated
    pub fn overflow_byte(&self) -> u8 {
        self.line[Self::CAPACITY]
    }

    /// Heuristic "has this slot ever been used" probe
    ///
    /// Checks only whether the first buffer byte is nonzero. A slot that
    /// was written and later reset reads as never used - there is no
    /// generation counter to tell the two apart.
    pub fn in_use(&self) -> bool {
        self.line[0] != 0
    }
}
