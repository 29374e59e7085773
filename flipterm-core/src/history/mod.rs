//! History ring storage
//!
//! A fixed arena of line pages plus the active/recall indices that make it
//! a scrollback ring. All slot advancement goes through one wrap-safe
//! operation; there are no raw pointers and no globals.

pub mod page;
pub mod ring;

pub use page::HistoryPage;
pub use ring::HistoryRing;
