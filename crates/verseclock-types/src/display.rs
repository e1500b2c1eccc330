//! The per-tick projection pushed to the output sink.

use serde::{Deserialize, Serialize};

/// What the clock face shows for one tick.
///
/// A pure projection of a [`ClockSample`](crate::ClockSample) and the verse
/// resolved for it. Rebuilt every tick; carries no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Book name, or the fallback phrase when the book is blank.
    pub title: String,
    /// `chapter:verse` with the verse zero-padded to two digits.
    pub chapter_verse_label: String,
    /// Verse text, or the no-verse placeholder.
    pub body_text: String,
}
