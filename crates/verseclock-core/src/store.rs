//! The verse collection and the time-to-verse lookup.
//!
//! A [`VerseStore`] is built once from a [`VerseProvider`] and is read-only
//! afterwards. Its only query is [`VerseStore::resolve`], which degrades
//! through three tiers so that a non-empty store always answers:
//!
//! 1. **Exact** -- `chapter == hour && verse == minute`
//! 2. **Same hour** -- `chapter == hour`, any minute
//! 3. **Any available** -- the first record in the collection
//!
//! Within each tier the first record in collection order wins. Duplicate
//! `chapter:verse` keys are allowed and are never reordered.

use std::future::Future;

use tracing::{debug, info, warn};
use verseclock_types::{VerseDocument, VerseRecord};

use crate::error::LoadError;

/// Number of payload characters echoed at `debug` level on load.
const PAYLOAD_PREVIEW_CHARS: usize = 200;

/// A source of raw verse data.
///
/// Implementations fetch the verse document (`{ "verses": [...] }`) as
/// text. Each call must observe the source's current state; HTTP
/// implementations are expected to defeat intermediate caches.
pub trait VerseProvider {
    /// Short description of where verses come from, for logs.
    fn describe(&self) -> String;

    /// Fetch the raw verse document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Unreachable`] or [`LoadError::Status`] when the
    /// source cannot deliver a document.
    fn fetch(&self) -> impl Future<Output = Result<String, LoadError>>;
}

/// Which fallback tier produced a resolved verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Chapter and verse both matched the sampled hour and minute.
    Exact,
    /// Only the chapter matched the sampled hour.
    SameHour,
    /// Nothing matched; the first record in the collection was used.
    AnyAvailable,
}

/// Immutable, order-preserving collection of verse records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseStore {
    records: Vec<VerseRecord>,
}

impl VerseStore {
    /// Build a store directly from records, keeping their order.
    pub const fn from_records(records: Vec<VerseRecord>) -> Self {
        Self { records }
    }

    /// Parse a raw verse document into a store.
    ///
    /// Records outside the clock range (chapter 1-12, verse 0-59) are kept
    /// but reported once with a warning. A `null` book reads as empty, and a
    /// bare `[]` parses as an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Malformed`] if the text is not a verse document.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let document: VerseDocument = serde_json::from_str(raw)?;

        let misaligned = document
            .verses
            .iter()
            .filter(|record| !record.is_clock_aligned())
            .count();
        if misaligned > 0 {
            warn!(
                misaligned,
                total = document.verses.len(),
                "verse records outside the 1-12 chapter / 0-59 verse range"
            );
        }

        Ok(Self::from_records(document.verses))
    }

    /// Fetch from `provider` and parse the result.
    ///
    /// Nothing is retained when this fails.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`LoadError`], or returns
    /// [`LoadError::Malformed`] if the payload does not parse.
    pub async fn load<P: VerseProvider>(provider: &P) -> Result<Self, LoadError> {
        let source = provider.describe();
        debug!(source, "requesting verse document");

        let raw = provider.fetch().await?;
        debug!(
            source,
            bytes = raw.len(),
            preview = %payload_preview(&raw),
            "verse document received"
        );

        let store = Self::parse(&raw)?;
        info!(source, verse_count = store.len(), "verses loaded");
        Ok(store)
    }

    /// Resolve the verse to show for a twelve-hour `hour` and `minute`.
    ///
    /// Returns `None` only when the store is empty.
    pub fn resolve(&self, hour: u32, minute: u32) -> Option<&VerseRecord> {
        self.resolve_with_tier(hour, minute).map(|(record, _)| record)
    }

    /// Like [`resolve`](Self::resolve), also reporting which tier matched.
    pub fn resolve_with_tier(&self, hour: u32, minute: u32) -> Option<(&VerseRecord, MatchTier)> {
        if let Some(exact) = self
            .records
            .iter()
            .find(|r| r.chapter == hour && r.verse == minute)
        {
            return Some((exact, MatchTier::Exact));
        }

        if let Some(same_hour) = self.records.iter().find(|r| r.chapter == hour) {
            return Some((same_hour, MatchTier::SameHour));
        }

        self.records
            .first()
            .map(|first| (first, MatchTier::AnyAvailable))
    }

    /// Number of records held.
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in collection order.
    pub const fn records(&self) -> &[VerseRecord] {
        self.records.as_slice()
    }
}

/// First [`PAYLOAD_PREVIEW_CHARS`] characters of a payload, with an
/// ellipsis when truncated.
fn payload_preview(raw: &str) -> String {
    let mut preview: String = raw.chars().take(PAYLOAD_PREVIEW_CHARS).collect();
    if preview.len() < raw.len() {
        preview.push_str("...");
    }
    preview
}
