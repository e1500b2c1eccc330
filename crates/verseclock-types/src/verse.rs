//! Verse records and the document they are delivered in.

use serde::{Deserialize, Deserializer, Serialize};

/// One verse mapped to a displayed hour and minute.
///
/// `chapter` doubles as the hour (1-12) and `verse` as the minute (0-59).
/// Ranges are not enforced at the type level; the dataset is trusted and
/// the store only reports records that fall outside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseRecord {
    /// Book name. May be empty, `null`, or absent, in which case the
    /// display falls back to a fixed title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub book: String,
    /// Chapter number, matched against the twelve-hour clock hour.
    pub chapter: u32,
    /// Verse number, matched against the minute.
    pub verse: u32,
    /// The verse text shown as the clock body.
    pub text: String,
}

impl VerseRecord {
    /// Whether the chapter is a valid twelve-hour clock hour and the verse
    /// a valid minute.
    pub const fn is_clock_aligned(&self) -> bool {
        self.chapter >= 1 && self.chapter <= 12 && self.verse <= 59
    }
}

/// The wire shape served by a verse provider: `{ "verses": [...] }`.
///
/// A document without a `verses` key decodes to an empty list. serde also
/// accepts a struct in sequence form, so a bare top-level array decodes
/// positionally: `[]` is an empty document and `[[...records]]` carries the
/// records. Both are accepted rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseDocument {
    /// Verse records in dataset order.
    #[serde(default)]
    pub verses: Vec<VerseRecord>,
}

/// Decode a string that may be `null` as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_book_defaults_to_empty() {
        let record: VerseRecord =
            serde_json::from_str(r#"{"chapter": 3, "verse": 16, "text": "For God so loved"}"#)
                .unwrap();
        assert_eq!(record.book, "");
        assert_eq!(record.chapter, 3);
        assert_eq!(record.verse, 16);
    }

    #[test]
    fn null_book_decodes_as_empty() {
        let record: VerseRecord = serde_json::from_str(
            r#"{"book": null, "chapter": 1, "verse": 1, "text": "In the beginning"}"#,
        )
        .unwrap();
        assert_eq!(record.book, "");
        assert_eq!(record.text, "In the beginning");
    }

    #[test]
    fn non_string_book_is_rejected() {
        let result = serde_json::from_str::<VerseRecord>(
            r#"{"book": 42, "chapter": 1, "verse": 1, "text": "x"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn document_without_verses_is_empty() {
        let doc: VerseDocument = serde_json::from_str(r#"{"title": "unused"}"#).unwrap();
        assert!(doc.verses.is_empty());
    }

    #[test]
    fn bare_array_decodes_in_sequence_form() {
        let doc: VerseDocument = serde_json::from_str("[]").unwrap();
        assert!(doc.verses.is_empty());

        let doc: VerseDocument =
            serde_json::from_str(r#"[[{"chapter": 2, "verse": 8, "text": "grace"}]]"#).unwrap();
        assert_eq!(doc.verses.len(), 1);

        let result = serde_json::from_str::<VerseDocument>(
            r#"[{"chapter": 2, "verse": 8, "text": "grace"}]"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn negative_chapter_is_rejected() {
        let result =
            serde_json::from_str::<VerseRecord>(r#"{"chapter": -1, "verse": 0, "text": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn clock_alignment() {
        let mut record = VerseRecord {
            book: "John".to_owned(),
            chapter: 12,
            verse: 59,
            text: String::new(),
        };
        assert!(record.is_clock_aligned());
        record.chapter = 13;
        assert!(!record.is_clock_aligned());
        record.chapter = 0;
        assert!(!record.is_clock_aligned());
        record.chapter = 1;
        record.verse = 60;
        assert!(!record.is_clock_aligned());
    }
}
