//! Projection of a clock sample and resolved verse onto the clock face.
//!
//! [`project`] is pure; [`DisplaySink`] is the seam to whatever actually
//! draws the face. The core only ever writes to a sink, never reads back.

use verseclock_types::{ClockSample, DisplayState, VerseRecord};

use crate::config::ClockSettings;

/// Message shown when the verse collection could not be loaded.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load biblical verses";

/// Receiver of everything the clock face shows.
///
/// All methods replace what was shown before.
pub trait DisplaySink {
    /// Show or hide the loading indicator.
    fn show_loading(&mut self, visible: bool);

    /// Show an error message.
    fn show_error(&mut self, message: &str);

    /// Hide any visible error message.
    fn hide_error(&mut self);

    /// Show the formatted time of day, e.g. `3:05:09 PM`.
    fn show_time(&mut self, time: &str);

    /// Show the title, `chapter:verse` label, and body text.
    fn render(&mut self, display: &DisplayState);
}

/// Build the display for `sample` given the verse resolved for it.
///
/// With a verse, the label comes from the verse's own chapter and verse,
/// which can differ from the sampled time when a fallback tier matched.
/// Without one, the label comes from the sampled hour and minute and the
/// body is the configured placeholder.
pub fn project(
    sample: &ClockSample,
    verse: Option<&VerseRecord>,
    settings: &ClockSettings,
) -> DisplayState {
    verse.map_or_else(
        || DisplayState {
            title: settings.fallback_title.clone(),
            chapter_verse_label: chapter_verse_label(sample.hour12, sample.minute),
            body_text: settings.no_verse_text.clone(),
        },
        |record| {
            let title = if record.book.trim().is_empty() {
                settings.fallback_title.clone()
            } else {
                record.book.clone()
            };
            DisplayState {
                title,
                chapter_verse_label: chapter_verse_label(record.chapter, record.verse),
                body_text: record.text.clone(),
            }
        },
    )
}

/// `chapter:verse` with the verse padded to two digits.
pub fn chapter_verse_label(chapter: u32, verse: u32) -> String {
    format!("{chapter}:{verse:02}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::config::{DEFAULT_FALLBACK_TITLE, DEFAULT_NO_VERSE_TEXT};

    fn sample(hour: u32, minute: u32) -> ClockSample {
        ClockSample::from_time(&NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
    }

    fn verse(book: &str, chapter: u32, verse: u32) -> VerseRecord {
        VerseRecord {
            book: book.to_owned(),
            chapter,
            verse,
            text: "In the beginning".to_owned(),
        }
    }

    #[test]
    fn label_pads_verse() {
        assert_eq!(chapter_verse_label(9, 5), "9:05");
        assert_eq!(chapter_verse_label(12, 30), "12:30");
    }

    #[test]
    fn verse_fields_drive_the_face() {
        let settings = ClockSettings::default();
        let display = project(&sample(3, 16), Some(&verse("John", 3, 16)), &settings);
        assert_eq!(display.title, "John");
        assert_eq!(display.chapter_verse_label, "3:16");
        assert_eq!(display.body_text, "In the beginning");
    }

    #[test]
    fn fallback_verse_label_uses_record_not_sample() {
        let settings = ClockSettings::default();
        let display = project(&sample(17, 42), Some(&verse("Genesis", 1, 1)), &settings);
        assert_eq!(display.chapter_verse_label, "1:01");
    }

    #[test]
    fn blank_book_uses_fallback_title() {
        let settings = ClockSettings::default();
        for book in ["", "   ", "\t\n"] {
            let display = project(&sample(3, 16), Some(&verse(book, 3, 16)), &settings);
            assert_eq!(display.title, DEFAULT_FALLBACK_TITLE);
        }
    }

    #[test]
    fn missing_verse_uses_sampled_time() {
        let settings = ClockSettings::default();
        let display = project(&sample(9, 30), None, &settings);
        assert_eq!(display.title, DEFAULT_FALLBACK_TITLE);
        assert_eq!(display.chapter_verse_label, "9:30");
        assert_eq!(display.body_text, DEFAULT_NO_VERSE_TEXT);

        let display = project(&sample(0, 7), None, &settings);
        assert_eq!(display.chapter_verse_label, "12:07");
    }

    #[test]
    fn configured_text_is_used() {
        let settings = ClockSettings {
            fallback_title: "Selah".to_owned(),
            no_verse_text: "Add verses.".to_owned(),
            ..ClockSettings::default()
        };
        let display = project(&sample(9, 30), None, &settings);
        assert_eq!(display.title, "Selah");
        assert_eq!(display.body_text, "Add verses.");
    }
}
