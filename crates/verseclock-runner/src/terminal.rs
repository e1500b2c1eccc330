//! Terminal output sink.
//!
//! Keeps the last value of every field on the clock face and redraws the
//! whole face whenever one of them changes, except the time, which only
//! takes effect on the next redraw (a tick always renders right after it
//! updates the time).

use std::io::{self, IsTerminal, Write};

use tracing::warn;
use verseclock_core::display::DisplaySink;
use verseclock_types::DisplayState;

/// ANSI: clear screen and move the cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draws the clock face to a writer.
#[derive(Debug)]
pub struct TerminalSink<W> {
    out: W,
    ansi: bool,
    loading: bool,
    error: Option<String>,
    time: String,
    face: Option<DisplayState>,
    write_failed: bool,
}

impl TerminalSink<io::Stdout> {
    /// Draw to stdout, clearing the screen between frames when stdout is a
    /// terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let ansi = out.is_terminal();
        Self::new(out, ansi)
    }
}

impl<W: Write> TerminalSink<W> {
    /// Draw to `out`. With `ansi` off, frames are separated by a blank line
    /// instead of clearing the screen.
    pub const fn new(out: W, ansi: bool) -> Self {
        Self {
            out,
            ansi,
            loading: false,
            error: None,
            time: String::new(),
            face: None,
            write_failed: false,
        }
    }

    /// The underlying writer.
    #[cfg(test)]
    pub const fn writer(&self) -> &W {
        &self.out
    }

    fn redraw(&mut self) {
        let frame = self.frame();
        let result = self
            .out
            .write_all(frame.as_bytes())
            .and_then(|()| self.out.flush());
        match result {
            Ok(()) => self.write_failed = false,
            Err(e) => {
                if !self.write_failed {
                    warn!(error = %e, "failed to draw clock face");
                }
                self.write_failed = true;
            }
        }
    }

    fn frame(&self) -> String {
        let mut frame = String::new();
        if self.ansi {
            frame.push_str(CLEAR_SCREEN);
        }

        if self.loading {
            frame.push_str("  Loading verses...\n");
        }
        if let Some(message) = &self.error {
            frame.push_str("  ! ");
            frame.push_str(message);
            frame.push('\n');
        }
        if let Some(face) = &self.face {
            frame.push_str(&format!(
                "\n  {}\n\n  {}    {}\n\n  {}\n",
                face.title, face.chapter_verse_label, self.time, face.body_text
            ));
        }

        if !self.ansi {
            frame.push('\n');
        }
        frame
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn show_loading(&mut self, visible: bool) {
        self.loading = visible;
        self.redraw();
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_owned());
        self.redraw();
    }

    fn hide_error(&mut self) {
        if self.error.take().is_some() {
            self.redraw();
        }
    }

    fn show_time(&mut self, time: &str) {
        time.clone_into(&mut self.time);
    }

    fn render(&mut self, display: &DisplayState) {
        self.face = Some(display.clone());
        self.redraw();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn face() -> DisplayState {
        DisplayState {
            title: "John".to_owned(),
            chapter_verse_label: "3:16".to_owned(),
            body_text: "For God so loved the world".to_owned(),
        }
    }

    fn output(sink: &TerminalSink<Vec<u8>>) -> String {
        String::from_utf8(sink.writer().clone()).unwrap()
    }

    #[test]
    fn render_draws_title_label_time_and_body() {
        let mut sink = TerminalSink::new(Vec::new(), false);
        sink.show_time("3:16:05 PM");
        sink.render(&face());

        let out = output(&sink);
        assert!(out.contains("John"));
        assert!(out.contains("3:16    3:16:05 PM"));
        assert!(out.contains("For God so loved the world"));
        assert!(!out.contains(CLEAR_SCREEN));
    }

    #[test]
    fn ansi_frames_clear_the_screen() {
        let mut sink = TerminalSink::new(Vec::new(), true);
        sink.render(&face());
        assert!(output(&sink).starts_with(CLEAR_SCREEN));
    }

    #[test]
    fn show_time_alone_does_not_redraw() {
        let mut sink = TerminalSink::new(Vec::new(), false);
        sink.show_time("1:00:00 AM");
        assert!(output(&sink).is_empty());
    }

    #[test]
    fn error_is_shown_until_hidden() {
        let mut sink = TerminalSink::new(Vec::new(), true);
        sink.show_error("Failed to load biblical verses");
        assert!(output(&sink).contains("! Failed to load biblical verses"));

        sink.hide_error();
        sink.render(&face());
        let out = output(&sink);
        let last_frame = out.rsplit(CLEAR_SCREEN).next().unwrap();
        assert!(!last_frame.contains("Failed to load"));
    }

    #[test]
    fn hide_error_without_error_is_silent() {
        let mut sink = TerminalSink::new(Vec::new(), false);
        sink.hide_error();
        assert!(output(&sink).is_empty());
    }

    #[test]
    fn loading_indicator_toggles() {
        let mut sink = TerminalSink::new(Vec::new(), true);
        sink.show_loading(true);
        assert!(output(&sink).contains("Loading verses"));

        sink.show_loading(false);
        let out = output(&sink);
        let last_frame = out.rsplit(CLEAR_SCREEN).next().unwrap();
        assert!(!last_frame.contains("Loading verses"));
    }
}
