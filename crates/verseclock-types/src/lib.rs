//! Shared type definitions for the Verse Clock.
//!
//! This crate holds the data shapes that flow between the verse store, the
//! clock controller, and the output sink. It has no behavior beyond
//! formatting and serde.
//!
//! # Modules
//!
//! - [`verse`] -- Verse records and the verse document wire shape
//! - [`time`] -- Twelve-hour clock samples
//! - [`display`] -- The per-tick projection pushed to the output sink

pub mod display;
pub mod time;
pub mod verse;

// Re-export all public types at crate root for convenience.
pub use display::DisplayState;
pub use time::{ClockSample, Meridiem};
pub use verse::{VerseDocument, VerseRecord};
