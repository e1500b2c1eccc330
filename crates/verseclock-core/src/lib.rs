//! Verse store, clock controller, and configuration for the Verse Clock.
//!
//! The clock face shows a Bible verse picked by the current hour and
//! minute instead of numerals. This crate owns everything except the
//! concrete data source and the concrete screen:
//!
//! # Modules
//!
//! - [`store`] -- [`VerseStore`] and the three-tier verse lookup, plus the
//!   [`VerseProvider`] seam for fetching raw verse data.
//! - [`clock`] -- [`TimeSource`] seam, wall-clock sampling, and the
//!   minute-boundary refresh deadline.
//! - [`display`] -- Projection of a sample and verse into a
//!   [`DisplayState`], and the [`DisplaySink`] seam.
//! - [`controller`] -- [`ClockController`], the tick and refresh loop.
//! - [`config`] -- Configuration loading from `verseclock-config.yaml`.
//! - [`error`] -- [`LoadError`].
//!
//! [`VerseStore`]: store::VerseStore
//! [`VerseProvider`]: store::VerseProvider
//! [`TimeSource`]: clock::TimeSource
//! [`DisplayState`]: verseclock_types::DisplayState
//! [`DisplaySink`]: display::DisplaySink
//! [`ClockController`]: controller::ClockController
//! [`LoadError`]: error::LoadError

pub mod clock;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod store;
