//! The clock controller: load, tick, and full refresh.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --load ok--> Running --minute boundary--> Uninitialized --> ...
//!       |
//!       +--load failed--> Failed (terminal, no retry)
//! ```
//!
//! While running, the controller ticks once immediately and then on a fixed
//! interval. Each tick samples the time, resolves a verse, and pushes the
//! result to the sink. At the next minute boundary a one-shot refresh drops
//! the store and both timers, reloads from the provider, and starts over.
//!
//! Both timers are owned by the controller and polled from a single loop in
//! [`ClockController::run`], so ticks never overlap and a refresh that comes
//! due at the same instant as a tick wins.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, error, info, warn};
use verseclock_types::DisplayState;

use crate::clock::{self, TimeSource};
use crate::config::ClockSettings;
use crate::display::{self, DisplaySink, LOAD_FAILURE_MESSAGE};
use crate::error::LoadError;
use crate::store::{VerseProvider, VerseStore};

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No verses loaded yet, or a refresh is reloading them.
    Uninitialized,
    /// Verses loaded; ticks update the display.
    Running,
    /// The last load failed. Ticks are ignored.
    Failed,
}

/// Counters reported when [`ClockController::run`] shuts down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks that reached the sink.
    pub ticks: u64,
    /// Full refreshes performed.
    pub refreshes: u64,
}

/// Timer handles for one running period. Dropping it cancels both.
#[derive(Debug)]
struct Schedule {
    ticker: Interval,
    refresh: Option<Pin<Box<Sleep>>>,
}

/// Drives the read-resolve-display loop.
#[derive(Debug)]
pub struct ClockController<P, T, S> {
    provider: P,
    time_source: T,
    sink: S,
    settings: ClockSettings,
    state: ControllerState,
    store: Option<VerseStore>,
    schedule: Option<Schedule>,
    ticks: u64,
    refreshes: u64,
}

impl<P, T, S> ClockController<P, T, S>
where
    P: VerseProvider,
    T: TimeSource,
    S: DisplaySink,
{
    /// Create an uninitialized controller. Nothing is loaded until
    /// [`initialize`](Self::initialize) or [`run`](Self::run).
    pub const fn new(provider: P, time_source: T, sink: S, settings: ClockSettings) -> Self {
        Self {
            provider,
            time_source,
            sink,
            settings,
            state: ControllerState::Uninitialized,
            store: None,
            schedule: None,
            ticks: 0,
            refreshes: 0,
        }
    }

    /// Load the verse store, moving to [`ControllerState::Running`] or
    /// [`ControllerState::Failed`].
    ///
    /// Any previous store and timers are dropped first. The sink's loading
    /// indicator is shown for the duration of the load. On failure the sink
    /// is shown [`LOAD_FAILURE_MESSAGE`].
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] that stopped the load.
    pub async fn initialize(&mut self) -> Result<(), LoadError> {
        self.schedule = None;
        self.store = None;
        self.state = ControllerState::Uninitialized;

        self.sink.show_loading(true);
        let result = VerseStore::load(&self.provider).await;
        self.sink.show_loading(false);

        match result {
            Ok(store) => {
                info!(verse_count = store.len(), "verse clock running");
                self.store = Some(store);
                self.state = ControllerState::Running;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to initialize verse clock");
                self.state = ControllerState::Failed;
                self.sink.show_error(LOAD_FAILURE_MESSAGE);
                Err(e)
            }
        }
    }

    /// Tick once now, then arm the periodic tick and the full refresh.
    ///
    /// Returns `false` without arming anything unless the controller is
    /// running.
    pub fn start(&mut self) -> bool {
        if self.state != ControllerState::Running {
            warn!(state = ?self.state, "start ignored: controller not running");
            return false;
        }

        self.tick();

        let period = self.settings.tick_interval();
        let first = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
        let mut ticker = tokio::time::interval_at(first, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.schedule = Some(Schedule {
            ticker,
            refresh: None,
        });

        self.schedule_full_refresh();
        true
    }

    /// Sample the time, resolve a verse, and push both to the sink.
    ///
    /// Returns the display that was rendered, or `None` if the controller
    /// is not running.
    pub fn tick(&mut self) -> Option<DisplayState> {
        if self.state != ControllerState::Running {
            debug!(state = ?self.state, "tick skipped");
            return None;
        }
        let store = self.store.as_ref()?;

        let sample = self.time_source.now();
        let resolved = store.resolve_with_tier(sample.hour12, sample.minute);
        let face = display::project(&sample, resolved.map(|(record, _)| record), &self.settings);

        debug!(
            time = %sample,
            tier = ?resolved.map(|(_, tier)| tier),
            label = face.chapter_verse_label,
            "tick"
        );

        self.sink.show_time(&sample.to_string());
        if resolved.is_some() {
            self.sink.hide_error();
        }
        self.sink.render(&face);

        self.ticks = self.ticks.saturating_add(1);
        Some(face)
    }

    /// Arm the one-shot refresh at the next minute boundary.
    ///
    /// Returns the delay, or `None` when full refresh is disabled or no
    /// tick schedule is armed.
    pub fn schedule_full_refresh(&mut self) -> Option<Duration> {
        if !self.settings.full_refresh {
            return None;
        }
        let schedule = self.schedule.as_mut()?;

        let delay = clock::refresh_delay(&self.time_source.now());
        schedule.refresh = Some(Box::pin(tokio::time::sleep(delay)));
        debug!(delay_secs = delay.as_secs(), "full refresh scheduled");
        Some(delay)
    }

    /// Drop everything and start over: reload verses, tick, re-arm timers.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] if the reload fails. The controller is then
    /// [`ControllerState::Failed`] and nothing is re-armed.
    pub async fn reinitialize(&mut self) -> Result<(), LoadError> {
        self.refreshes = self.refreshes.saturating_add(1);
        info!(refresh = self.refreshes, "full refresh");

        self.initialize().await?;
        self.start();
        Ok(())
    }

    /// Load, start, and keep ticking until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] from the initial load or from any full
    /// refresh. Ticking stops at that point.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<RunSummary, LoadError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.initialize().await?;
        self.start();

        loop {
            let Some(schedule) = self.schedule.as_mut() else {
                return Ok(self.summary());
            };

            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!(ticks = self.ticks, refreshes = self.refreshes, "verse clock stopping");
                    return Ok(self.summary());
                }
                () = refresh_due(&mut schedule.refresh) => {
                    self.reinitialize().await?;
                }
                _ = schedule.ticker.tick() => {
                    self.tick();
                }
            }
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// The loaded store, if running.
    pub const fn store(&self) -> Option<&VerseStore> {
        self.store.as_ref()
    }

    /// The output sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The verse provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The time source.
    pub const fn time_source(&self) -> &T {
        &self.time_source
    }

    /// Tick and refresh counters so far.
    pub const fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            refreshes: self.refreshes,
        }
    }
}

/// Resolves when the armed refresh fires; never resolves if none is armed.
async fn refresh_due(refresh: &mut Option<Pin<Box<Sleep>>>) {
    match refresh {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending::<()>().await,
    }
}
