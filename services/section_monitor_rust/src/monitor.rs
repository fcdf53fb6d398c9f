//! Change detection over section snapshots.
//!
//! One `Monitor` per watched course. Each cycle fetches a fresh snapshot
//! through the [`SectionSource`] collaborator, compares it to the previous
//! cycle's state, and delivers any resulting messages through the
//! [`Notifier`] collaborator. State lives on the `Monitor` value; nothing
//! is global and nothing is persisted.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::time::Duration;
use tokio::sync::watch;

use seatwatch_core::{ExtractError, SectionRecord};

use crate::formatters;

#[async_trait]
pub trait SectionSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SectionRecord>>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

/// Previous-cycle state. Mutated once per successful cycle.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    /// Section count from the last successful cycle; `None` until the
    /// first snapshot lands.
    pub previous_count: Option<usize>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

/// Per-process counters, logged periodically.
#[derive(Debug, Default)]
pub struct CycleStats {
    pub cycles: u64,
    pub fetch_errors: u64,
    pub parse_errors: u64,
    pub sent: u64,
    pub send_errors: u64,
}

pub struct Monitor {
    course_title: String,
    state: MonitorState,
    stats: CycleStats,
    /// Whether the last successful cycle had any open seats. Drives the
    /// edge-triggered "no seats" message.
    last_cycle_had_open: Option<bool>,
}

impl Monitor {
    pub fn new(course_title: String) -> Self {
        Self {
            course_title,
            state: MonitorState::default(),
            stats: CycleStats::default(),
            last_cycle_had_open: None,
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// One cycle's worth of decisions. Returns the messages to deliver.
    ///
    /// An error cycle yields at most an extraction-error report and never
    /// touches `previous_count`. A successful cycle produces:
    /// - "monitoring N sections" on the first snapshot
    /// - "N new sections added" when the count grows
    /// - one message per section with open seats, every cycle they stay open
    /// - "no seats" on the transition into zero aggregate open seats
    pub fn evaluate(&mut self, fetched: Result<Vec<SectionRecord>>) -> Vec<String> {
        self.stats.cycles += 1;

        let records = match fetched {
            Ok(records) => records,
            Err(e) => {
                return if let Some(extract_err) = e.downcast_ref::<ExtractError>() {
                    self.stats.parse_errors += 1;
                    warn!("{}: extraction failed: {extract_err}", self.course_title);
                    vec![formatters::format_extract_error(
                        &self.course_title,
                        &extract_err.to_string(),
                    )]
                } else {
                    self.stats.fetch_errors += 1;
                    warn!("{}: fetch failed: {e:#}", self.course_title);
                    Vec::new()
                };
            }
        };

        let mut messages = Vec::new();
        let count = records.len();

        match self.state.previous_count {
            None => {
                messages.push(formatters::format_monitoring_started(
                    &self.course_title,
                    count,
                ));
            }
            Some(prev) if count > prev => {
                messages.push(formatters::format_new_sections(
                    &self.course_title,
                    count - prev,
                ));
            }
            Some(_) => {}
        }
        self.state.previous_count = Some(count);
        self.state.last_checked_at = Some(Utc::now());

        // Only zero/non-zero matters here, so saturate instead of risking
        // an overflow panic on a garbage page.
        let mut open_total: u32 = 0;
        for record in &records {
            open_total = open_total.saturating_add(record.open_seats);
            if record.has_open_seats() {
                messages.push(formatters::format_open_seats(&self.course_title, record));
            }
        }

        if open_total == 0 && self.last_cycle_had_open.unwrap_or(true) {
            messages.push(formatters::format_no_seats(&self.course_title, Utc::now()));
        }
        self.last_cycle_had_open = Some(open_total > 0);

        messages
    }

    /// Drive the fetch-evaluate-notify-sleep loop until `shutdown` flips.
    ///
    /// One fetch in flight at a time; the shutdown flag is checked at the
    /// top of every cycle and the sleep is raced against it so stopping
    /// never waits out a full interval.
    pub async fn run<S, N>(
        &mut self,
        source: &S,
        notifier: &N,
        check_interval: Duration,
        stats_log_every: u64,
        shutdown: &mut watch::Receiver<bool>,
    ) where
        S: SectionSource,
        N: Notifier,
    {
        info!(
            "Monitoring '{}' every {}s",
            self.course_title,
            check_interval.as_secs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let fetched = source.fetch().await;
            let messages = self.evaluate(fetched);

            for message in &messages {
                match notifier.send(message).await {
                    Ok(()) => self.stats.sent += 1,
                    Err(e) => {
                        self.stats.send_errors += 1;
                        error!("notification send failed: {e:#}");
                    }
                }
            }

            if stats_log_every > 0 && self.stats.cycles % stats_log_every == 0 {
                info!(
                    "monitor stats: cycles={} fetch_errors={} parse_errors={} sent={} send_errors={}",
                    self.stats.cycles,
                    self.stats.fetch_errors,
                    self.stats.parse_errors,
                    self.stats.sent,
                    self.stats.send_errors
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(check_interval) => {}
                _ = shutdown.changed() => {}
            }
        }

        info!("Monitor for '{}' stopped", self.course_title);
    }
}
