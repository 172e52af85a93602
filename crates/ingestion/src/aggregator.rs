//! Wall-clock aligned bar aggregation from quotes.
//!
//! Buckets start on multiples of the bucket width counted from local midnight,
//! so two aggregators with the same width agree on every boundary no matter
//! when their first tick arrived.

use chrono::{Duration, NaiveTime, Timelike};
use std::num::NonZeroU32;
use tickbar_core::config::AggregatorConfig;
use tickbar_core::{Bar, Quote, Timeframe, Timestamp};
use tracing::{debug, trace};

/// Start of the bucket containing `ts`: whole seconds since midnight,
/// truncated down to a multiple of `width_secs`.
pub fn bucket_start(ts: Timestamp, width_secs: NonZeroU32) -> Timestamp {
    let midnight = ts.date().and_time(NaiveTime::MIN);
    let secs = ts.num_seconds_from_midnight();
    let aligned = secs - secs % width_secs.get();
    midnight + Duration::seconds(i64::from(aligned))
}

/// Folds mid prices into fixed-width OHLC bars.
///
/// Single owner, no interior locking. Completed bars queue up until the
/// consumer calls [`BarAggregator::drain_completed`].
#[derive(Debug, Clone)]
pub struct BarAggregator {
    bucket_secs: NonZeroU32,
    name: String,
    /// Bar for the bucket currently receiving ticks.
    current: Option<Bar>,
    /// Closed bars not yet drained.
    completed: Vec<Bar>,
}

impl BarAggregator {
    /// Create an aggregator for a canonical timeframe.
    pub fn new(timeframe: Timeframe) -> Self {
        let bucket_secs = NonZeroU32::new(timeframe.seconds()).unwrap_or(NonZeroU32::MIN);
        Self::with_bucket_seconds(bucket_secs, Some(timeframe.canonical_name().to_string()))
    }

    /// Create an aggregator from a free-text timeframe (unknown means 30s).
    pub fn from_timeframe_str(timeframe: Option<&str>) -> Self {
        Self::new(Timeframe::normalize(timeframe))
    }

    /// Create an aggregator from the `aggregator` config section. The
    /// configured name, if any, replaces the canonical timeframe name.
    pub fn from_config(config: &AggregatorConfig) -> Self {
        let mut aggregator = Self::from_timeframe_str(config.timeframe.as_deref());
        if let Some(name) = &config.name {
            aggregator.name = name.clone();
        }
        aggregator
    }

    /// Create an aggregator with an arbitrary bucket width.
    pub fn with_bucket_seconds(bucket_secs: NonZeroU32, name: Option<String>) -> Self {
        Self {
            bucket_secs,
            name: name.unwrap_or_else(|| format!("{}s", bucket_secs)),
            current: None,
            completed: Vec::new(),
        }
    }

    /// Fold one observation. A missing side makes this a no-op.
    pub fn add_tick(&mut self, ts: Timestamp, bid: Option<f64>, ask: Option<f64>) {
        let Some(mid) = (Quote { ts, bid, ask }).mid() else {
            trace!(aggregator = %self.name, %ts, "skipping one-sided quote");
            return;
        };
        let start = bucket_start(ts, self.bucket_secs);

        if self.current.as_ref().is_some_and(|bar| ts >= bar.end) {
            if let Some(bar) = self.current.take() {
                if start > bar.end {
                    // Skipped buckets are not materialised.
                    debug!(
                        aggregator = %self.name,
                        closed_end = %bar.end,
                        next_start = %start,
                        "bucket gap"
                    );
                }
                self.close(bar);
            }
        }

        match self.current.as_mut() {
            Some(bar) => {
                if ts < bar.start {
                    debug!(
                        aggregator = %self.name,
                        %ts,
                        bar_start = %bar.start,
                        "late tick folded into open bar"
                    );
                }
                bar.update(mid);
            }
            None => {
                self.current = Some(Bar::flat(start, self.bucket_secs.get(), mid));
            }
        }
    }

    /// Fold a [`Quote`].
    pub fn add_quote(&mut self, quote: &Quote) {
        self.add_tick(quote.ts, quote.bid, quote.ask);
    }

    /// Take every completed bar, leaving the queue empty.
    pub fn drain_completed(&mut self) -> Vec<Bar> {
        std::mem::take(&mut self.completed)
    }

    /// Force-close the open bar (if any) and drain. Call once at end of stream.
    pub fn finalize(&mut self) -> Vec<Bar> {
        if let Some(bar) = self.current.take() {
            self.close(bar);
        }
        self.drain_completed()
    }

    fn close(&mut self, bar: Bar) {
        debug_assert!(bar.is_sane(), "{bar:?}");
        debug!(
            aggregator = %self.name,
            start = %bar.start,
            open = bar.open,
            high = bar.high,
            low = bar.low,
            close = bar.close,
            "bar closed"
        );
        self.completed.push(bar);
    }

    /// The bar still receiving ticks.
    pub fn current(&self) -> Option<&Bar> {
        self.current.as_ref()
    }

    /// Completed bars waiting to be drained.
    pub fn pending_completed(&self) -> &[Bar] {
        &self.completed
    }

    pub(crate) fn bucket_width(&self) -> NonZeroU32 {
        self.bucket_secs
    }

    /// Bucket width in seconds.
    pub fn bucket_seconds(&self) -> u32 {
        self.bucket_secs.get()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for BarAggregator {
    fn default() -> Self {
        Self::new(Timeframe::DEFAULT)
    }
}
