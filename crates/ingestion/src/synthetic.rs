//! Deterministic synthetic market data.
//!
//! A small sine wave around a base price with a one-bar jump every
//! `jump_every` bars. Same inputs, same output: no RNG, no clock.

use crate::aggregator::{bucket_start, BarAggregator};
use chrono::Duration;
use std::f64::consts::TAU;
use std::num::NonZeroU32;
use tickbar_core::config::SyntheticConfig;
use tickbar_core::{Bar, Quote, Timestamp};

/// Synthetic bar and tick generator.
#[derive(Debug, Clone, Default)]
pub struct SyntheticFeed {
    config: SyntheticConfig,
}

impl SyntheticFeed {
    pub fn new(config: SyntheticConfig) -> Self {
        Self { config }
    }

    /// Close price of bar `i`.
    fn close_at(&self, i: usize) -> f64 {
        let cfg = &self.config;
        let period = cfg.wave_period.max(1) as f64;
        let wave = cfg.wave_amplitude * (TAU * i as f64 / period).sin();
        let jump_every = cfg.jump_every.max(1);
        let jump = if i % jump_every == jump_every - 1 {
            cfg.jump_size
        } else {
            0.0
        };
        cfg.base_price + wave + jump
    }

    /// `n` bars on the bucket grid, the first one in the bucket containing `start`.
    pub fn bars(&self, n: usize, start: Timestamp, width_secs: NonZeroU32) -> Vec<Bar> {
        let first = bucket_start(start, width_secs);
        let width = i64::from(width_secs.get());
        let mut bars = Vec::with_capacity(n);
        let mut open = self.config.base_price;

        for i in 0..n {
            let close = self.close_at(i);
            let bar_start = first + Duration::seconds(width * i as i64);
            bars.push(Bar {
                start: bar_start,
                end: bar_start + Duration::seconds(width),
                open,
                high: open.max(close) + self.config.half_range,
                low: open.min(close) - self.config.half_range,
                close,
            });
            open = close;
        }
        bars
    }

    /// Zero-spread quotes that aggregate back into [`SyntheticFeed::bars`]:
    /// open, high, low, close at 0, 1/4, 1/2 and 3/4 of each bucket.
    ///
    /// Exact reconstruction holds for widths that divide a day, which covers
    /// every canonical timeframe.
    pub fn ticks(&self, n: usize, start: Timestamp, width_secs: NonZeroU32) -> Vec<Quote> {
        let quarter_ms = i64::from(width_secs.get()) * 1000 / 4;
        self.bars(n, start, width_secs)
            .iter()
            .flat_map(|bar| {
                [bar.open, bar.high, bar.low, bar.close]
                    .into_iter()
                    .enumerate()
                    .map(move |(k, price)| {
                        Quote::new(
                            bar.start + Duration::milliseconds(quarter_ms * k as i64),
                            price,
                            price,
                        )
                    })
            })
            .collect()
    }

    /// Run [`SyntheticFeed::ticks`] through a fresh aggregator.
    pub fn aggregated_bars(&self, n: usize, start: Timestamp, width_secs: NonZeroU32) -> Vec<Bar> {
        let mut aggregator = BarAggregator::with_bucket_seconds(width_secs, None);
        self.aggregate_with(&mut aggregator, n, start)
    }

    /// Run [`SyntheticFeed::ticks`] through `aggregator`, at its bucket width.
    pub fn aggregate_with(
        &self,
        aggregator: &mut BarAggregator,
        n: usize,
        start: Timestamp,
    ) -> Vec<Bar> {
        let mut bars = Vec::with_capacity(n);
        for quote in self.ticks(n, start, aggregator.bucket_width()) {
            aggregator.add_quote(&quote);
            bars.extend(aggregator.drain_completed());
        }
        bars.extend(aggregator.finalize());
        bars
    }
}

/// Bars from the default wave shape.
pub fn synthetic_bars(n: usize, start: Timestamp, width_secs: NonZeroU32) -> Vec<Bar> {
    SyntheticFeed::default().bars(n, start, width_secs)
}
