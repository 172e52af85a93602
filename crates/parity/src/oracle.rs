//! Batch/streaming parity oracle.
//!
//! Runs an engine's batch entry point and its streaming adapter over the same
//! bar sequence, one after the other, each on a freshly constructed engine,
//! and compares the shape of what they produce.

use crate::report::ParityReport;
use std::num::NonZeroU32;
use tickbar_backtest::SwingEngine;
use tickbar_core::{Bar, BatchEngine, Config, Engine, RunArtifacts, StreamingAdapter, Timeframe};
use tickbar_ingestion::{BarAggregator, SyntheticFeed};
use tracing::{debug, info, warn};

/// Where the oracle's bars come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarSource {
    /// Bars straight from the synthetic generator.
    #[default]
    Direct,
    /// Synthetic ticks folded through a `BarAggregator`.
    Aggregated,
}

/// Deliberate damage to the streaming run, for checking the oracle itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Corruption {
    #[default]
    None,
    /// Feed the streaming adapter the bars newest first.
    ReverseStreamingOrder,
}

/// Generate the synthetic bar sequence at the configured timeframe.
///
/// Aggregated bars go through a [`BarAggregator`] built from the
/// `aggregator` section, so it logs under the configured name.
pub fn generate_bars(config: &Config, source: BarSource) -> Vec<Bar> {
    let synthetic = &config.synthetic;
    let feed = SyntheticFeed::new(synthetic.clone());
    match source {
        BarSource::Direct => {
            let width = NonZeroU32::new(config.timeframe().seconds()).unwrap_or(NonZeroU32::MIN);
            feed.bars(synthetic.bars, synthetic.start, width)
        }
        BarSource::Aggregated => {
            let mut aggregator = BarAggregator::from_config(&config.aggregator);
            debug!(aggregator = aggregator.name(), "aggregating synthetic ticks");
            feed.aggregate_with(&mut aggregator, synthetic.bars, synthetic.start)
        }
    }
}

/// Parity oracle.
#[derive(Debug, Clone, Copy)]
pub struct ParityOracle {
    timeframe: Timeframe,
    corruption: Corruption,
}

impl ParityOracle {
    pub fn new(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            corruption: Corruption::None,
        }
    }

    pub fn with_corruption(mut self, corruption: Corruption) -> Self {
        self.corruption = corruption;
        self
    }

    /// Run both entry points over `bars` and compare.
    ///
    /// `factory` is called once per run so batch and streaming never share
    /// engine state.
    pub fn check<E, F>(&self, factory: F, bars: &[Bar]) -> ParityReport
    where
        E: Engine,
        F: Fn() -> E,
    {
        let batch = factory().run(bars).summary();

        let mut adapter = factory().into_streaming();
        match self.corruption {
            Corruption::None => {
                for bar in bars {
                    adapter.on_bar_close(bar, bar.end);
                }
            }
            Corruption::ReverseStreamingOrder => {
                warn!("streaming run fed in reverse order");
                for bar in bars.iter().rev() {
                    adapter.on_bar_close(bar, bar.end);
                }
            }
        }
        let streaming = adapter.outputs().summary();

        let report = ParityReport::new(self.timeframe, bars.len(), batch, streaming);
        if report.passed() {
            info!(timeframe = %self.timeframe, bars = bars.len(), ?batch, "parity holds");
        } else {
            for line in &report.diagnostics {
                warn!(timeframe = %self.timeframe, "{line}");
            }
        }
        report
    }
}

/// Full run with the reference swing engine, driven by `config`.
pub fn run_with_config(config: &Config, source: BarSource, corruption: Corruption) -> ParityReport {
    let timeframe = config.timeframe();
    let bars = generate_bars(config, source);
    info!(timeframe = %timeframe, bars = bars.len(), ?source, "generated synthetic bars");

    let engine_config = config.engine.clone();
    ParityOracle::new(timeframe)
        .with_corruption(corruption)
        .check(|| SwingEngine::new(engine_config.clone()), &bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickbar_core::{EngineOutputs, RunSummary, Timestamp};

    fn config_for(timeframe: Timeframe) -> Config {
        let mut config = Config::default();
        config.aggregator.timeframe = Some(timeframe.canonical_name().to_string());
        config
    }

    type Counts = EngineOutputs<usize, (), (), ()>;

    /// Records every bar in batch; the streaming side drops the first bar.
    struct Lossy {
        seen: Vec<usize>,
    }

    impl BatchEngine for Lossy {
        type Output = Counts;

        fn run(&mut self, bars: &[Bar]) -> Counts {
            EngineOutputs {
                turning_points: (0..bars.len()).collect(),
                ..Default::default()
            }
        }
    }

    impl Engine for Lossy {
        type Adapter = LossyStream;

        fn into_streaming(self) -> LossyStream {
            LossyStream { inner: self, calls: 0 }
        }
    }

    struct LossyStream {
        inner: Lossy,
        calls: usize,
    }

    impl StreamingAdapter for LossyStream {
        type Output = Counts;

        fn on_bar_close(&mut self, _bar: &Bar, _timestamp: Timestamp) {
            if self.calls > 0 {
                self.inner.seen.push(self.calls);
            }
            self.calls += 1;
        }

        fn outputs(&self) -> Counts {
            EngineOutputs {
                turning_points: self.inner.seen.clone(),
                ..Default::default()
            }
        }
    }

    #[test]
    fn test_oracle_flags_divergent_engine() {
        let bars = generate_bars(&config_for(Timeframe::S30), BarSource::Direct);
        let report =
            ParityOracle::new(Timeframe::S30).check(|| Lossy { seen: Vec::new() }, &bars);

        assert!(!report.passed());
        assert_eq!(report.batch.turning_points, 60);
        assert_eq!(report.streaming.turning_points, 59);
        assert_eq!(
            report.diagnostics,
            vec!["turning_points mismatch: batch=60 streaming=59"]
        );
    }

    #[test]
    fn test_factory_called_per_run() {
        use std::cell::Cell;

        let calls = Cell::new(0);
        let bars = generate_bars(&config_for(Timeframe::M1), BarSource::Direct);
        ParityOracle::new(Timeframe::M1).check(
            || {
                calls.set(calls.get() + 1);
                SwingEngine::default()
            },
            &bars,
        );
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_named_aggregator_builds_same_bars() {
        let mut config = config_for(Timeframe::M5);
        config.aggregator.name = Some("eurusd".to_string());
        let aggregated = generate_bars(&config, BarSource::Aggregated);
        assert_eq!(aggregated, generate_bars(&config, BarSource::Direct));
        assert_eq!((aggregated[1].start - aggregated[0].start).num_seconds(), 300);
    }

    #[test]
    fn test_default_config_passes() {
        let report = run_with_config(&Config::default(), BarSource::Direct, Corruption::None);
        assert!(report.passed(), "{report}");
        assert_ne!(report.batch, RunSummary::default());
    }
}
