//! Reference swing engine.
//!
//! Implements both entry points of the engine adapter contract:
//! [`SwingEngine::run`] finds every pivot over the whole slice up front and
//! then walks the bars once, while [`SwingStream`] keeps a rolling `2k + 1`
//! window and evaluates its centre bar on every close. Both feed the same
//! [`SwingState`], so on identical bar sequences they must agree.

use crate::pivots::{centre_pivots, find_pivots, PivotKind, TurningPoint};
use crate::position::{ClosedTrade, ExitReason, Position, PositionTracker};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tickbar_core::config::EngineConfig;
use tickbar_core::{
    Bar, BatchEngine, Engine, EngineOutputs, PositionSide, StreamingAdapter, Timestamp,
};
use tracing::{debug, warn};

/// Entry signal emitted when a pivot is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Close time of the confirming bar.
    pub ts: Timestamp,
    pub side: PositionSide,
    /// Confirming bar close.
    pub price: f64,
    pub stop_price: f64,
}

/// Artifacts of one engine run.
pub type SwingOutputs = EngineOutputs<TurningPoint, Signal, ClosedTrade, Position>;

/// Signal and position state shared by both entry points.
#[derive(Debug, Clone)]
struct SwingState {
    config: EngineConfig,
    turning_points: Vec<TurningPoint>,
    signals: Vec<Signal>,
    tracker: PositionTracker,
}

impl SwingState {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            turning_points: Vec::new(),
            signals: Vec::new(),
            tracker: PositionTracker::new(),
        }
    }

    /// Stop check for a freshly closed bar. Runs before any signal on that bar.
    fn check_stop(&mut self, bar: &Bar) {
        let stop = match &self.tracker.position {
            Some(p) if p.is_stopped(bar.low, bar.high) => p.stop_price,
            _ => return,
        };
        if let Some(trade) = self.tracker.close_position(bar.end, stop, ExitReason::StopLoss) {
            debug!(exit_ts = %trade.exit_ts, pnl = trade.pnl, "stopped out");
        }
    }

    /// Record a pivot confirmed on `confirm_bar` and act on it.
    fn on_pivot(&mut self, pivot: TurningPoint, confirm_bar: &Bar) {
        self.turning_points.push(pivot);

        let (side, stop_price) = match pivot.kind {
            PivotKind::Low => (PositionSide::Long, pivot.price - self.config.stop_buffer),
            PivotKind::High => (PositionSide::Short, pivot.price + self.config.stop_buffer),
        };
        if self.signals.last().is_some_and(|s| s.side == side) {
            return;
        }

        let signal = Signal {
            ts: confirm_bar.end,
            side,
            price: confirm_bar.close,
            stop_price,
        };
        debug!(ts = %signal.ts, side = ?side, price = signal.price, "signal");

        if self.tracker.side() == Some(side.opposite()) {
            self.tracker
                .close_position(signal.ts, signal.price, ExitReason::SignalFlip);
        }
        if !self.tracker.has_position() {
            self.tracker.open_position(
                signal.ts,
                side,
                signal.price,
                self.config.position_size,
                stop_price,
            );
        }
        self.signals.push(signal);
    }

    fn outputs(&self) -> SwingOutputs {
        EngineOutputs {
            turning_points: self.turning_points.clone(),
            signals: self.signals.clone(),
            trade_log: Some(self.tracker.trades.clone()),
            final_position: self.tracker.position.clone(),
        }
    }
}

/// Swing-pivot engine.
#[derive(Debug, Clone)]
pub struct SwingEngine {
    config: EngineConfig,
    state: SwingState,
}

impl SwingEngine {
    pub fn new(config: EngineConfig) -> Self {
        let state = SwingState::new(config.clone());
        Self { config, state }
    }

    fn lookback(&self) -> usize {
        self.config.swing_lookback.max(1)
    }
}

impl Default for SwingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl BatchEngine for SwingEngine {
    type Output = SwingOutputs;

    fn run(&mut self, bars: &[Bar]) -> SwingOutputs {
        self.state = SwingState::new(self.config.clone());
        let k = self.lookback();
        let pivots = find_pivots(bars, k);
        let mut pending = pivots.into_iter().peekable();

        for (t, bar) in bars.iter().enumerate() {
            self.state.check_stop(bar);
            while let Some(pivot) = pending.next_if(|p| p.index + k == t) {
                self.state.on_pivot(pivot, bar);
            }
        }
        self.state.outputs()
    }
}

impl Engine for SwingEngine {
    type Adapter = SwingStream;

    fn into_streaming(self) -> SwingStream {
        SwingStream::new(self)
    }
}

/// Streaming adapter around a [`SwingEngine`].
#[derive(Debug, Clone)]
pub struct SwingStream {
    engine: SwingEngine,
    window: VecDeque<Bar>,
    bars_seen: usize,
    last_start: Option<Timestamp>,
}

impl SwingStream {
    pub fn new(engine: SwingEngine) -> Self {
        let capacity = 2 * engine.lookback() + 1;
        Self {
            engine,
            window: VecDeque::with_capacity(capacity),
            bars_seen: 0,
            last_start: None,
        }
    }

    /// Bars accepted so far.
    pub fn bars_seen(&self) -> usize {
        self.bars_seen
    }
}

impl StreamingAdapter for SwingStream {
    type Output = SwingOutputs;

    fn on_bar_close(&mut self, bar: &Bar, timestamp: Timestamp) {
        if self.last_start.is_some_and(|last| bar.start <= last) {
            warn!(bar_start = %bar.start, %timestamp, "rejecting stale or out-of-order bar");
            return;
        }
        self.last_start = Some(bar.start);

        let k = self.engine.lookback();
        let t = self.bars_seen;
        self.bars_seen += 1;

        self.window.push_back(*bar);
        if self.window.len() > 2 * k + 1 {
            self.window.pop_front();
        }

        self.engine.state.check_stop(bar);
        if self.window.len() == 2 * k + 1 {
            let pivots = centre_pivots(self.window.make_contiguous(), t - k);
            for pivot in pivots {
                self.engine.state.on_pivot(pivot, bar);
            }
        }
    }

    fn outputs(&self) -> SwingOutputs {
        self.engine.state.outputs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::num::NonZeroU32;
    use tickbar_core::RunArtifacts;
    use tickbar_ingestion::synthetic_bars;

    fn bars(n: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        synthetic_bars(n, start, NonZeroU32::new(30).unwrap())
    }

    fn stream(bars: &[Bar]) -> SwingOutputs {
        let mut adapter = SwingEngine::default().into_streaming();
        for bar in bars {
            adapter.on_bar_close(bar, bar.end);
        }
        adapter.outputs()
    }

    #[test]
    fn test_batch_finds_pivots_and_trades() {
        let out = SwingEngine::default().run(&bars(60));
        let summary = out.summary();
        assert!(summary.turning_points > 0);
        assert!(summary.signals > 0);
        assert!(summary.signals <= summary.turning_points);
        // Signals alternate sides.
        for pair in out.signals.windows(2) {
            assert_ne!(pair[0].side, pair[1].side);
        }
    }

    #[test]
    fn test_batch_and_stream_agree() {
        let bars = bars(60);
        let batch = SwingEngine::default().run(&bars);
        let streamed = stream(&bars);
        assert_eq!(batch, streamed);
    }

    #[test]
    fn test_batch_rerun_resets_state() {
        let bars = bars(60);
        let mut engine = SwingEngine::default();
        let first = engine.run(&bars);
        let second = engine.run(&bars);
        assert_eq!(first, second);
    }

    #[test]
    fn test_stream_rejects_out_of_order_bars() {
        let mut reversed = bars(60);
        reversed.reverse();
        let mut adapter = SwingEngine::default().into_streaming();
        for bar in &reversed {
            adapter.on_bar_close(bar, bar.end);
        }
        assert_eq!(adapter.bars_seen(), 1);
        assert!(adapter.outputs().turning_points.is_empty());
    }

    #[test]
    fn test_short_input_produces_nothing() {
        let out = SwingEngine::default().run(&bars(3));
        assert!(out.turning_points.is_empty());
        assert!(out.final_position.is_none());
        assert_eq!(out.trade_log.as_deref().map(<[ClosedTrade]>::len), Some(0));
    }
}
