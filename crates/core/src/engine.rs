//! Engine adapter contract.
//!
//! A trading engine exposes two entry points over the same logic: a batch
//! run over an ordered bar slice and a streaming adapter fed one closed bar at
//! a time. The parity oracle only looks at the shape of what comes back, via
//! [`RunSummary`].

use crate::types::{Bar, Timestamp};
use serde::{Deserialize, Serialize};

/// Counts and presence flags the parity oracle compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub turning_points: usize,
    pub signals: usize,
    /// Trade log length; an absent log counts as zero.
    pub trades: usize,
    pub has_final_position: bool,
}

/// Anything that can be reduced to a [`RunSummary`].
pub trait RunArtifacts {
    fn summary(&self) -> RunSummary;
}

/// The four artifacts an engine run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutputs<T, S, Tr, P> {
    pub turning_points: Vec<T>,
    pub signals: Vec<S>,
    pub trade_log: Option<Vec<Tr>>,
    pub final_position: Option<P>,
}

impl<T, S, Tr, P> Default for EngineOutputs<T, S, Tr, P> {
    fn default() -> Self {
        Self {
            turning_points: Vec::new(),
            signals: Vec::new(),
            trade_log: None,
            final_position: None,
        }
    }
}

impl<T, S, Tr, P> RunArtifacts for EngineOutputs<T, S, Tr, P> {
    fn summary(&self) -> RunSummary {
        RunSummary {
            turning_points: self.turning_points.len(),
            signals: self.signals.len(),
            trades: self.trade_log.as_ref().map_or(0, Vec::len),
            has_final_position: self.final_position.is_some(),
        }
    }
}

/// Offline entry point: consume the whole ordered collection at once.
pub trait BatchEngine {
    type Output: RunArtifacts;

    fn run(&mut self, bars: &[Bar]) -> Self::Output;
}

/// Live entry point: one call per closed bar, artifacts readable afterwards.
pub trait StreamingAdapter {
    type Output: RunArtifacts;

    fn on_bar_close(&mut self, bar: &Bar, timestamp: Timestamp);

    fn outputs(&self) -> Self::Output;
}

/// An engine that offers both entry points.
///
/// `into_streaming` consumes the engine so the adapter owns its own instance;
/// one engine value never serves both runs.
pub trait Engine: BatchEngine {
    type Adapter: StreamingAdapter;

    fn into_streaming(self) -> Self::Adapter;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_trade_log_counts_as_zero() {
        let outputs: EngineOutputs<u8, u8, u8, u8> = EngineOutputs {
            turning_points: vec![1, 2],
            signals: vec![1],
            trade_log: None,
            final_position: Some(0),
        };
        let summary = outputs.summary();
        assert_eq!(summary.turning_points, 2);
        assert_eq!(summary.signals, 1);
        assert_eq!(summary.trades, 0);
        assert!(summary.has_final_position);
    }

    #[test]
    fn test_default_outputs_are_empty() {
        let outputs: EngineOutputs<(), (), (), ()> = EngineOutputs::default();
        assert_eq!(outputs.summary(), RunSummary::default());
    }
}
