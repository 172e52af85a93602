//! Batch/streaming execution-parity oracle.
//!
//! Feeds one deterministic bar sequence to an engine's batch entry point and
//! to its streaming adapter, then checks both runs produced the same number
//! of turning points, signals and trades, and agree on whether a position is
//! left open.

pub mod oracle;
pub mod report;

pub use oracle::{generate_bars, run_with_config, BarSource, Corruption, ParityOracle};
pub use report::{compare, ParityReport};
