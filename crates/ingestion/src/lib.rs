//! Data ingestion for the tickbar workspace.
//!
//! This crate handles:
//! - Wall-clock aligned bar aggregation from bid/ask quotes
//! - Deterministic synthetic bars and ticks

pub mod aggregator;
pub mod synthetic;

pub use aggregator::{bucket_start, BarAggregator};
pub use synthetic::{synthetic_bars, SyntheticFeed};
