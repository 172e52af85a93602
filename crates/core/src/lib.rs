//! Core types and configuration for the tickbar workspace.
//!
//! This crate provides shared types used across all other crates:
//! - Market data types (quotes, bars)
//! - The timeframe registry
//! - The engine adapter contract
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod engine;
pub mod error;
pub mod timeframe;
pub mod types;

pub use config::Config;
pub use engine::{BatchEngine, Engine, EngineOutputs, RunArtifacts, RunSummary, StreamingAdapter};
pub use error::{Error, Result};
pub use timeframe::Timeframe;
pub use types::*;
