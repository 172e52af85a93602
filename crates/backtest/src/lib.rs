//! Reference trading engine for the tickbar workspace.
//!
//! This crate provides:
//! - Swing pivot detection
//! - Position tracking and P&L
//! - A swing engine with batch and streaming entry points

pub mod engine;
pub mod pivots;
pub mod position;

pub use engine::{Signal, SwingEngine, SwingOutputs, SwingStream};
pub use pivots::{PivotKind, TurningPoint};
pub use position::{ClosedTrade, ExitReason, Position, PositionTracker};
