//! Position tracking for the reference engine.
//!
//! One position at a time, full-size entries and exits, P&L in price units
//! times size.

use serde::{Deserialize, Serialize};
use tickbar_core::{PositionSide, Timestamp};

/// An open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Entry timestamp.
    pub entry_ts: Timestamp,
    /// Position side.
    pub side: PositionSide,
    /// Entry price.
    pub entry_price: f64,
    /// Size.
    pub size: f64,
    /// Protective stop.
    pub stop_price: f64,
}

impl Position {
    /// Unrealized P&L at `price`.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        (price - self.entry_price) * self.side.sign() * self.size
    }

    /// Whether a bar spanning `low..=high` touches the stop.
    pub fn is_stopped(&self, low: f64, high: f64) -> bool {
        match self.side {
            PositionSide::Long => low <= self.stop_price,
            PositionSide::Short => high >= self.stop_price,
        }
    }
}

/// Reason for exiting a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Stop loss hit.
    StopLoss,
    /// Opposite signal.
    SignalFlip,
}

/// Closed trade record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_ts: Timestamp,
    pub exit_ts: Timestamp,
    pub side: PositionSide,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    /// Realized P&L.
    pub pnl: f64,
    pub exit_reason: ExitReason,
}

/// Position tracker.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    /// Current open position.
    pub position: Option<Position>,
    /// Closed trades, in exit order.
    pub trades: Vec<ClosedTrade>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Side of the open position, if any.
    pub fn side(&self) -> Option<PositionSide> {
        self.position.as_ref().map(|p| p.side)
    }

    /// Open a position. Any existing position is replaced, so close it first.
    pub fn open_position(
        &mut self,
        ts: Timestamp,
        side: PositionSide,
        price: f64,
        size: f64,
        stop_price: f64,
    ) {
        self.position = Some(Position {
            entry_ts: ts,
            side,
            entry_price: price,
            size,
            stop_price,
        });
    }

    /// Close the open position at `exit_price`.
    pub fn close_position(
        &mut self,
        ts: Timestamp,
        exit_price: f64,
        reason: ExitReason,
    ) -> Option<ClosedTrade> {
        let position = self.position.take()?;
        let pnl = position.unrealized_pnl(exit_price);

        let trade = ClosedTrade {
            entry_ts: position.entry_ts,
            exit_ts: ts,
            side: position.side,
            entry_price: position.entry_price,
            exit_price,
            size: position.size,
            pnl,
            exit_reason: reason,
        };

        self.trades.push(trade.clone());
        Some(trade)
    }
}
