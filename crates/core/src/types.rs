//! Core data types for the tickbar workspace.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Wall-clock instant, interpreted as local time.
pub type Timestamp = NaiveDateTime;

/// A top-of-book observation. Either side may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Observation time.
    pub ts: Timestamp,
    /// Best bid price.
    pub bid: Option<f64>,
    /// Best ask price.
    pub ask: Option<f64>,
}

impl Quote {
    /// Create a two-sided quote.
    pub fn new(ts: Timestamp, bid: f64, ask: f64) -> Self {
        Self {
            ts,
            bid: Some(bid),
            ask: Some(ask),
        }
    }

    /// Mid price, or `None` when either side is missing.
    #[inline]
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }
}

/// Fixed-width OHLC bar aligned to a wall-clock bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bucket start (inclusive).
    pub start: Timestamp,
    /// Bucket end (exclusive), `start + width`.
    pub end: Timestamp,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
}

impl Bar {
    /// Open a bar on a single price.
    pub fn flat(start: Timestamp, width_secs: u32, price: f64) -> Self {
        Self {
            start,
            end: start + Duration::seconds(i64::from(width_secs)),
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    /// Fold a price into the bar.
    #[inline]
    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    /// OHLC sanity: low bounds every price from below, high from above.
    pub fn is_sane(&self) -> bool {
        self.low <= self.open
            && self.low <= self.close
            && self.low <= self.high
            && self.high >= self.open
            && self.high >= self.close
    }
}

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Get sign: +1 for long, -1 for short.
    pub fn sign(self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
        }
    }

    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }
}
