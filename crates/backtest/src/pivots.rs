//! Swing pivot detection.
//!
//! Bar `i` is a swing high when its high is at least every high in the `k`
//! bars before it and strictly above every high in the `k` bars after it
//! (swing low mirrors on lows). Ties therefore resolve to the later bar.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tickbar_core::{Bar, Timestamp};

/// Which extreme a pivot marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotKind {
    High,
    Low,
}

/// A confirmed swing pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurningPoint {
    /// Position of the pivot bar in the run.
    pub index: usize,
    /// Pivot bar start.
    pub ts: Timestamp,
    pub kind: PivotKind,
    /// The pivot bar's high or low.
    pub price: f64,
}

fn max_of(bars: &[Bar], field: fn(&Bar) -> f64) -> Option<OrderedFloat<f64>> {
    bars.iter().map(|b| OrderedFloat(field(b))).max()
}

fn min_of(bars: &[Bar], field: fn(&Bar) -> f64) -> Option<OrderedFloat<f64>> {
    bars.iter().map(|b| OrderedFloat(field(b))).min()
}

/// Pivots of the centre bar of a `2k + 1` window, high before low.
///
/// `index` is the centre bar's position in the run.
pub fn centre_pivots(window: &[Bar], index: usize) -> Vec<TurningPoint> {
    let k = window.len() / 2;
    let (left, rest) = window.split_at(k);
    let (centre, right) = match rest.split_first() {
        Some(split) => split,
        None => return Vec::new(),
    };

    let mut pivots = Vec::new();
    let high = OrderedFloat(centre.high);
    let is_high = max_of(left, |b| b.high).map_or(true, |m| high >= m)
        && max_of(right, |b| b.high).map_or(true, |m| high > m);
    if is_high {
        pivots.push(TurningPoint {
            index,
            ts: centre.start,
            kind: PivotKind::High,
            price: centre.high,
        });
    }

    let low = OrderedFloat(centre.low);
    let is_low = min_of(left, |b| b.low).map_or(true, |m| low <= m)
        && min_of(right, |b| b.low).map_or(true, |m| low < m);
    if is_low {
        pivots.push(TurningPoint {
            index,
            ts: centre.start,
            kind: PivotKind::Low,
            price: centre.low,
        });
    }
    pivots
}

/// Every pivot in `bars` with `k` bars of context on each side, in bar order.
pub fn find_pivots(bars: &[Bar], k: usize) -> Vec<TurningPoint> {
    bars.windows(2 * k + 1)
        .enumerate()
        .flat_map(|(offset, window)| centre_pivots(window, offset + k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars_from(highs_lows: &[(f64, f64)]) -> Vec<Bar> {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        highs_lows
            .iter()
            .enumerate()
            .map(|(i, &(high, low))| {
                let mut bar = Bar::flat(t0 + Duration::seconds(30 * i as i64), 30, low);
                bar.high = high;
                bar
            })
            .collect()
    }

    #[test]
    fn test_single_peak() {
        let bars = bars_from(&[(1.0, 0.9), (1.1, 0.95), (1.3, 1.0), (1.2, 0.98), (1.0, 0.97)]);
        let pivots = find_pivots(&bars, 2);
        assert_eq!(pivots.len(), 1);
        assert_eq!(pivots[0].index, 2);
        assert_eq!(pivots[0].kind, PivotKind::High);
        assert_eq!(pivots[0].price, 1.3);
    }

    #[test]
    fn test_trough() {
        let bars = bars_from(&[(1.2, 1.0), (1.1, 0.9), (1.0, 0.8), (1.1, 0.85), (1.2, 0.95)]);
        let pivots = find_pivots(&bars, 2);
        assert_eq!(pivots.len(), 1);
        assert_eq!(pivots[0].kind, PivotKind::Low);
        assert_eq!(pivots[0].price, 0.8);
    }

    #[test]
    fn test_tie_resolves_to_later_bar() {
        let bars = bars_from(&[
            (1.0, 0.9),
            (1.1, 0.9),
            (1.3, 0.95),
            (1.3, 0.96),
            (1.2, 0.94),
            (1.0, 0.93),
        ]);
        let highs: Vec<usize> = find_pivots(&bars, 2)
            .into_iter()
            .filter(|p| p.kind == PivotKind::High)
            .map(|p| p.index)
            .collect();
        assert_eq!(highs, vec![3]);
    }

    #[test]
    fn test_outside_bar_is_both() {
        let bars = bars_from(&[(1.1, 1.0), (1.5, 0.5), (1.1, 1.0)]);
        let pivots = find_pivots(&bars, 1);
        let kinds: Vec<PivotKind> = pivots.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PivotKind::High, PivotKind::Low]);
    }

    #[test]
    fn test_too_few_bars() {
        let bars = bars_from(&[(1.0, 0.9), (1.3, 1.0)]);
        assert!(find_pivots(&bars, 2).is_empty());
    }
}
