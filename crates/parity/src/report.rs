//! Parity report.

use serde::Serialize;
use std::fmt;
use tickbar_core::{RunSummary, Timeframe};

/// Compare two run summaries. One line per differing metric; every metric is
/// always checked.
pub fn compare(batch: &RunSummary, streaming: &RunSummary) -> Vec<String> {
    let mut diagnostics = Vec::new();
    let counts = [
        ("turning_points", batch.turning_points, streaming.turning_points),
        ("signals", batch.signals, streaming.signals),
        ("trade_log", batch.trades, streaming.trades),
    ];
    for (metric, b, s) in counts {
        if b != s {
            diagnostics.push(format!("{metric} mismatch: batch={b} streaming={s}"));
        }
    }
    if batch.has_final_position != streaming.has_final_position {
        diagnostics.push(format!(
            "final_position mismatch: batch={} streaming={}",
            presence(batch.has_final_position),
            presence(streaming.has_final_position)
        ));
    }
    diagnostics
}

fn presence(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "absent"
    }
}

/// Outcome of one batch-versus-streaming comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParityReport {
    pub timeframe: Timeframe,
    /// Bars in the generated sequence.
    pub bars: usize,
    pub batch: RunSummary,
    pub streaming: RunSummary,
    pub diagnostics: Vec<String>,
}

impl ParityReport {
    pub fn new(
        timeframe: Timeframe,
        bars: usize,
        batch: RunSummary,
        streaming: RunSummary,
    ) -> Self {
        let diagnostics = compare(&batch, &streaming);
        Self {
            timeframe,
            bars,
            batch,
            streaming,
            diagnostics,
        }
    }

    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Process exit code: 0 on full parity, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

impl fmt::Display for ParityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed() { "PASSED" } else { "FAILED" };
        writeln!(f, "{verdict} ({}, {} bars)", self.timeframe, self.bars)?;
        if self.passed() {
            writeln!(f, "  turning_points: {}", self.batch.turning_points)?;
            writeln!(f, "  signals:        {}", self.batch.signals)?;
            writeln!(f, "  trade_log:      {}", self.batch.trades)?;
            writeln!(f, "  final_position: {}", presence(self.batch.has_final_position))?;
        } else {
            for line in &self.diagnostics {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}
