//! Summary figures over a set of records.

use serde::Serialize;

use crate::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub average: f64,
    pub highest: u8,
    pub lowest: u8,
    pub passed: usize,
    pub failed: usize,
    /// Percentage of records that pass, 0.0 to 100.0.
    pub pass_rate: f64,
}

impl Statistics {
    /// Returns `None` for an empty slice, where averages are undefined.
    pub fn from_records(records: &[Record]) -> Option<Self> {
        let highest = records.iter().map(|r| r.score).max()?;
        let lowest = records.iter().map(|r| r.score).min()?;

        let total = records.len();
        let sum: u64 = records.iter().map(|r| u64::from(r.score)).sum();
        let passed = records.iter().filter(|r| r.passed()).count();

        Some(Self {
            total,
            average: sum as f64 / total as f64,
            highest,
            lowest,
            passed,
            failed: total - passed,
            pass_rate: passed as f64 / total as f64 * 100.0,
        })
    }
}
