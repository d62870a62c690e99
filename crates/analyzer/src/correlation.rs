//! Cross-market correlation proxy.
//!
//! Each instrument is reduced to its four performance summaries `(ytd, 1W, 1M, 1Y)` and
//! the Pearson coefficient is taken between those 4-vectors. This measures how alike two
//! instruments' *return profiles* are, not the co-movement of their daily returns; treat
//! it as a coarse similarity score.

use analytics::{MetricRecord, RecordMap};
use configuration::{CorrelationConfig, LabeledTicker};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Row and column order of `values`.
    pub members: Vec<LabeledTicker>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.members.iter().position(|m| m.ticker == row)?;
        let j = self.members.iter().position(|m| m.ticker == col)?;
        Some(self.values[i][j])
    }
}

fn performance_vector(record: &MetricRecord) -> [f64; 4] {
    [record.ytd, record.week1, record.month1, record.year1]
        .map(|v| v.to_f64().unwrap_or_default())
}

/// Pearson correlation of two equal-length samples.
///
/// Zero whenever either sample has no variance.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let (mut num, mut den_a, mut den_b) = (0.0, 0.0, 0.0);
    for (x, y) in a[..n].iter().zip(&b[..n]) {
        let da = x - mean_a;
        let db = y - mean_b;
        num += da * db;
        den_a += da * da;
        den_b += db * db;
    }

    let den = (den_a * den_b).sqrt();
    if den == 0.0 {
        return 0.0;
    }
    num / den
}

/// Builds the matrix over configured members that have records, in configured order.
///
/// Returns `None` when fewer than `min_instruments` members are available.
pub fn compute(records: &RecordMap, config: &CorrelationConfig) -> Option<CorrelationMatrix> {
    let available: Vec<(&LabeledTicker, [f64; 4])> = config
        .members
        .iter()
        .filter_map(|m| records.get(&m.ticker).map(|r| (m, performance_vector(r))))
        .collect();

    if available.len() < config.min_instruments {
        tracing::debug!(
            available = available.len(),
            required = config.min_instruments,
            "Not enough instruments for a correlation matrix"
        );
        return None;
    }

    let n = available.len();
    let mut values = vec![vec![0.0; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let corr = pearson(&available[i].1, &available[j].1);
            values[i][j] = corr;
            values[j][i] = corr;
        }
    }

    Some(CorrelationMatrix {
        members: available.into_iter().map(|(m, _)| m.clone()).collect(),
        values,
    })
}
