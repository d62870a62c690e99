use analytics::RecordMap;
use configuration::RelativeStrengthConfig;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthEntry {
    /// 1-based position after ranking.
    pub rank: usize,
    pub ticker: String,
    pub label: String,
    pub region: String,
    pub ytd: Decimal,
    pub month1: Decimal,
    pub week1: Decimal,
    pub composite: Decimal,
}

/// Ranks the configured members by a weighted blend of YTD, 1M and 1W returns.
///
/// Members without a record are skipped. Equal scores keep their configured order.
pub fn rank(records: &RecordMap, config: &RelativeStrengthConfig) -> Vec<StrengthEntry> {
    let w = &config.weights;
    let mut entries: Vec<StrengthEntry> = config
        .members
        .iter()
        .filter_map(|member| {
            let r = records.get(&member.ticker)?;
            Some(StrengthEntry {
                rank: 0,
                ticker: member.ticker.clone(),
                label: member.label.clone(),
                region: member.region.clone(),
                ytd: r.ytd,
                month1: r.month1,
                week1: r.week1,
                composite: w.ytd * r.ytd + w.month1 * r.month1 + w.week1 * r.week1,
            })
        })
        .collect();

    // `sort_by` is stable, which is what makes ties deterministic.
    entries.sort_by(|a, b| b.composite.cmp(&a.composite));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    entries
}
