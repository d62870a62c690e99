use analytics::{MetricRecord, RecordMap};
use configuration::{RiskConfig, SafeHavenConfig};
use core_types::TrendState;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalState {
    RiskOn,
    RiskOff,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskRegime {
    #[serde(rename = "RISK-ON")]
    RiskOn,
    #[serde(rename = "LEAN RISK-ON")]
    LeanRiskOn,
    #[serde(rename = "NEUTRAL")]
    Neutral,
    #[serde(rename = "LEAN RISK-OFF")]
    LeanRiskOff,
    #[serde(rename = "RISK-OFF")]
    RiskOff,
}

impl RiskRegime {
    pub fn from_score(score: Decimal) -> Self {
        if score >= dec!(75) {
            RiskRegime::RiskOn
        } else if score >= dec!(55) {
            RiskRegime::LeanRiskOn
        } else if score >= dec!(45) {
            RiskRegime::Neutral
        } else if score >= dec!(25) {
            RiskRegime::LeanRiskOff
        } else {
            RiskRegime::RiskOff
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskRegime::RiskOn => "RISK-ON",
            RiskRegime::LeanRiskOn => "LEAN RISK-ON",
            RiskRegime::Neutral => "NEUTRAL",
            RiskRegime::LeanRiskOff => "LEAN RISK-OFF",
            RiskRegime::RiskOff => "RISK-OFF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskSignal {
    pub ticker: String,
    pub label: String,
    pub condition: String,
    pub state: SignalState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMonitor {
    pub signals: Vec<RiskSignal>,
    pub risk_on: usize,
    pub risk_off: usize,
    /// Share of risk-on among the non-neutral signals; 50 when every signal is neutral.
    pub score: Decimal,
    pub regime: RiskRegime,
}

/// Reads a growth asset through its 50/200 SMA alignment.
pub fn trend_signal(record: &MetricRecord) -> (SignalState, &'static str) {
    match (record.above_sma50, record.above_sma200) {
        (TrendState::Above, TrendState::Above) => (SignalState::RiskOn, "Above 50 & 200 SMA"),
        (TrendState::Below, TrendState::Below) => (SignalState::RiskOff, "Below 50 & 200 SMA"),
        (TrendState::Below, TrendState::Above) => (SignalState::Neutral, "Above 200, below 50 SMA"),
        (TrendState::Above, TrendState::Below) => (SignalState::Neutral, "Below 200, above 50 SMA"),
        _ => (SignalState::Neutral, "Insufficient history"),
    }
}

/// Reads a safe haven inversely: a falling price is appetite for risk.
pub fn safe_haven_signal(record: &MetricRecord, rule: &SafeHavenConfig) -> (SignalState, &'static str) {
    let readings: Vec<Decimal> = rule.horizons.iter().map(|&h| record.trailing(h)).collect();

    if rule.flat_is_rising {
        return if readings.iter().all(|v| *v < Decimal::ZERO) {
            (SignalState::RiskOn, "Declining (complacency)")
        } else {
            (SignalState::RiskOff, "Rising (fear)")
        };
    }

    if readings.iter().all(|v| *v < Decimal::ZERO) {
        (SignalState::RiskOn, "Falling (risk appetite)")
    } else if readings.iter().all(|v| *v > Decimal::ZERO) {
        (SignalState::RiskOff, "Rising (flight to safety)")
    } else if readings.len() > 1 {
        (SignalState::Neutral, "Mixed")
    } else {
        (SignalState::Neutral, "Flat")
    }
}

pub fn compute(records: &RecordMap, config: &RiskConfig) -> RiskMonitor {
    let mut signals = Vec::new();

    for asset in &config.risk_assets {
        if let Some(record) = records.get(&asset.ticker) {
            let (state, condition) = trend_signal(record);
            signals.push(RiskSignal {
                ticker: asset.ticker.clone(),
                label: asset.label.clone(),
                condition: condition.to_string(),
                state,
            });
        }
    }

    for haven in &config.safe_havens {
        if let Some(record) = records.get(&haven.ticker) {
            let (state, condition) = safe_haven_signal(record, haven);
            signals.push(RiskSignal {
                ticker: haven.ticker.clone(),
                label: haven.label.clone(),
                condition: condition.to_string(),
                state,
            });
        }
    }

    let risk_on = signals.iter().filter(|s| s.state == SignalState::RiskOn).count();
    let risk_off = signals.iter().filter(|s| s.state == SignalState::RiskOff).count();
    let score = if risk_on + risk_off == 0 {
        dec!(50)
    } else {
        Decimal::from(risk_on) / Decimal::from(risk_on + risk_off) * Decimal::ONE_HUNDRED
    };

    RiskMonitor {
        signals,
        risk_on,
        risk_off,
        score,
        regime: RiskRegime::from_score(score),
    }
}
