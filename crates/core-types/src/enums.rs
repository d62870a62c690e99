use serde::{Deserialize, Serialize};

/// Tri-state trend flag.
///
/// `Unknown` is produced whenever the series is too short for the indicator the flag
/// is derived from. On the wire it is carried as a nullable boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum TrendState {
    Above,
    Below,
    Unknown,
}

impl TrendState {
    /// Compares `value` against an optional reference level. Strictly greater is `Above`.
    pub fn compare<T: PartialOrd>(value: T, reference: Option<T>) -> Self {
        match reference {
            Some(level) if value > level => TrendState::Above,
            Some(_) => TrendState::Below,
            None => TrendState::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TrendState::Unknown)
    }

    pub fn is_above(&self) -> bool {
        matches!(self, TrendState::Above)
    }
}

impl From<Option<bool>> for TrendState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TrendState::Above,
            Some(false) => TrendState::Below,
            None => TrendState::Unknown,
        }
    }
}

impl From<TrendState> for Option<bool> {
    fn from(state: TrendState) -> Self {
        match state {
            TrendState::Above => Some(true),
            TrendState::Below => Some(false),
            TrendState::Unknown => None,
        }
    }
}

/// The trailing-return horizons reported for every instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnHorizon {
    Day1,
    Week1,
    Month1,
    Year1,
    Ytd,
}

impl ReturnHorizon {
    /// Trading-day lookback for the fixed horizons. `Ytd` is anchored on the calendar instead.
    pub fn trading_days(&self) -> Option<usize> {
        match self {
            ReturnHorizon::Day1 => Some(1),
            ReturnHorizon::Week1 => Some(5),
            ReturnHorizon::Month1 => Some(21),
            ReturnHorizon::Year1 => Some(252),
            ReturnHorizon::Ytd => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReturnHorizon::Day1 => "1D",
            ReturnHorizon::Week1 => "1W",
            ReturnHorizon::Month1 => "1M",
            ReturnHorizon::Year1 => "1Y",
            ReturnHorizon::Ytd => "YTD",
        }
    }
}
