use analytics::RecordMap;
use chrono::{Datelike, Duration, NaiveDate};
use configuration::{CalendarConfig, Impact};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroEvent {
    pub date: NaiveDate,
    pub name: String,
    pub region: String,
    pub impact: Impact,
}

/// Returns the configured recurring events falling within
/// `[as_of - past_days, as_of + future_days]`, earliest first.
///
/// Events are placed in the year of `as_of` and its neighbours so the window can cross
/// a year boundary. A Feb 29 event is skipped in years without one.
pub fn upcoming(config: &CalendarConfig, as_of: NaiveDate) -> Vec<MacroEvent> {
    let start = as_of - Duration::days(config.past_days);
    let end = as_of + Duration::days(config.future_days);

    let mut events: Vec<MacroEvent> = (as_of.year() - 1..=as_of.year() + 1)
        .flat_map(|year| {
            config.events.iter().filter_map(move |event| {
                let date = NaiveDate::from_ymd_opt(year, event.month, event.day)?;
                Some(MacroEvent {
                    date,
                    name: event.name.clone(),
                    region: event.region.clone(),
                    impact: event.impact,
                })
            })
        })
        .filter(|event| event.date >= start && event.date <= end)
        .collect();

    events.sort_by_key(|event| event.date);
    events
}

/// How a region proxy traded over the week before and the session after the reporting date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceWindow {
    pub ticker: String,
    pub label: String,
    pub region: String,
    pub week_before: Decimal,
    pub day_after: Decimal,
}

pub fn performance_windows(records: &RecordMap, config: &CalendarConfig) -> Vec<PerformanceWindow> {
    config
        .performance_windows
        .iter()
        .filter_map(|proxy| {
            let r = records.get(&proxy.ticker)?;
            Some(PerformanceWindow {
                ticker: proxy.ticker.clone(),
                label: proxy.label.clone(),
                region: proxy.region.clone(),
                week_before: r.week1,
                day_after: r.change_1d,
            })
        })
        .collect()
}
