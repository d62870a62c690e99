use analytics::MetricRecord;
use analyzer::{AggregateView, BreadthRatio, SignalState};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use core_types::TrendState;
use engine::MarketSnapshot;
use rust_decimal::Decimal;

/// Renders the whole snapshot as a sequence of terminal tables.
pub fn render(snapshot: &MarketSnapshot) -> String {
    let view = &snapshot.view;
    let mut out = format!(
        "Market overview as of {} ({} instruments)\n\n",
        view.as_of, view.instruments
    );

    for section in &view.sections {
        let mut table = new_table(vec![
            "Ticker", "Name", "Price", "1D", "1W", "1M", "YTD", "1Y", "52wH", "10", "20", "50",
            "200", "50>200",
        ]);
        for row in &section.rows {
            match &row.record {
                Some(r) => table.add_row(record_row(&row.ticker, &row.label, r)),
                None => table.add_row(vec![
                    Cell::new(&row.ticker),
                    Cell::new(&row.label),
                    Cell::new("unavailable").fg(Color::DarkGrey),
                ]),
            };
        }
        out.push_str(&format!("{}\n{}\n\n", section.title, table));
    }

    out.push_str(&render_regime(view));
    out.push_str(&render_breadth(view));
    out.push_str(&render_strength(view));
    out.push_str(&render_rotation(view));
    out.push_str(&render_correlation(view));
    out.push_str(&render_calendar(view));
    out
}

/// Renders one record as a metric/value table.
pub fn render_record(record: &MetricRecord) -> String {
    let mut table = new_table(vec!["Metric", "Value", "Trend"]);
    table.add_row(vec![Cell::new("As of"), Cell::new(record.as_of)]);
    table.add_row(vec![Cell::new("Price"), Cell::new(format!("{:.2}", record.price))]);
    for (name, value) in [
        ("1D", record.change_1d),
        ("1W", record.week1),
        ("1M", record.month1),
        ("YTD", record.ytd),
        ("1Y", record.year1),
        ("From 52w high", record.pct_from_52w_high),
    ] {
        table.add_row(vec![Cell::new(name), pct_cell(value)]);
    }
    for (name, sma, state) in [
        ("SMA 10", record.sma10, record.above_sma10),
        ("SMA 20", record.sma20, record.above_sma20),
        ("SMA 50", record.sma50, record.above_sma50),
        ("SMA 200", record.sma200, record.above_sma200),
    ] {
        let value = sma.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
        table.add_row(vec![Cell::new(name), Cell::new(value), trend_cell(state)]);
    }
    table.add_row(vec![Cell::new("50 > 200"), Cell::new(""), trend_cell(record.above_50_and_200)]);
    format!("{}\n{}\n", record.symbol, table)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn record_row(ticker: &str, label: &str, r: &MetricRecord) -> Vec<Cell> {
    vec![
        Cell::new(ticker),
        Cell::new(label),
        Cell::new(format!("{:.2}", r.price)),
        pct_cell(r.change_1d),
        pct_cell(r.week1),
        pct_cell(r.month1),
        pct_cell(r.ytd),
        pct_cell(r.year1),
        pct_cell(r.pct_from_52w_high),
        trend_cell(r.above_sma10),
        trend_cell(r.above_sma20),
        trend_cell(r.above_sma50),
        trend_cell(r.above_sma200),
        trend_cell(r.above_50_and_200),
    ]
}

fn signed(value: Decimal) -> String {
    if value > Decimal::ZERO {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

fn pct_cell(value: Decimal) -> Cell {
    let cell = Cell::new(signed(value));
    if value > Decimal::ZERO {
        cell.fg(Color::Green)
    } else if value < Decimal::ZERO {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn trend_cell(state: TrendState) -> Cell {
    match state {
        TrendState::Above => Cell::new("▲").fg(Color::Green),
        TrendState::Below => Cell::new("▼").fg(Color::Red),
        TrendState::Unknown => Cell::new("-").fg(Color::DarkGrey),
    }
}

fn ratio_row(ratio: &BreadthRatio) -> Vec<Cell> {
    vec![
        Cell::new(&ratio.label),
        Cell::new(format!("{}/{}", ratio.hits, ratio.total)),
        Cell::new(format!("{:.1}%", ratio.pct)),
    ]
}

fn render_regime(view: &AggregateView) -> String {
    let mut table = new_table(vec!["Signal", "Ticker", "Condition", "State"]);
    for signal in &view.risk.signals {
        let state = match signal.state {
            SignalState::RiskOn => Cell::new("risk-on").fg(Color::Green),
            SignalState::RiskOff => Cell::new("risk-off").fg(Color::Red),
            SignalState::Neutral => Cell::new("neutral").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&signal.label),
            Cell::new(&signal.ticker),
            Cell::new(&signal.condition),
            state,
        ]);
    }
    format!(
        "Risk regime: {} (score {:.0}, {} on / {} off)\nExposure: {:?} ({:.0}%)\n{}\n\n",
        view.risk.regime.label(),
        view.risk.score,
        view.risk.risk_on,
        view.risk.risk_off,
        view.exposure.band,
        view.exposure.pct,
        table
    )
}

fn render_breadth(view: &AggregateView) -> String {
    let breadth = &view.breadth;
    let mut table = new_table(vec!["Condition", "Count", "Share"]);
    for ratio in breadth.trend.iter().chain(&breadth.performance) {
        table.add_row(ratio_row(ratio));
    }
    table.add_row(ratio_row(&breadth.near_high));
    table.add_row(ratio_row(&breadth.far_from_high));
    format!(
        "Breadth over {} instruments: composite {:.1}% ({:?}), long-term {:?}, today {:?}\n{}\n\n",
        breadth.universe,
        breadth.composite.pct,
        breadth.composite.gauge,
        breadth.long_term.gauge,
        breadth.today.gauge,
        table
    )
}

fn render_strength(view: &AggregateView) -> String {
    if view.relative_strength.is_empty() {
        return String::new();
    }
    let mut table = new_table(vec!["#", "Ticker", "Name", "Region", "YTD", "1M", "1W", "Score"]);
    for entry in &view.relative_strength {
        table.add_row(vec![
            Cell::new(entry.rank),
            Cell::new(&entry.ticker),
            Cell::new(&entry.label),
            Cell::new(&entry.region),
            pct_cell(entry.ytd),
            pct_cell(entry.month1),
            pct_cell(entry.week1),
            Cell::new(format!("{:.2}", entry.composite)),
        ]);
    }
    format!("Relative strength\n{}\n\n", table)
}

fn render_rotation(view: &AggregateView) -> String {
    if view.rotation.is_empty() {
        return String::new();
    }
    let mut table = new_table(vec!["Ticker", "Sector", "Momentum", "Acceleration", "Quadrant"]);
    for point in &view.rotation {
        table.add_row(vec![
            Cell::new(&point.ticker),
            Cell::new(&point.label),
            pct_cell(point.momentum),
            Cell::new(format!("{:.2}", point.acceleration)),
            Cell::new(format!("{:?}", point.quadrant)),
        ]);
    }
    format!("Sector rotation\n{}\n\n", table)
}

fn render_correlation(view: &AggregateView) -> String {
    let Some(matrix) = &view.correlation else {
        return String::new();
    };
    let mut header = vec![String::new()];
    header.extend(matrix.members.iter().map(|m| m.ticker.clone()));
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    for (i, member) in matrix.members.iter().enumerate() {
        let mut row = vec![Cell::new(&member.ticker)];
        row.extend(matrix.values[i].iter().map(|v| Cell::new(format!("{:.2}", v))));
        table.add_row(row);
    }
    format!("Performance correlation (YTD, 1W, 1M, 1Y)\n{}\n\n", table)
}

fn render_calendar(view: &AggregateView) -> String {
    let mut out = String::new();
    if !view.calendar.is_empty() {
        let mut table = new_table(vec!["Date", "Event", "Region", "Impact"]);
        for event in &view.calendar {
            table.add_row(vec![
                Cell::new(event.date),
                Cell::new(&event.name),
                Cell::new(&event.region),
                Cell::new(format!("{:?}", event.impact)),
            ]);
        }
        out.push_str(&format!("Macro calendar\n{}\n\n", table));
    }
    if !view.performance_windows.is_empty() {
        let mut table = new_table(vec!["Ticker", "Market", "Region", "Week before", "Day after"]);
        for window in &view.performance_windows {
            table.add_row(vec![
                Cell::new(&window.ticker),
                Cell::new(&window.label),
                Cell::new(&window.region),
                pct_cell(window.week_before),
                pct_cell(window.day_after),
            ]);
        }
        out.push_str(&format!("Regional performance\n{}\n\n", table));
    }
    out
}
