use badam_shared_models::{Currency, CurrencyMap, Tone};
use badam_table::{
    Align, CellKind, MarketColumn, NormalizedMarketRecord, SortConfig, SortDirection, TickerLookup, format_number,
    format_percentage,
};
use prettytable::format::{self, Alignment};
use prettytable::{Cell, Row, Table};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

fn ticker<'a>(code: &'a str, currencies: &'a CurrencyMap) -> &'a str {
    currencies.ticker(code).filter(|t| !t.is_empty()).unwrap_or(code)
}

pub fn pair_label(record: &NormalizedMarketRecord, currencies: &CurrencyMap) -> String {
    format!(
        "{}/{}",
        ticker(&record.pair.primary, currencies),
        ticker(&record.pair.secondary, currencies)
    )
}

/// Block-character chart of `values`, scaled between their min and max.
pub fn sparkline(values: &[f64]) -> String {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return "-".to_string();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    finite
        .iter()
        .map(|v| {
            let level = if span > 0.0 { ((v - min) / span * top).round() as usize } else { 0 };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

pub fn cell_text(column: MarketColumn, record: &NormalizedMarketRecord, currencies: &CurrencyMap) -> String {
    match column.cell() {
        CellKind::Pair => pair_label(record, currencies),
        CellKind::Price => {
            let value = match column {
                MarketColumn::BestBid => record.price.best_bid,
                MarketColumn::BestOffer => record.price.best_offer,
                _ => record.price.last,
            };
            format_number(value, false)
        }
        CellKind::Change => {
            let change = &record.price.change;
            let arrow = match change.direction.tone() {
                Tone::Positive => "▲ ",
                Tone::Negative => "▼ ",
                Tone::Neutral => "",
            };
            format!("{arrow}{}", format_percentage(change.percent.abs(), 2))
        }
        CellKind::Volume => format!(
            "{} {}",
            format_number(record.volume.secondary, true),
            record.pair.secondary
        ),
        CellKind::Percent => format_percentage(record.volume_percent.unwrap_or(0.0), 2),
        CellKind::Sparkline => sparkline(&record.price_history),
    }
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::LEFT,
        Align::Center => Alignment::CENTER,
        Align::Right => Alignment::RIGHT,
    }
}

/// prettytable style spec for a change tone.
fn tone_style(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "Fg",
        Tone::Negative => "Fr",
        Tone::Neutral => "",
    }
}

pub fn header_label(column: MarketColumn, sorting: &SortConfig) -> String {
    let marker = match sorting.direction {
        Some(SortDirection::Ascending) if sorting.column == column.key() => " ↑",
        Some(SortDirection::Descending) if sorting.column == column.key() => " ↓",
        _ => "",
    };
    format!("{}{marker}", column.label())
}

pub fn market_table(records: &[NormalizedMarketRecord], currencies: &CurrencyMap, sorting: &SortConfig) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        MarketColumn::ALL
            .into_iter()
            .map(|column| Cell::new_align(&header_label(column, sorting), alignment(column.align())).style_spec("b"))
            .collect(),
    ));

    for record in records {
        let tone = tone_style(record.price.change.direction.tone());
        let cells = MarketColumn::ALL
            .into_iter()
            .map(|column| {
                let cell = Cell::new_align(&cell_text(column, record, currencies), alignment(column.align()));
                match column.cell() {
                    CellKind::Change | CellKind::Sparkline if !tone.is_empty() => cell.style_spec(tone),
                    _ => cell,
                }
            })
            .collect();
        table.add_row(Row::new(cells));
    }

    table
}

/// Code, ticker, kind and precision of each currency, in the given order.
pub fn currency_table(currencies: &[Currency]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        ["CODE", "TICKER", "TYPE", "DECIMALS", "EXAMPLE"]
            .into_iter()
            .map(|title| Cell::new(title).style_spec("b"))
            .collect(),
    ));
    for currency in currencies {
        table.add_row(Row::new(vec![
            Cell::new(&currency.code),
            Cell::new(&currency.ticker),
            Cell::new(&currency.kind.to_string()),
            Cell::new_align(&currency.decimals_places.to_string(), Alignment::RIGHT),
            Cell::new_align(&currency.format_amount(1234.5), Alignment::RIGHT),
        ]));
    }
    table
}

pub fn render_json(records: &[NormalizedMarketRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
