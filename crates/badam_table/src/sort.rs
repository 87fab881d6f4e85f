use crate::record::{FieldValue, ValueAccessor};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

/// Column path plus direction. An empty column or no direction means "leave
/// the order alone".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub column: String,
    pub direction: Option<SortDirection>,
}

impl SortConfig {
    pub fn new(column: impl Into<String>, direction: Option<SortDirection>) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.column.is_empty() && self.direction.is_some()
    }
}

/// Composite columns whose values need a dedicated comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortColumn {
    Pair,
    Change,
    Volume,
    Plain,
}

impl SortColumn {
    fn from_key(key: &str) -> Self {
        match key {
            "pair" => SortColumn::Pair,
            "price.change" => SortColumn::Change,
            "volume" => SortColumn::Volume,
            _ => SortColumn::Plain,
        }
    }
}

/// Case-insensitive ordering; on a tie lowercase sorts before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn pair_label(value: &FieldValue<'_>) -> Option<String> {
    let node = value.as_node()?;
    let primary = node.field("primary")?.as_text()?;
    let secondary = node.field("secondary")?.as_text()?;
    Some(format!("{primary}/{secondary}"))
}

fn number_at(value: &FieldValue<'_>, key: &str) -> Option<f64> {
    value.as_node()?.field(key)?.as_number()
}

fn compare_composite(a: &FieldValue<'_>, b: &FieldValue<'_>, column: SortColumn) -> Ordering {
    let ordering = match column {
        SortColumn::Pair => pair_label(a)
            .zip(pair_label(b))
            .map(|(a, b)| locale_compare(&a, &b)),
        SortColumn::Change => number_at(a, "percent")
            .zip(number_at(b, "percent"))
            .map(|(a, b)| a.total_cmp(&b)),
        SortColumn::Volume => number_at(a, "secondary")
            .zip(number_at(b, "secondary"))
            .map(|(a, b)| a.total_cmp(&b)),
        SortColumn::Plain => None,
    };

    ordering.unwrap_or_else(|| locale_compare(&a.coerce_text(), &b.coerce_text()))
}

fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>, column: SortColumn) -> Ordering {
    match (a, b) {
        (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
        (FieldValue::Text(a), FieldValue::Text(b)) => locale_compare(a, b),
        (a, b) if a.is_composite() && b.is_composite() => compare_composite(a, b, column),
        (a, b) => locale_compare(&a.coerce_text(), &b.coerce_text()),
    }
}

/// Returns a stably sorted copy of `records`.
///
/// Records with no value at the column always come last, in either
/// direction. NaN orders after every number.
pub fn sort_records<T, A>(records: &[T], config: &SortConfig, accessor: &A) -> Vec<T>
where
    T: Clone,
    A: ValueAccessor<T>,
{
    let Some(direction) = config.direction.filter(|_| !config.column.is_empty()) else {
        return records.to_vec();
    };
    let column = SortColumn::from_key(&config.column);

    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        match (accessor.value(a, &config.column), accessor.value(b, &config.column)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ordering = compare_values(&a, &b, column);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            }
        }
    });
    sorted
}
