use crate::record::{FieldValue, Record, TickerLookup, ValueAccessor};
use badam_shared_models::ChangeDirection;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn matches(&self, value: &FieldValue<'_>) -> bool {
        match (self, value) {
            (Scalar::Number(expected), FieldValue::Number(actual)) => expected == actual,
            (Scalar::Text(expected), FieldValue::Text(actual)) => expected == actual,
            _ => false,
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<ChangeDirection> for Scalar {
    fn from(value: ChangeDirection) -> Self {
        Scalar::Text(value.as_str().to_string())
    }
}

/// What a field filter accepts: one exact value, or any value from a list.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Equals(Scalar),
    AnyOf(Vec<Scalar>),
}

impl FilterValue {
    pub fn any_of<S: Into<Scalar>>(values: impl IntoIterator<Item = S>) -> Self {
        FilterValue::AnyOf(values.into_iter().map(Into::into).collect())
    }

    /// Empty text and empty lists place no restriction.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Equals(Scalar::Text(text)) => text.is_empty(),
            FilterValue::Equals(Scalar::Number(_)) => false,
            FilterValue::AnyOf(values) => values.is_empty(),
        }
    }

    fn accepts(&self, value: Option<FieldValue<'_>>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            FilterValue::Equals(expected) => expected.matches(&value),
            FilterValue::AnyOf(values) => values.iter().any(|expected| expected.matches(&value)),
        }
    }
}

impl From<Scalar> for FilterValue {
    fn from(value: Scalar) -> Self {
        FilterValue::Equals(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Equals(value.into())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Equals(value.into())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Equals(value.into())
    }
}

impl From<ChangeDirection> for FilterValue {
    fn from(value: ChangeDirection) -> Self {
        FilterValue::Equals(value.into())
    }
}

/// Search text, field filters and named predicates, all ANDed together.
pub struct FilterConfig<T> {
    pub search: Option<String>,
    pub field_filters: BTreeMap<String, FilterValue>,
    pub named_predicates: BTreeMap<String, Predicate<T>>,
}

impl<T> Default for FilterConfig<T> {
    fn default() -> Self {
        Self {
            search: None,
            field_filters: BTreeMap::new(),
            named_predicates: BTreeMap::new(),
        }
    }
}

impl<T> Clone for FilterConfig<T> {
    fn clone(&self) -> Self {
        Self {
            search: self.search.clone(),
            field_filters: self.field_filters.clone(),
            named_predicates: self.named_predicates.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterConfig")
            .field("search", &self.search)
            .field("field_filters", &self.field_filters)
            .field("named_predicates", &self.named_predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> FilterConfig<T> {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_field(mut self, path: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.field_filters.insert(path.into(), value.into());
        self
    }

    pub fn with_predicate(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.named_predicates.insert(name.into(), Arc::new(predicate));
        self
    }
}

/// Ticker text the search matches against: `"base/quote"` plus each ticker
/// on its own, falling back to the raw code when the lookup has no ticker.
fn ticker_texts(primary: &str, secondary: &str, lookup: &(impl TickerLookup + ?Sized)) -> [String; 3] {
    let resolve = |code: &str| {
        lookup
            .ticker(code)
            .filter(|ticker| !ticker.is_empty())
            .unwrap_or(code)
            .to_lowercase()
    };
    let base = resolve(primary);
    let quote = resolve(secondary);
    [format!("{base}/{quote}"), base, quote]
}

fn matches_search<T, A, L>(record: &T, needle: &str, accessor: &A, lookup: Option<&L>) -> bool
where
    T: Record,
    A: ValueAccessor<T>,
    L: TickerLookup + ?Sized,
{
    let in_fields = record.keys().iter().any(|key| {
        accessor
            .value(record, key)
            .and_then(|value| value.as_text())
            .is_some_and(|text| text.to_lowercase().contains(needle))
    });
    if in_fields {
        return true;
    }

    let Some(lookup) = lookup else {
        return false;
    };
    let primary = accessor.value(record, "pair.primary").and_then(|v| v.as_text());
    let secondary = accessor.value(record, "pair.secondary").and_then(|v| v.as_text());
    match (primary, secondary) {
        (Some(primary), Some(secondary)) => ticker_texts(primary, secondary, lookup)
            .iter()
            .any(|text| text.contains(needle)),
        _ => false,
    }
}

/// Whether `record` passes every part of `config`.
pub fn passes<T, A, L>(record: &T, config: &FilterConfig<T>, accessor: &A, lookup: Option<&L>) -> bool
where
    T: Record,
    A: ValueAccessor<T>,
    L: TickerLookup + ?Sized,
{
    if let Some(search) = config.search.as_deref().filter(|s| !s.is_empty()) {
        let needle = search.to_lowercase();
        if !matches_search(record, &needle, accessor, lookup) {
            return false;
        }
    }

    if !config.named_predicates.values().all(|predicate| predicate(record)) {
        return false;
    }

    config
        .field_filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .all(|(path, value)| value.accepts(accessor.value(record, path)))
}

/// Returns the records that pass `config`, in their original order.
pub fn filter_records<T, A, L>(records: &[T], config: &FilterConfig<T>, accessor: &A, lookup: Option<&L>) -> Vec<T>
where
    T: Record + Clone,
    A: ValueAccessor<T>,
    L: TickerLookup + ?Sized,
{
    records
        .iter()
        .filter(|record| passes(*record, config, accessor, lookup))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NestedValue;
    use crate::transform::tests::raw_market;
    use crate::transform::{NormalizedMarketRecord, normalize_markets};
    use badam_shared_models::{Currency, CurrencyKind, CurrencyMap};

    fn records() -> Vec<NormalizedMarketRecord> {
        normalize_markets(&[
            raw_market("BTC", "AUD", ChangeDirection::Up, "5", "100"),
            raw_market("ETH", "AUD", ChangeDirection::Down, "2", "300"),
            raw_market("ETH", "USDT", ChangeDirection::None, "0", "50"),
        ])
    }

    fn ids(records: &[NormalizedMarketRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn currency_map(entries: &[(&str, &str)]) -> CurrencyMap {
        entries
            .iter()
            .map(|(code, ticker)| {
                let currency = Currency {
                    code: code.to_string(),
                    sort_order: 0,
                    ticker: ticker.to_string(),
                    kind: CurrencyKind::Primary,
                    decimals_places: 2,
                    icon: String::new(),
                };
                (code.to_string(), currency)
            })
            .collect()
    }

    fn run(config: &FilterConfig<NormalizedMarketRecord>, lookup: Option<&CurrencyMap>) -> Vec<NormalizedMarketRecord> {
        filter_records(&records(), config, &NestedValue, lookup)
    }

    #[test]
    fn empty_config_keeps_everything() {
        let config = FilterConfig::default();
        assert_eq!(run(&config, None), records());
    }

    #[test]
    fn search_matches_text_fields_case_insensitively() {
        let config = FilterConfig::default().with_search("eth-a");
        assert_eq!(ids(&run(&config, None)), ["ETH-AUD"]);
    }

    #[test]
    fn search_ignores_numeric_fields() {
        let config = FilterConfig::default().with_search("123");
        assert!(run(&config, None).is_empty());
    }

    #[test]
    fn search_resolves_tickers() {
        let lookup = currency_map(&[("BTC", "XBT"), ("AUD", "AUD")]);

        let config = FilterConfig::default().with_search("xbt/aud");
        assert_eq!(ids(&run(&config, Some(&lookup))), ["BTC-AUD"]);

        let config = FilterConfig::default().with_search("XBT");
        assert_eq!(ids(&run(&config, Some(&lookup))), ["BTC-AUD"]);

        // Without a lookup table only the raw codes are searchable.
        assert!(run(&config, None).is_empty());
    }

    #[test]
    fn raw_code_still_matches_when_ticker_differs() {
        let lookup = currency_map(&[("BTC", "XBT")]);
        let config = FilterConfig::default().with_search("btc");

        assert_eq!(ids(&run(&config, Some(&lookup))), ["BTC-AUD"]);
    }

    #[test]
    fn unknown_codes_fall_back_to_raw_code() {
        let lookup = currency_map(&[("BTC", "XBT")]);
        let config = FilterConfig::default().with_search("eth/usdt");

        assert_eq!(ids(&run(&config, Some(&lookup))), ["ETH-USDT"]);
        // The id uses a dash, so the slash form only matches through the lookup.
        assert!(run(&config, None).is_empty());
    }

    #[test]
    fn list_filter_requires_membership() {
        let config = FilterConfig::default().with_field("pair.secondary", FilterValue::any_of(["AUD", "NZD"]));
        assert_eq!(ids(&run(&config, None)), ["BTC-AUD", "ETH-AUD"]);
    }

    #[test]
    fn scalar_filter_requires_equality() {
        let config = FilterConfig::default().with_field("price.change.direction", ChangeDirection::Down);
        assert_eq!(ids(&run(&config, None)), ["ETH-AUD"]);

        let config = FilterConfig::default().with_field("volume.secondary", 50.0);
        assert_eq!(ids(&run(&config, None)), ["ETH-USDT"]);
    }

    #[test]
    fn empty_filter_values_are_ignored() {
        let config = FilterConfig::default()
            .with_field("pair.primary", FilterValue::AnyOf(Vec::new()))
            .with_field("pair.secondary", "");
        assert_eq!(run(&config, None).len(), 3);
    }

    #[test]
    fn filter_on_missing_path_rejects() {
        let config = FilterConfig::default().with_field("nope", "x");
        assert!(run(&config, None).is_empty());
    }

    #[test]
    fn predicates_and_filters_combine() {
        let config = FilterConfig::default()
            .with_field("pair.primary", "ETH")
            .with_predicate("bigVolume", |r: &NormalizedMarketRecord| r.volume.secondary > 100.0);

        assert_eq!(ids(&run(&config, None)), ["ETH-AUD"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let lookup = currency_map(&[("BTC", "XBT")]);
        let config = FilterConfig::default()
            .with_search("aud")
            .with_predicate("up", |r: &NormalizedMarketRecord| r.price.change.direction != ChangeDirection::None);

        let once = filter_records(&records(), &config, &NestedValue, Some(&lookup));
        let twice = filter_records(&once, &config, &NestedValue, Some(&lookup));

        assert_eq!(once, twice);
    }
}
