use crate::filter::{FilterConfig, FilterValue};
use crate::transform::NormalizedMarketRecord;
use badam_shared_models::ChangeDirection;

pub const CHANGE_RANGE: &str = "changeRange";

/// The market table's filter controls.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketFilters {
    pub search: String,
    pub base_currencies: Vec<String>,
    pub quote_currencies: Vec<String>,
    pub direction: Option<ChangeDirection>,
    /// Inclusive bounds on the signed 24h change percent.
    pub change_min: f64,
    pub change_max: f64,
}

impl Default for MarketFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            base_currencies: Vec::new(),
            quote_currencies: Vec::new(),
            direction: None,
            change_min: -100.0,
            change_max: 100.0,
        }
    }
}

impl MarketFilters {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

pub fn create_market_filters(filters: &MarketFilters) -> FilterConfig<NormalizedMarketRecord> {
    let mut config = FilterConfig::default().with_search(filters.search.clone());

    if !filters.base_currencies.is_empty() {
        config = config.with_field("pair.primary", FilterValue::any_of(filters.base_currencies.iter().map(String::as_str)));
    }
    if !filters.quote_currencies.is_empty() {
        config = config.with_field("pair.secondary", FilterValue::any_of(filters.quote_currencies.iter().map(String::as_str)));
    }
    if let Some(direction) = filters.direction {
        config = config.with_field("price.change.direction", direction);
    }

    let (min, max) = (filters.change_min, filters.change_max);
    config.with_predicate(CHANGE_RANGE, move |record: &NormalizedMarketRecord| {
        let change = record.price.change.signed_percent();
        change >= min && change <= max
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_records;
    use crate::record::NestedValue;
    use crate::transform::normalize_markets;
    use crate::transform::tests::raw_market;
    use badam_shared_models::CurrencyMap;

    fn records() -> Vec<NormalizedMarketRecord> {
        normalize_markets(&[
            raw_market("BTC", "AUD", ChangeDirection::Up, "5", "100"),
            raw_market("ETH", "AUD", ChangeDirection::Down, "7", "300"),
            raw_market("ETH", "USDT", ChangeDirection::None, "0", "50"),
            raw_market("XRP", "USDT", ChangeDirection::Up, "150", "10"),
        ])
    }

    fn apply(filters: &MarketFilters) -> Vec<String> {
        let config = create_market_filters(filters);
        filter_records(&records(), &config, &NestedValue, None::<&CurrencyMap>)
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn defaults_only_drop_changes_outside_hundred_percent() {
        assert_eq!(apply(&MarketFilters::default()), ["BTC-AUD", "ETH-AUD", "ETH-USDT"]);
    }

    #[test]
    fn base_and_quote_membership() {
        let filters = MarketFilters {
            base_currencies: vec!["ETH".to_string()],
            quote_currencies: vec!["USDT".to_string()],
            ..MarketFilters::default()
        };
        assert_eq!(apply(&filters), ["ETH-USDT"]);
    }

    #[test]
    fn direction_equality() {
        let filters = MarketFilters {
            direction: Some(ChangeDirection::Up),
            change_max: 1000.0,
            ..MarketFilters::default()
        };
        assert_eq!(apply(&filters), ["BTC-AUD", "XRP-USDT"]);
    }

    #[test]
    fn change_range_signs_down_moves() {
        let filters = MarketFilters {
            change_min: -10.0,
            change_max: -7.0,
            ..MarketFilters::default()
        };
        assert_eq!(apply(&filters), ["ETH-AUD"]);

        let filters = MarketFilters {
            change_min: 0.0,
            change_max: 5.0,
            ..MarketFilters::default()
        };
        assert_eq!(apply(&filters), ["BTC-AUD", "ETH-USDT"]);
    }

    #[test]
    fn builder_skips_empty_controls() {
        let config = create_market_filters(&MarketFilters::default());

        assert!(config.field_filters.is_empty());
        assert!(config.named_predicates.contains_key(CHANGE_RANGE));
        assert!(MarketFilters::default().is_default());
    }
}
