use crate::record::{FieldValue, Record};
use badam_shared_models::{ChangeDirection, MarketPair, RawMarketRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub direction: ChangeDirection,
    pub percent: f64,
    pub amount: f64,
}

impl Change {
    /// Percent magnitude signed by `direction`; `Down` is negative.
    pub fn signed_percent(&self) -> f64 {
        match self.direction {
            ChangeDirection::Down => -self.percent.abs(),
            _ => self.percent.abs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    pub last: f64,
    #[serde(rename = "bestBid")]
    pub best_bid: f64,
    #[serde(rename = "bestOffer")]
    pub best_offer: f64,
    pub change: Change,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Volume {
    pub primary: f64,
    pub secondary: f64,
}

/// A market row with every numeric field parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMarketRecord {
    /// `"{primary}-{secondary}"`.
    pub id: String,
    pub pair: MarketPair,
    pub price: Price,
    pub volume: Volume,
    #[serde(rename = "priceHistory")]
    pub price_history: Vec<f64>,
    /// Share of the set's total secondary volume, set by [`derive_volume_percent`].
    #[serde(rename = "volumePercent")]
    pub volume_percent: Option<f64>,
}

/// Float parsing that never fails: anything unparsable becomes NaN.
pub fn parse_number(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}

impl From<&RawMarketRecord> for NormalizedMarketRecord {
    fn from(raw: &RawMarketRecord) -> Self {
        Self {
            id: raw.pair.id(),
            pair: raw.pair.clone(),
            price: Price {
                last: parse_number(&raw.price.last),
                best_bid: parse_number(&raw.price.best_bid),
                best_offer: parse_number(&raw.price.best_offer),
                change: Change {
                    direction: raw.price.change.direction,
                    percent: parse_number(&raw.price.change.percent),
                    amount: parse_number(&raw.price.change.amount),
                },
            },
            volume: Volume {
                primary: parse_number(&raw.volume.primary),
                secondary: parse_number(&raw.volume.secondary),
            },
            price_history: raw.price_history.iter().map(|p| parse_number(p)).collect(),
            volume_percent: None,
        }
    }
}

pub fn transform(raw: &[RawMarketRecord]) -> Vec<NormalizedMarketRecord> {
    raw.iter().map(NormalizedMarketRecord::from).collect()
}

/// Assigns each record its percentage of the total secondary volume, or 0
/// for every record when the total is not positive.
pub fn derive_volume_percent(records: &[NormalizedMarketRecord]) -> Vec<NormalizedMarketRecord> {
    let total: f64 = records.iter().map(|r| r.volume.secondary).sum();

    records
        .iter()
        .map(|record| {
            let share = if total > 0.0 {
                record.volume.secondary / total * 100.0
            } else {
                0.0
            };
            NormalizedMarketRecord {
                volume_percent: Some(share),
                ..record.clone()
            }
        })
        .collect()
}

/// `transform` followed by `derive_volume_percent`.
pub fn normalize_markets(raw: &[RawMarketRecord]) -> Vec<NormalizedMarketRecord> {
    derive_volume_percent(&transform(raw))
}

impl Record for MarketPair {
    fn keys(&self) -> &'static [&'static str] {
        &["primary", "secondary"]
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "primary" => Some(FieldValue::Text(&self.primary)),
            "secondary" => Some(FieldValue::Text(&self.secondary)),
            _ => None,
        }
    }
}

impl Record for Change {
    fn keys(&self) -> &'static [&'static str] {
        &["direction", "percent", "amount"]
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "direction" => Some(FieldValue::Text(self.direction.as_str())),
            "percent" => Some(FieldValue::Number(self.percent)),
            "amount" => Some(FieldValue::Number(self.amount)),
            _ => None,
        }
    }
}

impl Record for Price {
    fn keys(&self) -> &'static [&'static str] {
        &["last", "bestBid", "bestOffer", "change"]
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "last" => Some(FieldValue::Number(self.last)),
            "bestBid" => Some(FieldValue::Number(self.best_bid)),
            "bestOffer" => Some(FieldValue::Number(self.best_offer)),
            "change" => Some(FieldValue::Node(&self.change)),
            _ => None,
        }
    }
}

impl Record for Volume {
    fn keys(&self) -> &'static [&'static str] {
        &["primary", "secondary"]
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "primary" => Some(FieldValue::Number(self.primary)),
            "secondary" => Some(FieldValue::Number(self.secondary)),
            _ => None,
        }
    }
}

impl Record for NormalizedMarketRecord {
    fn keys(&self) -> &'static [&'static str] {
        &["id", "pair", "price", "volume", "priceHistory", "volumePercent"]
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "id" => Some(FieldValue::Text(&self.id)),
            "pair" => Some(FieldValue::Node(&self.pair)),
            "price" => Some(FieldValue::Node(&self.price)),
            "volume" => Some(FieldValue::Node(&self.volume)),
            "priceHistory" => Some(FieldValue::Numbers(&self.price_history)),
            "volumePercent" => self.volume_percent.map(FieldValue::Number),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::record::get_nested_value;
    use badam_shared_models::{MarketChange, MarketPrice, MarketVolume};

    pub(crate) fn raw_market(
        primary: &str,
        secondary: &str,
        direction: ChangeDirection,
        percent: &str,
        volume_secondary: &str,
    ) -> RawMarketRecord {
        RawMarketRecord {
            pair: MarketPair::new(primary, secondary),
            price: MarketPrice {
                last: "123.45".to_string(),
                best_bid: "123.00".to_string(),
                best_offer: "124.00".to_string(),
                change: MarketChange {
                    direction,
                    percent: percent.to_string(),
                    amount: "1.5".to_string(),
                },
            },
            volume: MarketVolume {
                primary: "2".to_string(),
                secondary: volume_secondary.to_string(),
            },
            price_history: vec!["1".to_string(), "2".to_string(), "3".to_string()],
        }
    }

    #[test]
    fn parses_numeric_strings() {
        let raw = raw_market("BTC", "AUD", ChangeDirection::Up, "3.87", "300");
        let record = NormalizedMarketRecord::from(&raw);

        assert_eq!(record.id, "BTC-AUD");
        assert_eq!(record.price.last, 123.45);
        assert_eq!(record.price.best_bid, 123.0);
        assert_eq!(record.price.change.percent, 3.87);
        assert_eq!(record.volume.secondary, 300.0);
        assert_eq!(record.price_history, vec![1.0, 2.0, 3.0]);
        assert_eq!(record.volume_percent, None);
    }

    #[test]
    fn malformed_numbers_become_nan() {
        let mut raw = raw_market("BTC", "AUD", ChangeDirection::Up, "n/a", "300");
        raw.price.last = String::new();
        raw.price_history = vec!["x".to_string()];

        let record = NormalizedMarketRecord::from(&raw);

        assert!(record.price.last.is_nan());
        assert!(record.price.change.percent.is_nan());
        assert!(record.price_history[0].is_nan());
        assert_eq!(parse_number(" 4.5 "), 4.5);
    }

    #[test]
    fn volume_percent_is_share_of_total() {
        let raw = vec![
            raw_market("BTC", "AUD", ChangeDirection::Up, "1", "300"),
            raw_market("ETH", "AUD", ChangeDirection::Up, "1", "100"),
        ];

        let records = normalize_markets(&raw);

        assert_eq!(records[0].volume_percent, Some(75.0));
        assert_eq!(records[1].volume_percent, Some(25.0));
    }

    #[test]
    fn volume_percent_sums_to_hundred() {
        let raw: Vec<_> = ["1.5", "7", "0.25", "1000", "33.3"]
            .iter()
            .map(|v| raw_market("BTC", "AUD", ChangeDirection::None, "0", v))
            .collect();

        let total: f64 = normalize_markets(&raw)
            .iter()
            .filter_map(|r| r.volume_percent)
            .sum();

        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_volume_gives_zero_shares() {
        let raw = vec![
            raw_market("BTC", "AUD", ChangeDirection::Up, "1", "0"),
            raw_market("ETH", "AUD", ChangeDirection::Up, "1", "0"),
        ];

        let records = normalize_markets(&raw);

        assert!(records.iter().all(|r| r.volume_percent == Some(0.0)));
        assert!(derive_volume_percent(&[]).is_empty());
    }

    #[test]
    fn derive_leaves_input_untouched() {
        let records = transform(&[raw_market("BTC", "AUD", ChangeDirection::Up, "1", "10")]);
        let derived = derive_volume_percent(&records);

        assert_eq!(records[0].volume_percent, None);
        assert_eq!(derived[0].volume_percent, Some(100.0));
    }

    #[test]
    fn exposes_nested_columns() {
        let record = NormalizedMarketRecord::from(&raw_market("BTC", "AUD", ChangeDirection::Down, "2", "10"));

        let direction = get_nested_value(&record, "price.change.direction").and_then(|v| v.as_text());
        assert_eq!(direction, Some("Down"));
        let primary = get_nested_value(&record, "pair.primary").and_then(|v| v.as_text());
        assert_eq!(primary, Some("BTC"));
        assert!(get_nested_value(&record, "volumePercent").is_none());
        assert_eq!(record.price.change.signed_percent(), -2.0);
    }

    #[test]
    fn serializes_with_wire_names() {
        let records = normalize_markets(&[raw_market("BTC", "AUD", ChangeDirection::Up, "1", "10")]);
        let json = serde_json::to_value(&records[0]).unwrap();

        assert_eq!(json["price"]["bestBid"], 123.0);
        assert_eq!(json["volumePercent"], 100.0);
    }
}
