use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one tradable market: `primary` is priced in `secondary`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketPair {
    pub primary: String,
    pub secondary: String,
}

impl MarketPair {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    /// Case-insensitive match on both legs.
    pub fn matches(&self, primary: &str, secondary: &str) -> bool {
        self.primary.eq_ignore_ascii_case(primary) && self.secondary.eq_ignore_ascii_case(secondary)
    }

    /// Canonical row key, `"{primary}-{secondary}"`.
    pub fn id(&self) -> String {
        format!("{}-{}", self.primary, self.secondary)
    }
}

impl fmt::Display for MarketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.primary, self.secondary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeDirection {
    Up,
    Down,
    None,
}

/// How a change should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl ChangeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeDirection::Up => "Up",
            ChangeDirection::Down => "Down",
            ChangeDirection::None => "None",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            ChangeDirection::Up => Tone::Positive,
            ChangeDirection::Down => Tone::Negative,
            ChangeDirection::None => Tone::Neutral,
        }
    }
}

impl fmt::Display for ChangeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(ChangeDirection::Up),
            "down" => Ok(ChangeDirection::Down),
            "none" => Ok(ChangeDirection::None),
            other => Err(format!("unknown change direction: {other}")),
        }
    }
}

/// 24h change. `percent` and `amount` are decimal strings on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketChange {
    pub direction: ChangeDirection,
    pub percent: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub last: String,
    #[serde(rename = "bestBid")]
    pub best_bid: String,
    #[serde(rename = "bestOffer")]
    pub best_offer: String,
    pub change: MarketChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketVolume {
    /// Traded in the base currency.
    pub primary: String,
    /// Traded in the quote currency.
    pub secondary: String,
}

/// A market as served by the `/market` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMarketRecord {
    pub pair: MarketPair,
    pub price: MarketPrice,
    pub volume: MarketVolume,
    #[serde(rename = "priceHistory", default)]
    pub price_history: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_market_payload() {
        let json = r#"{
            "pair": {"primary": "BTC", "secondary": "AUD"},
            "price": {
                "last": "101.5",
                "bestBid": "101.0",
                "bestOffer": "102.0",
                "change": {"direction": "Down", "percent": "3.87", "amount": "6182.77"}
            },
            "volume": {"primary": "1.5", "secondary": "300"},
            "priceHistory": ["1", "2"]
        }"#;
        let record: RawMarketRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.pair, MarketPair::new("BTC", "AUD"));
        assert_eq!(record.price.best_offer, "102.0");
        assert_eq!(record.price.change.direction, ChangeDirection::Down);
        assert_eq!(record.price_history, vec!["1", "2"]);
    }

    #[test]
    fn pair_matching_ignores_case() {
        let pair = MarketPair::new("BTC", "AUD");
        assert!(pair.matches("btc", "aud"));
        assert!(!pair.matches("aud", "btc"));
        assert_eq!(pair.id(), "BTC-AUD");
        assert_eq!(pair.to_string(), "BTC/AUD");
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("down".parse::<ChangeDirection>(), Ok(ChangeDirection::Down));
        assert_eq!("UP".parse::<ChangeDirection>(), Ok(ChangeDirection::Up));
        assert!("sideways".parse::<ChangeDirection>().is_err());
        assert_eq!(ChangeDirection::None.tone(), Tone::Neutral);
    }
}
