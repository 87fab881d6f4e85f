use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Currencies keyed by `code`.
pub type CurrencyMap = HashMap<String, Currency>;

const SVG_DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencyKind {
    Primary,
    Secondary,
}

impl fmt::Display for CurrencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrencyKind::Primary => write!(f, "Primary"),
            CurrencyKind::Secondary => write!(f, "Secondary"),
        }
    }
}

/// A currency as served by the `/currency` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub sort_order: i64,
    pub ticker: String,
    #[serde(rename = "type")]
    pub kind: CurrencyKind,
    pub decimals_places: u32,
    /// SVG icon, either base64 or already a `data:` URI.
    pub icon: String,
}

impl Currency {
    pub fn is_primary(&self) -> bool {
        self.kind == CurrencyKind::Primary
    }

    pub fn is_secondary(&self) -> bool {
        self.kind == CurrencyKind::Secondary
    }

    pub fn icon_data_url(&self) -> String {
        if self.icon.starts_with("data:") {
            self.icon.clone()
        } else {
            format!("{SVG_DATA_URL_PREFIX}{}", self.icon)
        }
    }

    /// Formats `amount` with this currency's number of decimal places.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{:.*}", self.decimals_places as usize, amount)
    }
}
