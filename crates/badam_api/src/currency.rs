use crate::method::Method;
use crate::{ApiError, BadamClient};
use badam_shared_models::{Currency, CurrencyKind, CurrencyMap};

pub struct Currencies;

impl Method for Currencies {
    const PATH: &'static str = "currency";

    type Item = Currency;
}

/// Case-insensitive lookup by code.
pub fn find_by_code<'a>(currencies: &'a [Currency], code: &str) -> Option<&'a Currency> {
    currencies.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

pub fn of_kind(currencies: &[Currency], kind: CurrencyKind) -> Vec<Currency> {
    currencies.iter().filter(|c| c.kind == kind).cloned().collect()
}

/// Stable sort by ascending `sort_order`.
pub fn sorted(mut currencies: Vec<Currency>) -> Vec<Currency> {
    currencies.sort_by_key(|c| c.sort_order);
    currencies
}

pub fn into_map(currencies: Vec<Currency>) -> CurrencyMap {
    currencies.into_iter().map(|c| (c.code.clone(), c)).collect()
}

impl BadamClient {
    pub async fn get_currencies(&self) -> Result<Vec<Currency>, ApiError> {
        self.call::<Currencies>().await
    }

    pub async fn get_currency_map(&self) -> Result<CurrencyMap, ApiError> {
        Ok(into_map(self.get_currencies().await?))
    }

    pub async fn get_currency_by_code(&self, code: &str) -> Result<Currency, ApiError> {
        let currencies = self.get_currencies().await?;

        find_by_code(&currencies, code)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Currency {code}")))
    }

    pub async fn get_primary_currencies(&self) -> Result<Vec<Currency>, ApiError> {
        Ok(of_kind(&self.get_currencies().await?, CurrencyKind::Primary))
    }

    pub async fn get_secondary_currencies(&self) -> Result<Vec<Currency>, ApiError> {
        Ok(of_kind(&self.get_currencies().await?, CurrencyKind::Secondary))
    }

    pub async fn get_currencies_sorted(&self) -> Result<Vec<Currency>, ApiError> {
        Ok(sorted(self.get_currencies().await?))
    }
}
