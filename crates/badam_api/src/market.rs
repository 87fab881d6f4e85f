use crate::method::Method;
use crate::{ApiError, BadamClient};
use badam_shared_models::RawMarketRecord;

pub struct Markets;

impl Method for Markets {
    const PATH: &'static str = "market";

    type Item = RawMarketRecord;
}

/// Case-insensitive lookup on both legs of the pair.
pub fn find_by_pair<'a>(
    markets: &'a [RawMarketRecord],
    primary: &str,
    secondary: &str,
) -> Option<&'a RawMarketRecord> {
    markets.iter().find(|m| m.pair.matches(primary, secondary))
}

impl BadamClient {
    pub async fn get_markets(&self) -> Result<Vec<RawMarketRecord>, ApiError> {
        self.call::<Markets>().await
    }

    pub async fn get_market(&self, primary: &str, secondary: &str) -> Result<RawMarketRecord, ApiError> {
        let markets = self.get_markets().await?;

        find_by_pair(&markets, primary, secondary)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Market {primary}/{secondary}")))
    }
}
