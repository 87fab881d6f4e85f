//! Application stores: one query per resource plus the views derived from it.

use badam_api::BadamClient;
use badam_api::currency::{into_map, of_kind, sorted};
use badam_query::{Query, QueryOptions, QueryState};
use badam_shared_models::{Currency, CurrencyKind, CurrencyMap, RawMarketRecord};
use badam_table::{NormalizedMarketRecord, normalize_markets};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::sync::Arc;
use tokio::sync::watch;

/// Waits until no attempt is outstanding on `query`.
async fn wait_idle<T>(query: &Query<T>)
where
    T: Clone + Send + Sync + 'static,
{
    let mut updates = query.subscribe();
    // An error here means the query was dropped, so there is nothing to wait for.
    let _ = updates.wait_for(|state| !state.loading).await;
}

pub struct CurrencyStore {
    query: Query<Vec<Currency>>,
}

impl CurrencyStore {
    /// Currencies are fetched once; they rarely change.
    pub fn new(client: Arc<BadamClient>) -> Self {
        let query = Query::new(
            move || {
                let client = client.clone();
                async move { client.get_currencies().await }
            },
            QueryOptions::default(),
        );
        Self::from_query(query)
    }

    pub fn from_query(query: Query<Vec<Currency>>) -> Self {
        Self { query }
    }

    pub fn currencies(&self) -> Vec<Currency> {
        self.query.data().unwrap_or_default()
    }

    pub fn currency_map(&self) -> CurrencyMap {
        into_map(self.currencies())
    }

    pub fn primary_currencies(&self) -> Vec<Currency> {
        sorted(of_kind(&self.currencies(), CurrencyKind::Primary))
    }

    pub fn secondary_currencies(&self) -> Vec<Currency> {
        sorted(of_kind(&self.currencies(), CurrencyKind::Secondary))
    }

    pub async fn wait_idle(&self) {
        wait_idle(&self.query).await;
    }
}

pub struct MarketStore {
    query: Query<Vec<RawMarketRecord>>,
}

impl MarketStore {
    pub fn new(client: Arc<BadamClient>, options: QueryOptions) -> Self {
        let query = Query::new(
            move || {
                let client = client.clone();
                async move { client.get_markets().await }
            },
            options,
        );
        Self::from_query(query)
    }

    pub fn from_query(query: Query<Vec<RawMarketRecord>>) -> Self {
        Self { query }
    }

    pub fn market_data(&self) -> Vec<RawMarketRecord> {
        self.query.data().unwrap_or_default()
    }

    /// Normalized rows with volume shares, recomputed from the latest data.
    pub fn processed(&self) -> Vec<NormalizedMarketRecord> {
        normalize_markets(&self.market_data())
    }

    pub fn has_data(&self) -> bool {
        !self.market_data().is_empty()
    }

    pub fn data_count(&self) -> usize {
        self.market_data().len()
    }

    /// Distinct base codes, in first-seen order.
    pub fn base_currencies(&self) -> Vec<String> {
        self.market_data()
            .into_iter()
            .map(|m| m.pair.primary)
            .unique()
            .collect()
    }

    /// Distinct quote codes, in first-seen order.
    pub fn quote_currencies(&self) -> Vec<String> {
        self.market_data()
            .into_iter()
            .map(|m| m.pair.secondary)
            .unique()
            .collect()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.query.last_updated()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<Vec<RawMarketRecord>>> {
        self.query.subscribe()
    }
}
