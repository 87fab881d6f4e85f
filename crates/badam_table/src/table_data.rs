//! Table state: the data set plus the current sort and filter settings.
//!
//! Views are recomputed from the current inputs on every access, so they
//! are always consistent with the latest data, sorting and filters.

use crate::filter::{FilterConfig, FilterValue, filter_records};
use crate::market_filters::{MarketFilters, create_market_filters};
use crate::record::{NestedValue, Record, TickerLookup, ValueAccessor};
use crate::sort::{SortConfig, SortDirection, sort_records};
use crate::transform::{NormalizedMarketRecord, derive_volume_percent};
use badam_shared_models::{ChangeDirection, CurrencyMap};
use std::sync::Arc;

pub type SharedLookup = Arc<dyn TickerLookup + Send + Sync>;

pub struct TableData<T, A = NestedValue> {
    data: Vec<T>,
    sorting: SortConfig,
    filters: FilterConfig<T>,
    lookup: Option<SharedLookup>,
    accessor: A,
}

impl<T> TableData<T, NestedValue>
where
    T: Record + Clone,
{
    pub fn new(data: Vec<T>) -> Self {
        Self::with_accessor(data, NestedValue)
    }
}

impl<T, A> TableData<T, A>
where
    T: Record + Clone,
    A: ValueAccessor<T>,
{
    pub fn with_accessor(data: Vec<T>, accessor: A) -> Self {
        Self {
            data,
            sorting: SortConfig::default(),
            filters: FilterConfig::default(),
            lookup: None,
            accessor,
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
    }

    pub fn sort_config(&self) -> &SortConfig {
        &self.sorting
    }

    pub fn set_sorting(&mut self, sorting: SortConfig) {
        self.sorting = sorting;
    }

    pub fn filter_config(&self) -> &FilterConfig<T> {
        &self.filters
    }

    pub fn set_filter_config(&mut self, filters: FilterConfig<T>) {
        self.filters = filters;
    }

    /// Sets or, with `None`, removes the filter on one field path.
    pub fn set_filter(&mut self, path: impl Into<String>, value: Option<FilterValue>) {
        let path = path.into();
        match value {
            Some(value) => {
                self.filters.field_filters.insert(path, value);
            }
            None => {
                self.filters.field_filters.remove(&path);
            }
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = Some(search.into());
    }

    pub fn set_lookup(&mut self, lookup: Option<SharedLookup>) {
        self.lookup = lookup;
    }

    /// Records passing the current filters, in data order.
    pub fn filtered(&self) -> Vec<T> {
        filter_records(&self.data, &self.filters, &self.accessor, self.lookup.as_deref())
    }

    /// Filtered records, then sorted.
    pub fn sorted(&self) -> Vec<T> {
        sort_records(&self.filtered(), &self.sorting, &self.accessor)
    }
}

/// [`TableData`] specialized for market rows, driven by [`MarketFilters`].
pub struct MarketTableData {
    table: TableData<NormalizedMarketRecord>,
    filters: MarketFilters,
}

impl MarketTableData {
    /// An empty currency map is treated as "no lookup".
    pub fn new(data: Vec<NormalizedMarketRecord>, currency_map: Option<CurrencyMap>) -> Self {
        let mut market = Self {
            table: TableData::new(Vec::new()),
            filters: MarketFilters::default(),
        };
        market.set_data(data);
        market.update_currency_map(currency_map);
        market.rebuild_filters();
        market
    }

    /// Replaces the data set. Volume shares are recomputed over the whole
    /// set so they do not shift as filters change.
    pub fn set_data(&mut self, data: Vec<NormalizedMarketRecord>) {
        self.table.set_data(derive_volume_percent(&data));
    }

    pub fn data(&self) -> &[NormalizedMarketRecord] {
        self.table.data()
    }

    pub fn update_currency_map(&mut self, currency_map: Option<CurrencyMap>) {
        let lookup = currency_map
            .filter(|map| !map.is_empty())
            .map(|map| Arc::new(map) as SharedLookup);
        self.table.set_lookup(lookup);
    }

    pub fn market_filters(&self) -> &MarketFilters {
        &self.filters
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.rebuild_filters();
    }

    pub fn set_base_currencies(&mut self, codes: Vec<String>) {
        self.filters.base_currencies = codes;
        self.rebuild_filters();
    }

    pub fn set_quote_currencies(&mut self, codes: Vec<String>) {
        self.filters.quote_currencies = codes;
        self.rebuild_filters();
    }

    pub fn set_direction(&mut self, direction: Option<ChangeDirection>) {
        self.filters.direction = direction;
        self.rebuild_filters();
    }

    pub fn set_change_range(&mut self, min: f64, max: f64) {
        self.filters.change_min = min;
        self.filters.change_max = max;
        self.rebuild_filters();
    }

    pub fn clear_filters(&mut self) {
        self.filters = MarketFilters::default();
        self.rebuild_filters();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_default()
    }

    pub fn sort_config(&self) -> &SortConfig {
        self.table.sort_config()
    }

    pub fn set_sorting(&mut self, column: impl Into<String>, direction: Option<SortDirection>) {
        self.table.set_sorting(SortConfig::new(column, direction));
    }

    pub fn filtered(&self) -> Vec<NormalizedMarketRecord> {
        self.table.filtered()
    }

    pub fn sorted(&self) -> Vec<NormalizedMarketRecord> {
        self.table.sorted()
    }

    fn rebuild_filters(&mut self) {
        self.table.set_filter_config(create_market_filters(&self.filters));
    }
}
