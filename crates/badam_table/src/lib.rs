//! Market table pipeline: normalize raw rows, filter, sort and format them.

pub mod columns;
pub mod filter;
pub mod format;
pub mod market_filters;
pub mod record;
pub mod sort;
pub mod table_data;
pub mod transform;

pub use columns::{Align, CellKind, MarketColumn};
pub use filter::{FilterConfig, FilterValue, Predicate, Scalar, filter_records};
pub use format::{format_currency, format_number, format_percentage};
pub use market_filters::{MarketFilters, create_market_filters};
pub use record::{FieldValue, NestedValue, Record, TickerLookup, ValueAccessor, get_nested_value};
pub use sort::{SortConfig, SortDirection, sort_records};
pub use table_data::{MarketTableData, SharedLookup, TableData};
pub use transform::{NormalizedMarketRecord, derive_volume_percent, normalize_markets, transform};
