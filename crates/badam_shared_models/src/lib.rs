pub mod currency;
pub mod market;

pub use currency::{Currency, CurrencyKind, CurrencyMap};
pub use market::{ChangeDirection, Tone, MarketChange, MarketPair, MarketPrice, MarketVolume, RawMarketRecord};
