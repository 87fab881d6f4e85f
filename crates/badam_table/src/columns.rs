/// Horizontal alignment of a column's header and cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// How a column's cell is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Pair,
    Price,
    Change,
    Volume,
    Percent,
    Sparkline,
}

/// The market table's columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketColumn {
    Pair,
    LastPrice,
    Change,
    BestBid,
    BestOffer,
    Volume,
    VolumePercent,
    PriceHistory,
}

impl MarketColumn {
    pub const ALL: [MarketColumn; 8] = [
        MarketColumn::Pair,
        MarketColumn::LastPrice,
        MarketColumn::Change,
        MarketColumn::BestBid,
        MarketColumn::BestOffer,
        MarketColumn::Volume,
        MarketColumn::VolumePercent,
        MarketColumn::PriceHistory,
    ];

    /// Record path the column reads and sorts by.
    pub fn key(self) -> &'static str {
        match self {
            MarketColumn::Pair => "pair",
            MarketColumn::LastPrice => "price.last",
            MarketColumn::Change => "price.change",
            MarketColumn::BestBid => "price.bestBid",
            MarketColumn::BestOffer => "price.bestOffer",
            MarketColumn::Volume => "volume",
            MarketColumn::VolumePercent => "volumePercent",
            MarketColumn::PriceHistory => "priceHistory",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarketColumn::Pair => "NAME",
            MarketColumn::LastPrice => "LAST PRICE",
            MarketColumn::Change => "24H CHANGE",
            MarketColumn::BestBid => "BID",
            MarketColumn::BestOffer => "ASK",
            MarketColumn::Volume => "VOLUME (24H)",
            MarketColumn::VolumePercent => "VOLUME %",
            MarketColumn::PriceHistory => "PRICE CHART",
        }
    }

    pub fn sortable(self) -> bool {
        !matches!(
            self,
            MarketColumn::BestBid | MarketColumn::BestOffer | MarketColumn::PriceHistory
        )
    }

    pub fn align(self) -> Align {
        match self {
            MarketColumn::Pair => Align::Left,
            MarketColumn::Change | MarketColumn::PriceHistory => Align::Center,
            _ => Align::Right,
        }
    }

    pub fn cell(self) -> CellKind {
        match self {
            MarketColumn::Pair => CellKind::Pair,
            MarketColumn::LastPrice | MarketColumn::BestBid | MarketColumn::BestOffer => CellKind::Price,
            MarketColumn::Change => CellKind::Change,
            MarketColumn::Volume => CellKind::Volume,
            MarketColumn::VolumePercent => CellKind::Percent,
            MarketColumn::PriceHistory => CellKind::Sparkline,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.key() == key)
    }
}
