mod config;
mod render;
mod stores;
mod telemetry;

use anyhow::{Context, bail};
use badam_api::BadamClient;
use badam_query::QueryOptions;
use badam_shared_models::ChangeDirection;
use badam_table::{MarketColumn, MarketTableData, SortDirection};
use chrono::Local;
use clap::Parser;
use config::DashboardConfig;
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use stores::{CurrencyStore, MarketStore};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Refresh period for market data, in milliseconds
    #[arg(long, default_value = "10000")]
    interval_ms: u64,

    /// Fetch and print once, without polling
    #[arg(long)]
    once: bool,

    /// Stop after this many table refreshes
    #[arg(long)]
    refreshes: Option<usize>,

    /// Free-text search over pairs and tickers
    #[arg(long)]
    search: Option<String>,

    /// Base currency codes to keep (e.g. BTC,ETH)
    #[arg(long, value_delimiter = ',')]
    base: Vec<String>,

    /// Quote currency codes to keep (e.g. AUD,USDT)
    #[arg(long, value_delimiter = ',')]
    quote: Vec<String>,

    /// 24h change direction: up, down or none
    #[arg(long)]
    direction: Option<ChangeDirection>,

    /// Lowest signed 24h change percent to keep
    #[arg(long, default_value = "-100", allow_hyphen_values = true)]
    change_min: f64,

    /// Highest signed 24h change percent to keep
    #[arg(long, default_value = "100", allow_hyphen_values = true)]
    change_max: f64,

    /// Column key to sort by (e.g. pair, price.change, volume)
    #[arg(long)]
    sort: Option<String>,

    /// Sort descending instead of ascending
    #[arg(long)]
    desc: bool,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// List the known currencies and exit
    #[arg(long)]
    currencies: bool,
}

impl Args {
    fn polling(&self) -> Option<Duration> {
        (!self.once).then(|| Duration::from_millis(self.interval_ms))
    }

    fn sort_column(&self) -> anyhow::Result<Option<MarketColumn>> {
        let Some(key) = self.sort.as_deref() else {
            return Ok(None);
        };
        match MarketColumn::from_key(key) {
            Some(column) if column.sortable() => Ok(Some(column)),
            Some(_) => bail!("column {key} is not sortable"),
            None => bail!("unknown column {key}"),
        }
    }

    fn table(&self) -> anyhow::Result<MarketTableData> {
        let mut table = MarketTableData::new(Vec::new(), None);
        if let Some(search) = &self.search {
            table.set_search(search.as_str());
        }
        table.set_base_currencies(self.base.clone());
        table.set_quote_currencies(self.quote.clone());
        table.set_direction(self.direction);
        table.set_change_range(self.change_min, self.change_max);

        if let Some(column) = self.sort_column()? {
            let direction = if self.desc { SortDirection::Descending } else { SortDirection::Ascending };
            table.set_sorting(column.key(), Some(direction));
        }
        Ok(table)
    }
}

fn print_view(table: &MarketTableData, currencies: &CurrencyStore, markets: &MarketStore, json: bool) -> anyhow::Result<()> {
    let rows = table.sorted();

    if json {
        println!("{}", render::render_json(&rows).context("Failed to encode rows")?);
        return Ok(());
    }

    let updated = markets
        .last_updated()
        .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!(
        "\n{} of {} markets | bases: {} | quotes: {} | updated {}",
        rows.len(),
        markets.data_count(),
        markets.base_currencies().join(","),
        markets.quote_currencies().join(","),
        updated
    );
    render::market_table(&rows, &currencies.currency_map(), table.sort_config()).printstd();
    if rows.is_empty() {
        if markets.has_data() {
            println!("No markets match the current filters");
        } else {
            println!("No data available");
        }
    }
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = DashboardConfig::from_env().context("Failed to load dashboard configuration")?;
    let client = Arc::new(BadamClient::new(config.client_config()).context("Failed to build HTTP client")?);
    info!(endpoint = %config.endpoint, "Starting dashboard");
    let mut table = args.table()?;

    let currencies = CurrencyStore::new(client.clone());
    currencies.wait_idle().await;
    if args.currencies {
        println!("Primary");
        render::currency_table(&currencies.primary_currencies()).printstd();
        println!("\nSecondary");
        render::currency_table(&currencies.secondary_currencies()).printstd();
        return Ok(());
    }
    if currencies.currencies().is_empty() {
        warn!("No currency metadata; searching by raw codes only");
    }

    let markets = MarketStore::new(
        client,
        QueryOptions::builder().maybe_refetch_interval(args.polling()).build(),
    );
    table.update_currency_map(Some(currencies.currency_map()));

    let mut updates = markets.subscribe();
    let mut rendered_at = None;
    let mut renders = 0;

    loop {
        let state = updates.borrow_and_update().clone();

        if !state.loading {
            if !state.has_settled && args.once {
                bail!("Market data could not be fetched");
            }
            if state.has_settled && state.last_updated != rendered_at {
                rendered_at = state.last_updated;
                table.set_data(markets.processed());
                print_view(&table, &currencies, &markets, args.json)?;

                renders += 1;
                if args.once || args.refreshes.is_some_and(|limit| renders >= limit) {
                    break;
                }
            }
        }

        tokio::select! {
            changed = updates.changed() => changed.context("Market query stopped")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    telemetry::init_tracing("info");

    let args = Args::parse();
    let rt = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    rt.block_on(run(args))
}
