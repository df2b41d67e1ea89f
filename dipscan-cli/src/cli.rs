use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use dipscan::{DiscountTier, Period, SamplingInterval};

#[derive(Parser)]
#[command(
    name = "dipscan",
    version,
    about = "Crypto price analysis: best time of day to buy, dip-buying ladders"
)]
pub struct Cli {
    /// Verbose tracing output on stderr.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Find the historically cheapest UTC time of day to buy.
    BestTime {
        /// Data source, or "all" to fan out over every connector.
        #[arg(long, default_value = "all")]
        source: String,
        /// Ticker symbol, e.g. BTC-USD.
        #[arg(long)]
        ticker: String,
        /// Look-back window: 30d, 6mo, 2y, ytd or max.
        #[arg(long, default_value = "30d")]
        period: Period,
        /// Sampling cadence: 1m, 5m, 15m, 30m, 1h, 6h or 1d.
        #[arg(long, default_value = "1h")]
        interval: SamplingInterval,
    },
    /// Simulate a ladder of discounted limit orders over past prices.
    Ladder {
        /// Data source to replay history from.
        #[arg(long, default_value = "coinbase")]
        source: String,
        /// Ticker symbol, e.g. BTC-USD.
        #[arg(long)]
        ticker: String,
        /// Look-back window to replay.
        #[arg(long, default_value = "90d")]
        period: Period,
        /// Sampling cadence of the replayed series.
        #[arg(long, default_value = "1h")]
        interval: SamplingInterval,
        /// A tier as `discount_pct:budget`, e.g. `5:100`. Repeatable.
        #[arg(long = "tier", value_parser = parse_tier)]
        tiers: Vec<DiscountTier>,
        /// Reference price to anchor the ladder; defaults to the last price.
        #[arg(long)]
        reference: Option<Decimal>,
        /// Derive this many tiers from historical drawdowns instead of --tier.
        #[arg(long)]
        suggest: Option<usize>,
        /// Total budget to split across suggested tiers.
        #[arg(long)]
        total: Option<Decimal>,
    },
    /// Export daily closes to a `Date,Close` flat file.
    Export {
        /// Data source to export from.
        #[arg(long, default_value = "coinbase")]
        source: String,
        /// Ticker symbol, e.g. BTC-USD.
        #[arg(long)]
        ticker: String,
        /// Look-back window to export.
        #[arg(long, default_value = "1y")]
        period: Period,
        /// Output file path.
        #[arg(long)]
        out: PathBuf,
    },
    /// Compare daily vs. twice-monthly accumulation over a flat file.
    Compare {
        /// A `Date,Close` flat file, as produced by `export`.
        #[arg(long)]
        file: PathBuf,
        /// Cash spent per daily purchase, in quote currency.
        #[arg(long)]
        amount: Decimal,
    },
}

/// Parse a `discount_pct:budget` pair into a tier.
fn parse_tier(s: &str) -> Result<DiscountTier, String> {
    let (pct, budget) = s
        .split_once(':')
        .ok_or_else(|| format!("expected discount_pct:budget, got {s:?}"))?;
    let discount_pct: Decimal = pct
        .trim()
        .parse()
        .map_err(|e| format!("bad discount {pct:?}: {e}"))?;
    let budget: Decimal = budget
        .trim()
        .parse()
        .map_err(|e| format!("bad budget {budget:?}: {e}"))?;
    Ok(DiscountTier {
        discount_pct,
        budget,
    })
}
