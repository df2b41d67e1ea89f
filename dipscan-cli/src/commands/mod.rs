mod best_time;
mod compare;
mod export;
mod ladder;

use std::sync::Arc;

use dipscan::Dipscan;
use dipscan_coinbase::CoinbaseConnector;
use dipscan_coingecko::CoingeckoConnector;
use dipscan_mock::MockConnector;
use dipscan_yahoo::YahooConnector;

use crate::cli::{Cli, Command};

/// Build the orchestrator with every shipped connector registered.
fn orchestrator() -> anyhow::Result<Dipscan> {
    let scan = Dipscan::builder()
        .with_connector(Arc::new(CoinbaseConnector::default()))
        .with_connector(Arc::new(CoingeckoConnector::default()))
        .with_connector(Arc::new(YahooConnector::default()))
        .with_connector(Arc::new(MockConnector::new()))
        .build()?;
    Ok(scan)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::BestTime {
            source,
            ticker,
            period,
            interval,
        } => best_time::run(&orchestrator()?, &source, &ticker, period, interval).await,
        Command::Ladder {
            source,
            ticker,
            period,
            interval,
            tiers,
            reference,
            suggest,
            total,
        } => {
            ladder::run(
                &orchestrator()?,
                ladder::Args {
                    source,
                    ticker,
                    period,
                    interval,
                    tiers,
                    reference,
                    suggest,
                    total,
                },
            )
            .await
        }
        Command::Export {
            source,
            ticker,
            period,
            out,
        } => export::run(&orchestrator()?, &source, &ticker, period, &out).await,
        Command::Compare { file, amount } => compare::run(&file, amount),
    }
}
