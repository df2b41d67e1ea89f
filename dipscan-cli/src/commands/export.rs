use std::path::Path;

use dipscan::{Dipscan, Period};
use dipscan_core::flatfile;

pub async fn run(
    scan: &Dipscan,
    source: &str,
    ticker: &str,
    period: Period,
    out: &Path,
) -> anyhow::Result<()> {
    let series = scan.daily_closes(source, ticker, period).await?;
    flatfile::write_closes(out, &series)?;
    println!("Wrote {} daily closes to {}", series.len(), out.display());
    Ok(())
}
