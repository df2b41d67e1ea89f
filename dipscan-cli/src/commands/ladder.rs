use anyhow::{Context, bail};
use chrono::Utc;
use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use dipscan::{
    BucketGranularity, Dipscan, DipscanError, DiscountTier, FillResult, Period, SamplingInterval,
};
use dipscan_core::{find_cheapest_bucket, simulate, suggest_tiers};

pub struct Args {
    pub source: String,
    pub ticker: String,
    pub period: Period,
    pub interval: SamplingInterval,
    pub tiers: Vec<DiscountTier>,
    pub reference: Option<Decimal>,
    pub suggest: Option<usize>,
    pub total: Option<Decimal>,
}

#[derive(Tabled)]
struct FillRow {
    #[tabled(rename = "Discount %")]
    discount: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Limit Price")]
    limit: String,
    #[tabled(rename = "Filled At")]
    filled_at: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
}

pub async fn run(scan: &Dipscan, args: Args) -> anyhow::Result<()> {
    let span = args.period.resolve(Utc::now())?;
    let series = scan
        .fetch_series(&args.source, &args.ticker, span, args.interval)
        .await?;

    let tiers = match args.suggest {
        Some(levels) => {
            let total = args
                .total
                .context("--suggest requires --total <budget>")?;
            let tiers = suggest_tiers(&series, levels, total)?;
            for t in &tiers {
                tracing::info!(
                    discount = %t.discount_pct.round_dp(2),
                    budget = %t.budget.round_dp(2),
                    "suggested tier"
                );
            }
            tiers
        }
        None => {
            if args.tiers.is_empty() {
                bail!("no tiers given; pass --tier pct:budget or --suggest N --total B");
            }
            args.tiers
        }
    };

    let reference = match args.reference {
        Some(price) => price,
        None => series
            .last()
            .map(|p| p.price)
            .ok_or(DipscanError::EmptySeries)?,
    };

    let outcome = simulate(&series, reference, &tiers)?;
    let rows: Vec<FillRow> = outcome
        .fills
        .iter()
        .map(|f| fill_row(f, &tiers[f.tier]))
        .collect();
    println!("{}", Table::new(rows));
    println!(
        "Invested: {} | Quantity: {} | VWAP: {}",
        outcome.invested.round_dp(2),
        outcome.quantity.round_dp(8),
        outcome
            .average_fill_price
            .map_or_else(|| "n/a (no fills)".to_string(), |p| p.round_dp(2).to_string()),
    );

    // Single-purchase baseline: what buying only at the historically
    // cheapest time of day would have averaged.
    let granularity = if args.interval.is_coarser_than_hourly() {
        BucketGranularity::Hour
    } else {
        BucketGranularity::HourMinute
    };
    if let Ok((bucket, mean)) = find_cheapest_bucket(&series, granularity) {
        println!(
            "Single-purchase baseline: buying at {bucket} averaged {}",
            mean.round_dp(2)
        );
    }
    Ok(())
}

fn fill_row(f: &FillResult, tier: &DiscountTier) -> FillRow {
    FillRow {
        discount: tier.discount_pct.round_dp(2).to_string(),
        budget: tier.budget.round_dp(2).to_string(),
        limit: f.limit_price.round_dp(2).to_string(),
        filled_at: f
            .filled_at
            .map_or_else(|| "unfilled".to_string(), |ts| ts.to_rfc3339()),
        quantity: f.quantity.round_dp(8).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use rust_decimal_macros::dec;

    fn tier() -> DiscountTier {
        DiscountTier {
            discount_pct: dec!(5),
            budget: dec!(100),
        }
    }

    #[test]
    fn filled_row_renders_the_fill_timestamp() {
        let fill = FillResult {
            tier: 0,
            limit_price: dec!(95),
            filled_at: DateTime::from_timestamp(3_600, 0),
            quantity: dec!(1.05),
        };
        let row = fill_row(&fill, &tier());
        assert_eq!(row.filled_at, "1970-01-01T01:00:00+00:00");
        assert_eq!(row.limit, "95");
    }

    #[test]
    fn unfilled_row_says_so() {
        let fill = FillResult {
            tier: 0,
            limit_price: dec!(95),
            filled_at: None,
            quantity: dec!(0),
        };
        let row = fill_row(&fill, &tier());
        assert_eq!(row.filled_at, "unfilled");
        assert_eq!(row.quantity, "0");
    }
}
