use tabled::{Table, Tabled};

use dipscan::{Dipscan, Period, SamplingInterval};

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Best Time (Hour:Minute)")]
    best_time: String,
    #[tabled(rename = "Lowest Average Price")]
    price: String,
}

pub async fn run(
    scan: &Dipscan,
    source: &str,
    ticker: &str,
    period: Period,
    interval: SamplingInterval,
) -> anyhow::Result<()> {
    let rows = if source == "all" {
        scan.best_time_all(ticker, period, interval)
            .await
            .into_iter()
            .map(|r| match r.outcome {
                Ok(best) => Row {
                    source: r.source,
                    best_time: best.bucket.to_string(),
                    price: best.mean_price.round_dp(2).to_string(),
                },
                Err(e) => Row {
                    source: r.source,
                    best_time: "-".to_string(),
                    price: format!("error: {e}"),
                },
            })
            .collect()
    } else {
        let best = scan.best_time(source, ticker, period, interval).await?;
        vec![Row {
            source: source.to_string(),
            best_time: best.bucket.to_string(),
            price: best.mean_price.round_dp(2).to_string(),
        }]
    };
    println!("{}", Table::new(rows));
    Ok(())
}
