use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};

use dipscan_core::{
    AnalysisResult, BestTime, BucketGranularity, DipscanError, Period, SamplingInterval,
    find_cheapest_bucket,
};

use crate::Dipscan;

/// Bucket granularity for an effective interval: hour-of-day when the
/// cadence is coarser than hourly, hour-and-minute otherwise.
const fn granularity_for(interval: SamplingInterval) -> BucketGranularity {
    if interval.is_coarser_than_hourly() {
        BucketGranularity::Hour
    } else {
        BucketGranularity::HourMinute
    }
}

impl Dipscan {
    /// Find the historically cheapest UTC time of day for one source.
    ///
    /// Fetches `period` worth of history at `interval`, normalizes it, and
    /// returns the bucket with the lowest mean price. Sub-daily intervals
    /// bucket by hour and minute; coarser ones by hour only.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unregistered source, `ProviderTimeout` on
    /// a slow provider, `EmptySeries` when nothing usable came back, and
    /// `InsufficientData` when the series cannot be bucketed.
    pub async fn best_time(
        &self,
        source: &str,
        ticker: &str,
        period: Period,
        interval: SamplingInterval,
    ) -> Result<BestTime, DipscanError> {
        let connector = self.connector(source)?;
        let span = period.resolve(Utc::now())?;
        let series = self
            .fetch_normalized(&connector, ticker, span, interval)
            .await?;
        let (bucket, mean_price) = find_cheapest_bucket(&series, granularity_for(interval))?;
        Ok(BestTime { bucket, mean_price })
    }

    /// Run [`best_time`](Self::best_time) concurrently across every
    /// registered connector.
    ///
    /// Each source's failure is captured in its own [`AnalysisResult`]
    /// rather than aborting the batch, and the output is sorted by source
    /// name so repeated runs compare stably.
    pub async fn best_time_all(
        &self,
        ticker: &str,
        period: Period,
        interval: SamplingInterval,
    ) -> Vec<AnalysisResult> {
        let span = match period.resolve(Utc::now()) {
            Ok(span) => span,
            Err(e) => {
                // A bad period fails every source identically.
                return self
                    .connectors
                    .iter()
                    .map(|c| AnalysisResult {
                        source: c.name().to_string(),
                        outcome: Err(DipscanError::InvalidArg(e.to_string())),
                    })
                    .collect();
            }
        };

        let mut futs = FuturesUnordered::new();
        for connector in &self.connectors {
            let name = connector.name();
            futs.push(async move {
                let outcome = async {
                    let series = self
                        .fetch_normalized(connector, ticker, span, interval)
                        .await?;
                    let (bucket, mean_price) =
                        find_cheapest_bucket(&series, granularity_for(interval))?;
                    Ok(BestTime { bucket, mean_price })
                }
                .await;
                AnalysisResult {
                    source: name.to_string(),
                    outcome,
                }
            });
        }

        let mut results: Vec<AnalysisResult> = Vec::with_capacity(self.connectors.len());
        while let Some(res) = futs.next().await {
            results.push(res);
        }
        results.sort_by(|a, b| a.source.cmp(&b.source));
        results
    }
}
