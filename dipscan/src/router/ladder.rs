use chrono::Utc;
use rust_decimal::Decimal;

use dipscan_core::{
    DipscanError, DiscountTier, LadderOutcome, Period, PriceSeries, SamplingInterval,
    simulate,
};

use crate::Dipscan;

impl Dipscan {
    /// Simulate a tiered limit-order ladder against one source's history.
    ///
    /// When `reference` is `None` the last observed price anchors the
    /// ladder, matching the "place orders now" reading of the simulation.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unregistered source or invalid tiers,
    /// plus any fetch or normalization error. An unfilled tier is not an
    /// error; it shows up as an unfilled [`FillResult`](dipscan_core::FillResult).
    pub async fn ladder(
        &self,
        source: &str,
        ticker: &str,
        period: Period,
        interval: SamplingInterval,
        tiers: &[DiscountTier],
        reference: Option<Decimal>,
    ) -> Result<LadderOutcome, DipscanError> {
        let connector = self.connector(source)?;
        let span = period.resolve(Utc::now())?;
        let series = self
            .fetch_normalized(&connector, ticker, span, interval)
            .await?;
        let reference = match reference {
            Some(price) => price,
            None => {
                series
                    .last()
                    .map(|p| p.price)
                    .ok_or(DipscanError::EmptySeries)?
            }
        };
        simulate(&series, reference, tiers)
    }

    /// Daily close history for a source, for export to a flat file.
    ///
    /// # Errors
    /// Propagates fetch and normalization failures.
    pub async fn daily_closes(
        &self,
        source: &str,
        ticker: &str,
        period: Period,
    ) -> Result<PriceSeries, DipscanError> {
        let connector = self.connector(source)?;
        let span = period.resolve(Utc::now())?;
        self.fetch_normalized(&connector, ticker, span, SamplingInterval::D1)
            .await
    }
}
