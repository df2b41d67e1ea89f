//! Purchase schedule comparison over daily closes: every day vs. 15x the
//! daily amount on the 1st and 15th of each month.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::error::DipscanError;
use crate::types::PriceSeries;

/// Quantity acquired and cash spent by one schedule over a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulation {
    /// Asset quantity acquired.
    pub quantity: Decimal,
    /// Total cash spent.
    pub cost: Decimal,
}

/// Side-by-side outcome of the two purchase schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleComparison {
    /// Fixed amount spent at every observation.
    pub daily: Accumulation,
    /// Fifteen times the daily amount, spent only on the 1st and the 15th.
    pub twice_monthly: Accumulation,
}

impl ScheduleComparison {
    /// Quantity advantage of the daily schedule (negative when twice-monthly
    /// came out ahead).
    #[must_use]
    pub fn quantity_difference(&self) -> Decimal {
        self.daily.quantity - self.twice_monthly.quantity
    }
}

/// Accumulate both schedules over a series of daily closes.
///
/// The twice-monthly schedule buys 15x the daily amount whenever the
/// observation falls on the 1st or the 15th of a month, approximating the
/// same monthly outlay as the daily schedule.
///
/// # Errors
/// - `InvalidArg` when `amount_per_day` is not positive.
/// - `InsufficientData` when the series is empty.
pub fn compare_schedules(
    series: &PriceSeries,
    amount_per_day: Decimal,
) -> Result<ScheduleComparison, DipscanError> {
    if amount_per_day <= Decimal::ZERO {
        return Err(DipscanError::InvalidArg(format!(
            "amount per day must be positive, got {amount_per_day}"
        )));
    }
    if series.is_empty() {
        return Err(DipscanError::insufficient(
            "schedule comparison needs at least one close",
        ));
    }

    let twice_amount = amount_per_day * Decimal::from(15);
    let mut daily = Accumulation {
        quantity: Decimal::ZERO,
        cost: Decimal::ZERO,
    };
    let mut twice_monthly = daily;

    for p in series.points() {
        daily.quantity += amount_per_day / p.price;
        daily.cost += amount_per_day;
        let day = p.ts.day();
        if day == 1 || day == 15 {
            twice_monthly.quantity += twice_amount / p.price;
            twice_monthly.cost += twice_amount;
        }
    }

    Ok(ScheduleComparison {
        daily,
        twice_monthly,
    })
}
