//! Tiered DCA order-ladder simulation: allocate a budget across discount
//! tiers and determine which historical bars would have filled each one.

use rust_decimal::Decimal;

use crate::error::DipscanError;
use crate::types::{DiscountTier, FillResult, LadderOutcome, PriceSeries};

/// Simulate a discount ladder against a historical series.
///
/// For each tier, `limit_price = reference_price * (1 - discount_pct/100)`.
/// The series is scanned chronologically for the first point at or below the
/// limit; that point's timestamp fills the tier and the quantity acquired is
/// `budget / fill price`. Tiers with no qualifying point are recorded as
/// unfilled (no timestamp, zero quantity) — a partially filled ladder is
/// expected behavior, not a fault.
///
/// Tiers are independent: a later, cheaper tier may fill earlier in
/// wall-clock time than an earlier-indexed tier. Duplicate discounts are
/// allowed and treated independently.
///
/// The aggregate `average_fill_price` is the volume-weighted average across
/// filled tiers, and `None` when nothing filled (the division is undefined,
/// not zero or infinity).
///
/// # Errors
/// Returns `InvalidArg` when the reference price is not positive, a budget
/// is not positive, or a discount is negative.
pub fn simulate(
    series: &PriceSeries,
    reference_price: Decimal,
    tiers: &[DiscountTier],
) -> Result<LadderOutcome, DipscanError> {
    if reference_price <= Decimal::ZERO {
        return Err(DipscanError::InvalidArg(format!(
            "reference price must be positive, got {reference_price}"
        )));
    }
    for (i, tier) in tiers.iter().enumerate() {
        if tier.budget <= Decimal::ZERO {
            return Err(DipscanError::InvalidArg(format!(
                "tier {i}: budget must be positive, got {}",
                tier.budget
            )));
        }
        if tier.discount_pct < Decimal::ZERO {
            return Err(DipscanError::InvalidArg(format!(
                "tier {i}: discount must be >= 0, got {}",
                tier.discount_pct
            )));
        }
    }

    let mut fills = Vec::with_capacity(tiers.len());
    let mut invested = Decimal::ZERO;
    let mut quantity = Decimal::ZERO;

    for (i, tier) in tiers.iter().enumerate() {
        let limit_price =
            reference_price * (Decimal::ONE - tier.discount_pct / Decimal::ONE_HUNDRED);
        let fill = match series.points().iter().find(|p| p.price <= limit_price) {
            Some(p) => {
                let qty = tier.budget / p.price;
                invested += tier.budget;
                quantity += qty;
                FillResult {
                    tier: i,
                    limit_price,
                    filled_at: Some(p.ts),
                    quantity: qty,
                }
            }
            None => FillResult {
                tier: i,
                limit_price,
                filled_at: None,
                quantity: Decimal::ZERO,
            },
        };
        fills.push(fill);
    }

    let average_fill_price = if quantity > Decimal::ZERO {
        Some(invested / quantity)
    } else {
        None
    };

    Ok(LadderOutcome {
        fills,
        invested,
        quantity,
        average_fill_price,
    })
}

/// Derive a discount ladder from the series itself: take the quantiles of
/// the adjacent drawdowns (percentage drop between consecutive points) as
/// the discount levels and split `total_budget` evenly across them.
///
/// Quantiles use the nearest-rank method over the sorted drawdowns, one per
/// `i/levels` for `i` in `1..=levels`, so deeper levels map to rarer,
/// larger dips.
///
/// # Errors
/// - `InvalidArg` when `levels` is zero or `total_budget` is not positive.
/// - `InsufficientData` when the series has fewer than two points or shows
///   no drawdowns at all.
pub fn suggest_tiers(
    series: &PriceSeries,
    levels: usize,
    total_budget: Decimal,
) -> Result<Vec<DiscountTier>, DipscanError> {
    if levels == 0 {
        return Err(DipscanError::InvalidArg(
            "levels must be at least 1".to_string(),
        ));
    }
    if total_budget <= Decimal::ZERO {
        return Err(DipscanError::InvalidArg(format!(
            "total budget must be positive, got {total_budget}"
        )));
    }
    if series.len() < 2 {
        return Err(DipscanError::insufficient(
            "tier suggestion needs at least two points",
        ));
    }

    let mut drops: Vec<Decimal> = series
        .points()
        .windows(2)
        .filter(|w| w[1].price < w[0].price)
        .map(|w| (w[0].price - w[1].price) / w[0].price * Decimal::ONE_HUNDRED)
        .collect();
    if drops.is_empty() {
        return Err(DipscanError::insufficient(
            "series shows no drawdowns to derive tiers from",
        ));
    }
    drops.sort_unstable();

    let budget = total_budget / Decimal::from(levels);
    let tiers = (1..=levels)
        .map(|i| {
            // Nearest-rank quantile at i/levels.
            let rank = (i * drops.len()).div_ceil(levels);
            DiscountTier {
                discount_pct: drops[rank.saturating_sub(1).min(drops.len() - 1)],
                budget,
            }
        })
        .collect();
    Ok(tiers)
}
