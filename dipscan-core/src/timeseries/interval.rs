//! Interval resolution for providers with fixed-size response windows.

use crate::types::{SamplingInterval, Span};

/// Resolve the coarsest sampling interval that respects the requested
/// granularity while keeping the point count for `span` under `max_points`.
///
/// Pure and deterministic: steps through the interval enumeration from the
/// requested cadence toward `D1`, stopping at the first interval whose point
/// count fits the budget. When even `D1` overflows the budget, `D1` is
/// returned anyway — a best-effort degrade with a known precision loss, not
/// an error, since no coarser cadence exists to fall back to.
///
/// Widening `max_points` never yields a coarser interval than a smaller
/// budget would for the same span.
#[must_use]
pub fn resolve(
    requested: SamplingInterval,
    span: Span,
    max_points: usize,
) -> SamplingInterval {
    let span_secs = span.seconds().max(0);
    let budget = i64::try_from(max_points).unwrap_or(i64::MAX);
    let mut interval = requested;
    loop {
        let points = span_secs / interval.duration_secs();
        if points <= budget {
            return interval;
        }
        match interval.next_coarser() {
            Some(coarser) => interval = coarser,
            None => return interval,
        }
    }
}
