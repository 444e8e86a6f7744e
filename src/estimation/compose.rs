//! Estimate composer - baseline × area × multipliers, then the ±10% range

use crate::estimation::multipliers::Multipliers;
use crate::estimation::types::{Baseline, PriceEstimate, PropertyDescriptor};
use crate::round_to_thousand;

/// Width of the price range around the point estimate
pub const RANGE_SPREAD: f64 = 0.1;

/// Unrounded composed price.
/// Multipliers are applied one after another: region, category, view,
/// exterior, then age (skipped for land).
pub fn raw_price(area: f64, baseline_per_area: f64, m: &Multipliers) -> f64 {
    let mut price = baseline_per_area * area;

    price *= m.region;
    price *= m.category;
    price *= m.view;
    price *= m.exterior;

    if let Some(age) = m.age_depreciation {
        price *= age;
    }

    price
}

/// Build the estimate. Area is guaranteed positive by validation.
pub fn compose(
    descriptor: &PropertyDescriptor,
    baseline: Baseline,
    multipliers: &Multipliers,
) -> PriceEstimate {
    let raw = raw_price(descriptor.area, baseline.per_area, multipliers);

    PriceEstimate {
        base_price: round_to_thousand(raw),
        // Range comes from the unrounded price, like price per area
        min_price: round_to_thousand(raw * (1.0 - RANGE_SPREAD)),
        max_price: round_to_thousand(raw * (1.0 + RANGE_SPREAD)),
        price_per_area: round_unit(raw / descriptor.area),
        regional_baseline_per_area: round_unit(baseline.per_area),
        baseline_source: baseline.source,
    }
}

fn round_unit(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round() as u64
}
