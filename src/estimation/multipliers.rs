//! Multiplier engine - dimensionless factors derived from property attributes.
//! Pure functions - no side effects, no failure modes.

use crate::estimation::tables::PricingTables;
use crate::estimation::types::{PropertyDescriptor, PropertyKind};

/// Depreciation per year of age
pub const AGE_DEPRECIATION_RATE: f64 = 0.005;
/// Maximum 30% depreciation due to age
pub const AGE_DEPRECIATION_FLOOR: f64 = 0.7;
pub const BALCONY_BONUS: f64 = 0.05;
pub const TERRACE_BONUS: f64 = 0.08;
pub const LAND_MULTIPLIER: f64 = 0.8;

/// The five independent factors applied on top of baseline × area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub region: f64,
    pub category: f64,
    pub view: f64,
    pub exterior: f64,
    /// None for land, where age is not applied
    pub age_depreciation: Option<f64>,
}

/// Compute every multiplier for a descriptor
pub fn compute(
    descriptor: &PropertyDescriptor,
    tables: &PricingTables,
    current_year: i32,
) -> Multipliers {
    Multipliers {
        region: tables.region_multiplier(descriptor.region),
        category: category_multiplier(&descriptor.kind),
        view: tables.view_multiplier(descriptor.view),
        exterior: exterior_multiplier(descriptor.has_balcony, descriptor.has_terrace),
        age_depreciation: descriptor
            .kind
            .dwelling()
            .map(|d| age_depreciation(d.year_built, current_year)),
    }
}

/// Formula: max(0.7, 1 − 0.005 × age)
pub fn age_depreciation(year_built: i32, current_year: i32) -> f64 {
    let age = f64::from(current_year - year_built);
    (1.0 - age * AGE_DEPRECIATION_RATE).max(AGE_DEPRECIATION_FLOOR)
}

/// Formula: 1 + 0.05 × balcony + 0.08 × terrace
pub fn exterior_multiplier(has_balcony: bool, has_terrace: bool) -> f64 {
    let balcony = if has_balcony { BALCONY_BONUS } else { 0.0 };
    let terrace = if has_terrace { TERRACE_BONUS } else { 0.0 };
    1.0 + balcony + terrace
}

pub fn category_multiplier(kind: &PropertyKind) -> f64 {
    match kind {
        // Bonus per room
        PropertyKind::Apartment { dwelling } => 1.0 + dwelling.room_count * 0.05,
        // Bonus per floor
        PropertyKind::House { floor_count, .. } => {
            1.2 + floor_count.map_or(0.0, |f| f64::from(f) * 0.05)
        }
        // Bonus per bathroom
        PropertyKind::Villa { dwelling, .. } => 1.4 + f64::from(dwelling.bathroom_count) * 0.05,
        PropertyKind::MultiUnitBuilding {
            unit_count,
            avg_unit_room_count,
            ..
        } => 1.6 + f64::from(*unit_count) * 0.1 + avg_unit_room_count * 0.05,
        PropertyKind::Land => LAND_MULTIPLIER,
    }
}
