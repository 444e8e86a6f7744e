// Library module for testable functions

pub mod api;
pub mod config;
pub mod error;
pub mod estimation;

/// Round a price to the nearest whole thousand
/// Formula: round(value / 1000) × 1000, halves rounded up
pub fn round_to_thousand(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value / 1000.0).round() * 1000.0) as u64
}
