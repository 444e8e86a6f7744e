//! Estimation module - validate, resolve, multiply, compose, notify

pub mod compose;
pub mod geocode;
pub mod multipliers;
pub mod notify;
pub mod resolve;
pub mod submit;
pub mod tables;
pub mod types;
pub mod utils;
pub mod validate;

pub use submit::{EstimationService, Submission};
pub use types::*;
