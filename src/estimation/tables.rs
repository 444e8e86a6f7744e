//! Pricing tables - immutable configuration injected into the resolver
//! and the multiplier engine. Defaults are the 2024 Swiss market figures.

use crate::estimation::types::{Region, ViewType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Baselines for one canton: a canton-wide default plus per-municipality overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPrices {
    pub default: f64,
    #[serde(default)]
    pub municipalities: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTables {
    /// CHF per m², used by the static fallback
    pub global_baseline: f64,
    /// Baseline for cantons with no regional price table
    pub default_regional_price: f64,
    /// Keyed by canton name, missing cantons weigh 1.0
    pub region_multipliers: HashMap<String, f64>,
    /// Keyed by view identifier, missing views weigh 1.0
    pub view_multipliers: HashMap<String, f64>,
    pub regional_prices: HashMap<String, RegionalPrices>,
}

impl PricingTables {
    pub fn region_multiplier(&self, region: Region) -> f64 {
        self.region_multipliers
            .get(region.as_str())
            .copied()
            .unwrap_or(1.0)
    }

    pub fn view_multiplier(&self, view: Option<ViewType>) -> f64 {
        view.and_then(|v| self.view_multipliers.get(v.as_str()).copied())
            .unwrap_or(1.0)
    }

    /// table[region][municipality] → table[region].default → default_regional_price
    pub fn regional_price(&self, region: Region, municipality: &str) -> f64 {
        match self.regional_prices.get(region.as_str()) {
            Some(prices) => prices
                .municipalities
                .get(municipality.trim())
                .copied()
                .unwrap_or(prices.default),
            None => self.default_regional_price,
        }
    }

    /// Baseline used when the geocoding lookup fails
    pub fn fallback_baseline(&self, region: Region) -> f64 {
        self.global_baseline * self.region_multiplier(region)
    }
}

fn table(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

impl Default for PricingTables {
    fn default() -> Self {
        let region_multipliers = table(&[
            ("Genève", 1.8),
            ("Zürich", 1.7),
            ("Zoug", 1.6),
            ("Vaud", 1.5),
            ("Bâle-Ville", 1.4),
            ("Berne", 1.3),
            ("Lucerne", 1.25),
            ("Saint-Gall", 1.2),
            ("Tessin", 1.15),
        ]);

        let view_multipliers = table(&[
            ("lake", 1.3),
            ("mountains", 1.2),
            ("open", 1.15),
            ("city", 1.1),
            ("garden", 1.05),
            ("standard", 1.0),
        ]);

        let mut regional_prices = HashMap::new();
        regional_prices.insert(
            "Genève".to_string(),
            RegionalPrices {
                default: 12000.0,
                municipalities: table(&[
                    ("Genève-Ville", 15000.0),
                    ("Carouge", 13500.0),
                    ("Vernier", 11000.0),
                ]),
            },
        );
        regional_prices.insert(
            "Vaud".to_string(),
            RegionalPrices {
                default: 10000.0,
                municipalities: table(&[
                    ("Lausanne", 12000.0),
                    ("Montreux", 11500.0),
                    ("Nyon", 12500.0),
                ]),
            },
        );
        regional_prices.insert(
            "Zürich".to_string(),
            RegionalPrices {
                default: 11000.0,
                municipalities: table(&[
                    ("Zürich", 14000.0),
                    ("Winterthur", 11000.0),
                    ("Uster", 10500.0),
                ]),
            },
        );

        PricingTables {
            global_baseline: 8500.0,
            default_regional_price: 8500.0,
            region_multipliers,
            view_multipliers,
            regional_prices,
        }
    }
}
