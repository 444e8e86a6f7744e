//! Regional price resolver - price-per-m² baseline for a property.
//!
//! Prefers the regional table once the address is confirmed by the
//! geocoder. Any lookup failure (transport, status, malformed body,
//! empty result, timeout) degrades to the static fallback
//! `global_baseline × region_multiplier`. Nothing is cached: every call
//! re-queries the geocoder.

use crate::error::GeocodeError;
use crate::estimation::geocode::{GeocodeMatch, Geocoder};
use crate::estimation::tables::PricingTables;
use crate::estimation::types::{Baseline, BaselineSource, PropertyDescriptor};
use crate::estimation::utils::format_search_address;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct BaselineResolver {
    geocoder: Arc<dyn Geocoder>,
    tables: Arc<PricingTables>,
    timeout: Duration,
    country: String,
}

impl BaselineResolver {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        tables: Arc<PricingTables>,
        timeout: Duration,
        country: impl Into<String>,
    ) -> Self {
        Self {
            geocoder,
            tables,
            timeout,
            country: country.into(),
        }
    }

    /// Resolve the baseline for a descriptor. Never fails.
    pub async fn resolve(&self, descriptor: &PropertyDescriptor) -> Baseline {
        match self.lookup(descriptor).await {
            Ok(location) => {
                let per_area = self
                    .tables
                    .regional_price(descriptor.region, &descriptor.municipality);

                debug!(
                    "Address confirmed as '{}', regional baseline {} CHF/m² ({} / {})",
                    location.display_name, per_area, descriptor.region, descriptor.municipality
                );

                Baseline {
                    per_area,
                    source: BaselineSource::Geocoded,
                }
            }
            Err(e) => {
                let per_area = self.tables.fallback_baseline(descriptor.region);

                warn!(
                    "Geocoding unavailable ({}), using fallback baseline {} CHF/m² for {}",
                    e, per_area, descriptor.region
                );

                Baseline {
                    per_area,
                    source: BaselineSource::Fallback,
                }
            }
        }
    }

    /// Single bounded attempt, first match wins
    async fn lookup(&self, descriptor: &PropertyDescriptor) -> Result<GeocodeMatch, GeocodeError> {
        let query = format_search_address(
            &descriptor.street_address,
            Some(&descriptor.municipality),
            &self.country,
        );

        let matches = tokio::time::timeout(self.timeout, self.geocoder.search(&query))
            .await
            .map_err(|_| GeocodeError::Timeout(self.timeout))??;

        matches
            .into_iter()
            .next()
            .ok_or(GeocodeError::NoMatch(query))
    }
}
