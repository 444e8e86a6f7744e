//! Geocoding - address search against Nominatim (OpenStreetMap).
//!
//! API: `https://nominatim.openstreetmap.org/search`
//! Auth: None required, a User-Agent is mandatory.
//! Rate limit: 1 request/second on the public instance, unmanaged here.

use crate::config::GeocodingConfig;
use crate::error::GeocodeError;
use crate::estimation::utils::{format_search_address, http_client};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Structured address parts of a match. Only the locality fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressDetails {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub municipality: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// One result of an address search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub address: AddressDetails,
}

impl GeocodeMatch {
    /// Most specific locality name available
    pub fn neighborhood(&self) -> Option<&str> {
        let a = &self.address;
        [
            &a.neighbourhood,
            &a.suburb,
            &a.municipality,
            &a.village,
            &a.town,
            &a.city,
        ]
        .into_iter()
        .find_map(|part| part.as_deref())
    }
}

/// Abstraction over the address-search service
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Free-text search. An empty Vec means the address is unknown.
    async fn search(&self, address: &str) -> Result<Vec<GeocodeMatch>, GeocodeError>;
}

/// Nominatim-backed geocoder
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
    country_code: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let http = http_client(Duration::from_secs(config.timeout_secs), &config.user_agent)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            country_code: config.country_code.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, address: &str) -> Result<Vec<GeocodeMatch>, GeocodeError> {
        debug!("Geocoding '{}'", address);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("format", "json"),
                ("q", address),
                ("countrycodes", self.country_code.as_str()),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let body = response.text().await?;
        let matches: Vec<GeocodeMatch> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Decode(e.to_string()))?;

        debug!("Geocoder returned {} match(es) for '{}'", matches.len(), address);
        Ok(matches)
    }
}

/// Stand-in used when geocoding is switched off in config.
/// Every lookup fails, so every estimate takes the static fallback.
pub struct DisabledGeocoder;

#[async_trait]
impl Geocoder for DisabledGeocoder {
    async fn search(&self, _address: &str) -> Result<Vec<GeocodeMatch>, GeocodeError> {
        Err(GeocodeError::Disabled)
    }
}

/// Check whether an address exists. Never fails: lookup errors read as "not found".
pub async fn lookup_address(
    geocoder: &dyn Geocoder,
    address: &str,
    country: &str,
) -> Option<GeocodeMatch> {
    let query = format_search_address(address, None, country);

    match geocoder.search(&query).await {
        Ok(matches) => matches.into_iter().next(),
        Err(e) => {
            warn!("Address lookup failed for '{}': {}", query, e);
            None
        }
    }
}
