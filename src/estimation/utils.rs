//! Utility functions for common operations

use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

/// Build the HTTP client used for outbound lookups
pub fn http_client(timeout: Duration, user_agent: &str) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Format a free-text search address from its components,
/// skipping blank parts and ending with the country qualifier
pub fn format_search_address(
    street_address: &str,
    municipality: Option<&str>,
    country: &str,
) -> String {
    let mut parts = Vec::new();

    if !street_address.trim().is_empty() {
        parts.push(street_address.trim());
    }

    if let Some(m) = municipality {
        if !m.trim().is_empty() {
            parts.push(m.trim());
        }
    }

    if !country.trim().is_empty() {
        parts.push(country.trim());
    }

    parts.join(", ")
}
