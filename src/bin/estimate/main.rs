//! One-shot estimate - reads a property JSON document, prints the estimate.
//!
//! Usage: estimate [FILE]   (reads stdin when FILE is absent or "-")

use anyhow::{Context, Result};
use immo_estimate::config::AppConfig;
use immo_estimate::estimation::{EstimateRequest, EstimationService};
use std::env;
use std::fs;
use std::io::{self, Read};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let config = AppConfig::from_env()?;
    let service = EstimationService::from_config(&config)?;

    let input = read_input(env::args().nth(1).as_deref())?;
    let request: EstimateRequest =
        serde_json::from_str(&input).context("Input is not a valid property document")?;

    let submission = match service.submit_tracked(&request).await {
        Ok(submission) => submission,
        Err(e) => {
            for field in &e.errors {
                error!("✗ {}", field);
            }
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&submission.estimate)?);

    // Don't exit before the operator notification is out
    let outcome = submission.notification.wait().await;
    info!("Notification: {:?}", outcome);

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
        }
    }
}
