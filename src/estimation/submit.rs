//! Submission orchestrator - the single entry point of the estimation core.
//!
//! validate → resolve baseline → multipliers → compose → notify.
//! Only a ValidationError ever reaches the caller; geocoding and
//! notification failures are absorbed along the way.

use crate::config::{AppConfig, NotificationConfig};
use crate::error::ValidationError;
use crate::estimation::compose::compose;
use crate::estimation::geocode::{DisabledGeocoder, Geocoder, NominatimGeocoder};
use crate::estimation::multipliers;
use crate::estimation::notify::{
    dispatch, EstimateNotification, LogNotifier, NotificationHandle, Notifier,
};
use crate::estimation::resolve::BaselineResolver;
use crate::estimation::tables::PricingTables;
use crate::estimation::types::{EstimateRequest, PriceEstimate};
use crate::estimation::validate::validate;
use anyhow::Result;
use chrono::{Datelike, Local};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// A processed submission
pub struct Submission {
    pub id: Uuid,
    pub estimate: PriceEstimate,
    /// Await to make sure the operator email went out
    pub notification: NotificationHandle,
}

pub struct EstimationService {
    resolver: BaselineResolver,
    geocoder: Arc<dyn Geocoder>,
    tables: Arc<PricingTables>,
    notifier: Arc<dyn Notifier>,
    notification: NotificationConfig,
    country: String,
    /// Fixed calendar year, tests only need this
    year_override: Option<i32>,
}

impl EstimationService {
    pub fn new(
        config: &AppConfig,
        geocoder: Arc<dyn Geocoder>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tables = Arc::new(config.pricing.clone());
        let resolver = BaselineResolver::new(
            geocoder.clone(),
            tables.clone(),
            Duration::from_secs(config.geocoding.timeout_secs),
            config.geocoding.country.clone(),
        );

        Self {
            resolver,
            geocoder,
            tables,
            notifier,
            notification: config.notification.clone(),
            country: config.geocoding.country.clone(),
            year_override: None,
        }
    }

    /// Production wiring: Nominatim (unless disabled) and the log-only notifier
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let geocoder: Arc<dyn Geocoder> = if config.geocoding.enabled {
            Arc::new(NominatimGeocoder::new(&config.geocoding)?)
        } else {
            info!("Geocoding disabled, estimates will use fallback baselines");
            Arc::new(DisabledGeocoder)
        };

        Ok(Self::new(config, geocoder, Arc::new(LogNotifier)))
    }

    pub fn with_current_year(mut self, year: i32) -> Self {
        self.year_override = Some(year);
        self
    }

    pub fn current_year(&self) -> i32 {
        self.year_override.unwrap_or_else(|| Local::now().year())
    }

    pub fn geocoder(&self) -> &dyn Geocoder {
        self.geocoder.as_ref()
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Estimate a property; the operator notification runs detached
    pub async fn submit(&self, req: &EstimateRequest) -> Result<PriceEstimate, ValidationError> {
        self.submit_tracked(req).await.map(|s| s.estimate)
    }

    /// Same as `submit`, keeping a handle on the notification
    pub async fn submit_tracked(&self, req: &EstimateRequest) -> Result<Submission, ValidationError> {
        let id = Uuid::new_v4();
        let span = info_span!("submission", %id);

        async move {
            let current_year = self.current_year();
            let descriptor = validate(req, current_year)?;

            info!(
                "Estimating {} in {} ({}), {} m²",
                descriptor.category(),
                descriptor.municipality,
                descriptor.region,
                descriptor.area
            );

            // Step 1: Regional baseline (the only network call)
            let baseline = self.resolver.resolve(&descriptor).await;

            // Step 2: Multipliers
            let multipliers = multipliers::compute(&descriptor, &self.tables, current_year);
            debug!("Multipliers: {:?}", multipliers);

            // Step 3: Compose
            let estimate = compose(&descriptor, baseline, &multipliers);
            info!(
                "Estimate {} CHF ({} - {}), {} CHF/m², baseline {:?}",
                estimate.base_price,
                estimate.min_price,
                estimate.max_price,
                estimate.price_per_area,
                estimate.baseline_source
            );

            // Step 4: Notify the operator
            let notification = dispatch(
                self.notifier.clone(),
                EstimateNotification {
                    submission_id: id,
                    recipient: self.notification.recipient.clone(),
                    subject: self.notification.subject.clone(),
                    property_descriptor: descriptor,
                    estimated_value: estimate.base_price,
                },
            );

            Ok::<_, ValidationError>(Submission {
                id,
                estimate,
                notification,
            })
        }
        .instrument(span)
        .await
    }
}
