//! Distance-based presence checks against quest item locations.

use std::sync::Arc;

use crate::error::Error;
use crate::metrics::ORACLE_REQUESTS_TOTAL;
use crate::models::{LatLong, Location};
use crate::services::distance_oracle::DistanceOracle;
use crate::services::quest_item_chain;
use crate::stores::{LocationStore, ProgressStore, QuestCatalog};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

/// Customers must be closer than this to a target location to pass a
/// geofence check.
pub const DISTANCE_THRESHOLD_METERS: f64 = 500.0;

/// Geofence checks are read-only and run without the per-customer-quest
/// lock; the oracle call never executes inside a locked scope.
pub struct GeofenceService {
    catalog: Arc<dyn QuestCatalog>,
    locations: Arc<dyn LocationStore>,
    progress: Arc<dyn ProgressStore>,
    oracle: Arc<dyn DistanceOracle>,
}

impl GeofenceService {
    pub fn new(
        catalog: Arc<dyn QuestCatalog>,
        locations: Arc<dyn LocationStore>,
        progress: Arc<dyn ProgressStore>,
        oracle: Arc<dyn DistanceOracle>,
    ) -> Self {
        Self {
            catalog,
            locations,
            progress,
            oracle,
        }
    }

    /// Travel distance in meters, retried at most once with backoff. Only
    /// this idempotent read is ever retried; scoring mutations never are.
    pub async fn travel_distance(
        &self,
        origin: LatLong,
        destination: LatLong,
    ) -> Result<f64, Error> {
        let result = retry_async_with_config(RetryConfig::oracle(), || async {
            self.oracle.travel_distance(origin, destination).await
        })
        .await;

        let status = if result.is_ok() { "ok" } else { "error" };
        ORACLE_REQUESTS_TOTAL.with_label_values(&[status]).inc();
        result
    }

    pub async fn is_within_range(
        &self,
        origin: LatLong,
        destination: LatLong,
    ) -> Result<bool, Error> {
        let distance = self.travel_distance(origin, destination).await?;
        Ok(distance < DISTANCE_THRESHOLD_METERS)
    }

    /// Location of the quest item the customer is currently working on.
    pub async fn current_item_location(&self, customer_quest_id: &str) -> Result<Location, Error> {
        let task = self
            .progress
            .current_task(customer_quest_id)
            .await?
            .ok_or_else(|| Error::NotFound("CustomerTask".to_string()))?;
        let item = self.catalog.get_quest_item(&task.quest_item_id).await?;
        self.locations.get_location(&item.location_id).await
    }

    /// Is the customer close enough to the quest item they are working on?
    pub async fn is_customer_at_current_item(
        &self,
        customer_quest_id: &str,
        position: LatLong,
    ) -> Result<bool, Error> {
        let location = self.current_item_location(customer_quest_id).await?;
        self.is_within_range(LatLong::from(&location), position)
            .await
    }

    /// Is the customer close enough to the quest's head item to start it?
    pub async fn is_customer_at_quest_start(
        &self,
        quest_id: &str,
        position: LatLong,
    ) -> Result<bool, Error> {
        let items = self.catalog.list_quest_items(quest_id).await?;
        let head = quest_item_chain::head_item(&items)?;
        let location = self.locations.get_location(&head.location_id).await?;
        self.is_within_range(LatLong::from(&location), position)
            .await
    }
}
