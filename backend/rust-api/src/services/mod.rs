use std::sync::Arc;

use mongodb::{Client as MongoClient, Database};

use crate::config::Config;
use crate::error::Error;
use crate::services::distance_oracle::{DistanceOracle, GoongDistanceOracle};
use crate::services::geofence_service::GeofenceService;
use crate::services::notifier::EventBus;
use crate::services::progression_service::ProgressionService;
use crate::stores::mongo::MongoStore;
use crate::stores::{AnswerArchive, LocationStore, ProgressStore, QuestCatalog};

pub mod answer_checker;
pub mod distance_oracle;
pub mod geofence_service;
pub mod notifier;
pub mod progression_service;
pub mod quest_item_chain;
pub mod scoring_policy;

pub struct AppState {
    pub config: Config,
    /// Present when backed by MongoDB; the health check pings it.
    pub mongo: Option<Database>,
    pub progression: ProgressionService,
    pub geofence: GeofenceService,
    pub events: EventBus,
}

impl AppState {
    /// Production wiring: every collaborator backed by MongoDB, the distance
    /// oracle by the Goong HTTP API.
    pub async fn new(config: Config, mongo_client: MongoClient) -> Result<Self, Error> {
        let db = mongo_client.database(&config.mongo_database);
        let store = Arc::new(MongoStore::new(db.clone()));
        let oracle = Arc::new(GoongDistanceOracle::new(&config)?);

        let mut state = Self::with_collaborators(
            config,
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            oracle,
        );
        state.mongo = Some(db);
        Ok(state)
    }

    /// Explicit wiring; the integration suites inject in-memory stores and a
    /// fake oracle here.
    pub fn with_collaborators(
        config: Config,
        catalog: Arc<dyn QuestCatalog>,
        locations: Arc<dyn LocationStore>,
        archive: Arc<dyn AnswerArchive>,
        progress: Arc<dyn ProgressStore>,
        oracle: Arc<dyn DistanceOracle>,
    ) -> Self {
        let events = EventBus::new();
        let progression = ProgressionService::new(
            catalog.clone(),
            archive,
            progress.clone(),
            events.clone(),
        );
        let geofence = GeofenceService::new(catalog, locations, progress, oracle);

        Self {
            config,
            mongo: None,
            progression,
            geofence,
            events,
        }
    }
}
