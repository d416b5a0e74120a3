#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use tokio::sync::Mutex;

use cityquest_api::config::Config;
use cityquest_api::error::Error;
use cityquest_api::models::suggestion::Suggestion;
use cityquest_api::models::{
    CustomerQuest, LatLong, LifecycleStatus, Location, Quest, QuestItem,
};
use cityquest_api::services::distance_oracle::DistanceOracle;
use cityquest_api::stores::memory::MemoryStore;
use cityquest_api::{create_router, AppState};

pub const QUEST_ID: &str = "quest-1";
pub const CUSTOMER_QUEST_ID: &str = "cq-1";
pub const HEAD_ITEM_ID: &str = "item-a";
pub const DELETED_ITEM_ID: &str = "item-b";
pub const SECOND_ITEM_ID: &str = "item-c";
pub const HEAD_ANSWER: &str = "Paris";
pub const SECOND_ANSWER: &str = "Bitexco";
pub const BEGIN_POINT: f32 = 1000.0;

/// Scriptable distance oracle: tests choose the distance (or a failure)
/// returned to the geofence checks.
pub struct TestOracle {
    response: Mutex<Result<f64, String>>,
}

impl TestOracle {
    pub fn returning(meters: f64) -> Self {
        Self {
            response: Mutex::new(Ok(meters)),
        }
    }

    pub async fn set_distance(&self, meters: f64) {
        *self.response.lock().await = Ok(meters);
    }

    pub async fn set_unavailable(&self, reason: &str) {
        *self.response.lock().await = Err(reason.to_string());
    }
}

#[async_trait]
impl DistanceOracle for TestOracle {
    async fn travel_distance(&self, _: LatLong, _: LatLong) -> Result<f64, Error> {
        match &*self.response.lock().await {
            Ok(meters) => Ok(*meters),
            Err(reason) => Err(Error::OracleUnavailable(reason.clone())),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_database: "cityquest-test".to_string(),
        oracle_base_url: "http://localhost:0".to_string(),
        oracle_api_key: String::new(),
        oracle_timeout_secs: 1,
    }
}

/// App over in-memory collaborators, with a three-item quest seeded: an
/// Active head, a soft-deleted middle item and an Active tail.
pub async fn create_test_app() -> (Router, Arc<AppState>, Arc<MemoryStore>, Arc<TestOracle>) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let store = Arc::new(MemoryStore::new());
    let oracle = Arc::new(TestOracle::returning(100.0));
    seed_quest(&store).await;

    let state = Arc::new(AppState::with_collaborators(
        test_config(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        oracle.clone(),
    ));

    (create_router(state.clone()), state, store, oracle)
}

pub async fn seed_quest(store: &MemoryStore) {
    store
        .add_quest(Quest {
            id: QUEST_ID.to_string(),
            title: "Old Saigon walking tour".to_string(),
            status: LifecycleStatus::Active,
        })
        .await;

    store
        .add_quest_item(QuestItem {
            id: HEAD_ITEM_ID.to_string(),
            quest_id: QUEST_ID.to_string(),
            predecessor_id: None,
            location_id: "loc-a".to_string(),
            right_answer: HEAD_ANSWER.to_string(),
            status: LifecycleStatus::Active,
        })
        .await;
    store
        .add_quest_item(QuestItem {
            id: DELETED_ITEM_ID.to_string(),
            quest_id: QUEST_ID.to_string(),
            predecessor_id: Some(HEAD_ITEM_ID.to_string()),
            location_id: "loc-b".to_string(),
            right_answer: "retired stop".to_string(),
            status: LifecycleStatus::Deleted,
        })
        .await;
    store
        .add_quest_item(QuestItem {
            id: SECOND_ITEM_ID.to_string(),
            quest_id: QUEST_ID.to_string(),
            predecessor_id: Some(DELETED_ITEM_ID.to_string()),
            location_id: "loc-c".to_string(),
            right_answer: SECOND_ANSWER.to_string(),
            status: LifecycleStatus::Active,
        })
        .await;

    store
        .add_location(Location {
            id: "loc-a".to_string(),
            latitude: 10.7769,
            longitude: 106.7009,
            address: "Nguyen Hue Boulevard".to_string(),
        })
        .await;
    store
        .add_location(Location {
            id: "loc-c".to_string(),
            latitude: 10.7718,
            longitude: 106.7043,
            address: "Bitexco Financial Tower".to_string(),
        })
        .await;

    store
        .add_suggestion(Suggestion {
            id: "sug-1".to_string(),
            quest_item_id: HEAD_ITEM_ID.to_string(),
            content: "Look at the river".to_string(),
        })
        .await;
    store
        .add_suggestion(Suggestion {
            id: "sug-2".to_string(),
            quest_item_id: HEAD_ITEM_ID.to_string(),
            content: "Near the old post office".to_string(),
        })
        .await;

    store
        .add_customer_quest(CustomerQuest {
            id: CUSTOMER_QUEST_ID.to_string(),
            customer_id: "customer-1".to_string(),
            quest_id: QUEST_ID.to_string(),
            begin_point: BEGIN_POINT,
            final_point: None,
            current_task_id: None,
        })
        .await;
}

pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
