use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub mod answer;
pub mod event;
pub mod suggestion;

/// A tour composed of ordered stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub status: LifecycleStatus,
}

/// One stop/question within a quest.
///
/// `predecessor_id` is the singly-linked chain field: it names the item this
/// one follows, and `None` marks the chain head. The successor of item X is
/// whichever item carries `predecessor_id == Some(X.id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub quest_id: String,
    pub predecessor_id: Option<String>,
    pub location_id: String,
    pub right_answer: String,
    pub status: LifecycleStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleStatus {
    Active,
    Deleted,
}

/// A customer's enrollment in one quest. Immutable after creation except the
/// final score and the current-task pointer.
///
/// `current_task_id` replaces the legacy "most recently inserted row wins"
/// convention with an explicit pointer, updated inside the same locked scope
/// as the task write it refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerQuest {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_id: String,
    pub quest_id: String,
    pub begin_point: f32,
    pub final_point: Option<f32>,
    pub current_task_id: Option<String>,
}

/// Progress record of a customer against one quest item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerTask {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_quest_id: String,
    pub quest_item_id: String,
    pub current_point: f32,
    pub is_finished: bool,
    pub status: TaskStatus,
    pub wrong_answer_count: u32,
    pub suggestion_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Progress,
    Finished,
}

impl CustomerTask {
    /// Fresh task at `quest_item_id` carrying `current_point` forward.
    pub fn started(customer_quest_id: &str, quest_item_id: &str, current_point: f32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_quest_id: customer_quest_id.to_string(),
            quest_item_id: quest_item_id.to_string(),
            current_point,
            is_finished: false,
            status: TaskStatus::Progress,
            wrong_answer_count: 0,
            suggestion_count: 0,
            created_at: Utc::now(),
        }
    }
}

/// Coordinates plus address for a quest item, served by the Location Store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "_id")]
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLong {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLong {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<&Location> for LatLong {
    fn from(location: &Location) -> Self {
        Self {
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

/// The CustomerTask projection returned by every progression operation and
/// carried inside progression events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerTaskView {
    pub id: String,
    pub current_point: f32,
    pub status: TaskStatus,
    pub quest_item_id: String,
    pub customer_quest_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CustomerTask> for CustomerTaskView {
    fn from(task: &CustomerTask) -> Self {
        Self {
            id: task.id.clone(),
            current_point: task.current_point,
            status: task.status,
            quest_item_id: task.quest_item_id.clone(),
            customer_quest_id: task.customer_quest_id.clone(),
            created_at: task.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct StartQuestRequest {
    #[validate(length(min = 1))]
    pub quest_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdvanceRequest {
    #[validate(length(min = 1))]
    pub quest_id: String,
}

#[derive(Debug, Serialize)]
pub struct QuestCompletionResponse {
    pub complete: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GeofenceQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
pub struct GeofenceResponse {
    pub within_range: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_serializes_with_legacy_labels() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Progress).unwrap(),
            "\"Progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Finished).unwrap(),
            "\"Finished\""
        );
    }

    #[test]
    fn started_task_has_zeroed_counters() {
        let task = CustomerTask::started("cq-1", "item-1", 1000.0);
        assert_eq!(task.wrong_answer_count, 0);
        assert_eq!(task.suggestion_count, 0);
        assert_eq!(task.status, TaskStatus::Progress);
        assert!(!task.is_finished);
    }

    #[test]
    fn geofence_query_rejects_out_of_range_latitude() {
        let query = GeofenceQuery {
            latitude: 91.0,
            longitude: 10.0,
        };
        assert!(query.validate().is_err());
    }
}
