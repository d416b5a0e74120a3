use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::CustomerTaskView;

/// The reply text is compared exactly as submitted (lowercased, never
/// trimmed), so no whitespace normalization happens at the DTO layer.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1))]
    pub quest_item_id: String,
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub task: CustomerTaskView,
}

/// Immutable audit record of one submitted reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerAnswer {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_task_id: String,
    pub quest_item_id: String,
    pub note: AnswerNote,
    pub customer_reply: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerNote {
    WrongAnswer,
    CorrectAnswer,
}

impl CustomerAnswer {
    pub fn new(customer_task_id: &str, quest_item_id: &str, note: AnswerNote, reply: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_task_id: customer_task_id.to_string(),
            quest_item_id: quest_item_id.to_string(),
            note,
            customer_reply: reply.to_string(),
            created_at: Utc::now(),
        }
    }
}
