use serde::{Deserialize, Serialize};

use super::CustomerTaskView;

/// A hint attached to a quest item, revealed at a fixed point cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "_id")]
    pub id: String,
    pub quest_item_id: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct RequestSuggestionResponse {
    /// Joined suggestion content for the current quest item, when any exists.
    pub suggestion: Option<String>,
    pub task: CustomerTaskView,
}
