use serde::{Deserialize, Serialize};

use super::CustomerTaskView;

/// Progression events pushed to connected clients over the notification
/// channel. Publishes are fire-and-forget relative to the state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProgressionEvent {
    CustomerTaskAdded(CustomerTaskView),
    CustomerTaskUpdated(CustomerTaskView),
}

impl ProgressionEvent {
    pub fn to_sse_data(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            ProgressionEvent::CustomerTaskAdded(_) => "customer-task-added",
            ProgressionEvent::CustomerTaskUpdated(_) => "customer-task-updated",
        }
    }

    pub fn customer_quest_id(&self) -> &str {
        match self {
            ProgressionEvent::CustomerTaskAdded(task)
            | ProgressionEvent::CustomerTaskUpdated(task) => &task.customer_quest_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CustomerTask, TaskStatus};

    #[test]
    fn event_names_are_kebab_case() {
        let task = CustomerTask::started("cq-1", "item-1", 500.0);
        let view = (&task).into();
        let event = ProgressionEvent::CustomerTaskAdded(view);
        assert_eq!(event.event_name(), "customer-task-added");
        assert_eq!(event.customer_quest_id(), "cq-1");
    }

    #[test]
    fn sse_payload_carries_the_task_projection() {
        let mut task = CustomerTask::started("cq-2", "item-9", 850.0);
        task.status = TaskStatus::Finished;
        let event = ProgressionEvent::CustomerTaskUpdated((&task).into());

        let json: serde_json::Value = serde_json::from_str(&event.to_sse_data()).unwrap();
        assert_eq!(json["type"], "customer-task-updated");
        assert_eq!(json["quest_item_id"], "item-9");
        assert_eq!(json["status"], "Finished");
    }
}
