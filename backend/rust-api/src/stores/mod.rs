use async_trait::async_trait;

use crate::error::Error;
use crate::models::answer::CustomerAnswer;
use crate::models::{CustomerQuest, CustomerTask, Location, Quest, QuestItem};

pub mod memory;
pub mod mongo;

/// Ordered quest-item chains per quest, plus per-item suggestion content.
#[async_trait]
pub trait QuestCatalog: Send + Sync {
    async fn get_quest(&self, quest_id: &str) -> Result<Quest, Error>;

    /// All items of a quest in insertion order, soft-deleted ones included.
    async fn list_quest_items(&self, quest_id: &str) -> Result<Vec<QuestItem>, Error>;

    async fn get_quest_item(&self, quest_item_id: &str) -> Result<QuestItem, Error>;

    async fn suggestions_for_item(&self, quest_item_id: &str) -> Result<Vec<String>, Error>;
}

/// Coordinates and address for a quest item.
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn get_location(&self, location_id: &str) -> Result<Location, Error>;
}

/// Durable record of every answer attempt. Records are append-only.
#[async_trait]
pub trait AnswerArchive: Send + Sync {
    async fn append(&self, answer: CustomerAnswer) -> Result<String, Error>;
}

/// The engine's own state: enrollments and task progress records.
///
/// The current task of a customer quest is resolved through the explicit
/// `current_task_id` pointer; callers serialize writes per customer quest.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn customer_quest(&self, customer_quest_id: &str) -> Result<CustomerQuest, Error>;

    async fn insert_task(&self, task: &CustomerTask) -> Result<(), Error>;

    async fn update_task(&self, task: &CustomerTask) -> Result<(), Error>;

    async fn set_current_task(&self, customer_quest_id: &str, task_id: &str) -> Result<(), Error>;

    /// The task the `current_task_id` pointer names, if any.
    async fn current_task(&self, customer_quest_id: &str) -> Result<Option<CustomerTask>, Error>;

    /// Most recently created task for the given quest item.
    async fn task_for_item(
        &self,
        customer_quest_id: &str,
        quest_item_id: &str,
    ) -> Result<Option<CustomerTask>, Error>;

    /// Most recently created finished task across the whole customer quest.
    async fn last_finished_task(
        &self,
        customer_quest_id: &str,
    ) -> Result<Option<CustomerTask>, Error>;

    /// Number of distinct quest items the customer has tasks for.
    async fn distinct_item_count(&self, customer_quest_id: &str) -> Result<u64, Error>;

    async fn set_final_point(&self, customer_quest_id: &str, final_point: f32)
        -> Result<(), Error>;
}
