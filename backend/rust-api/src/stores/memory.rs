use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Error;
use crate::models::answer::CustomerAnswer;
use crate::models::suggestion::Suggestion;
use crate::models::{CustomerQuest, CustomerTask, Location, Quest, QuestItem};
use crate::stores::{AnswerArchive, LocationStore, ProgressStore, QuestCatalog};

/// In-memory implementation of every collaborator capability. Backs the
/// integration suites, which exercise the engine without a database.
#[derive(Default)]
pub struct MemoryStore {
    quests: RwLock<Vec<Quest>>,
    quest_items: RwLock<Vec<QuestItem>>,
    suggestions: RwLock<Vec<Suggestion>>,
    locations: RwLock<HashMap<String, Location>>,
    customer_quests: RwLock<HashMap<String, CustomerQuest>>,
    customer_tasks: RwLock<Vec<CustomerTask>>,
    customer_answers: RwLock<Vec<CustomerAnswer>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_quest(&self, quest: Quest) {
        self.quests.write().await.push(quest);
    }

    pub async fn add_quest_item(&self, item: QuestItem) {
        self.quest_items.write().await.push(item);
    }

    pub async fn add_suggestion(&self, suggestion: Suggestion) {
        self.suggestions.write().await.push(suggestion);
    }

    pub async fn add_location(&self, location: Location) {
        self.locations
            .write()
            .await
            .insert(location.id.clone(), location);
    }

    pub async fn add_customer_quest(&self, customer_quest: CustomerQuest) {
        self.customer_quests
            .write()
            .await
            .insert(customer_quest.id.clone(), customer_quest);
    }

    pub async fn archived_answers(&self) -> Vec<CustomerAnswer> {
        self.customer_answers.read().await.clone()
    }

    pub async fn tasks(&self) -> Vec<CustomerTask> {
        self.customer_tasks.read().await.clone()
    }
}

#[async_trait]
impl QuestCatalog for MemoryStore {
    async fn get_quest(&self, quest_id: &str) -> Result<Quest, Error> {
        self.quests
            .read()
            .await
            .iter()
            .find(|q| q.id == quest_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Quest".to_string()))
    }

    async fn list_quest_items(&self, quest_id: &str) -> Result<Vec<QuestItem>, Error> {
        Ok(self
            .quest_items
            .read()
            .await
            .iter()
            .filter(|i| i.quest_id == quest_id)
            .cloned()
            .collect())
    }

    async fn get_quest_item(&self, quest_item_id: &str) -> Result<QuestItem, Error> {
        self.quest_items
            .read()
            .await
            .iter()
            .find(|i| i.id == quest_item_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("QuestItem".to_string()))
    }

    async fn suggestions_for_item(&self, quest_item_id: &str) -> Result<Vec<String>, Error> {
        Ok(self
            .suggestions
            .read()
            .await
            .iter()
            .filter(|s| s.quest_item_id == quest_item_id)
            .map(|s| s.content.clone())
            .collect())
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn get_location(&self, location_id: &str) -> Result<Location, Error> {
        self.locations
            .read()
            .await
            .get(location_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Location".to_string()))
    }
}

#[async_trait]
impl AnswerArchive for MemoryStore {
    async fn append(&self, answer: CustomerAnswer) -> Result<String, Error> {
        let id = answer.id.clone();
        self.customer_answers.write().await.push(answer);
        Ok(id)
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn customer_quest(&self, customer_quest_id: &str) -> Result<CustomerQuest, Error> {
        self.customer_quests
            .read()
            .await
            .get(customer_quest_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("CustomerQuest".to_string()))
    }

    async fn insert_task(&self, task: &CustomerTask) -> Result<(), Error> {
        self.customer_tasks.write().await.push(task.clone());
        Ok(())
    }

    async fn update_task(&self, task: &CustomerTask) -> Result<(), Error> {
        let mut tasks = self.customer_tasks.write().await;
        let Some(stored) = tasks.iter_mut().find(|t| t.id == task.id) else {
            return Err(Error::NotFound("CustomerTask".to_string()));
        };
        *stored = task.clone();
        Ok(())
    }

    async fn set_current_task(&self, customer_quest_id: &str, task_id: &str) -> Result<(), Error> {
        let mut customer_quests = self.customer_quests.write().await;
        let Some(customer_quest) = customer_quests.get_mut(customer_quest_id) else {
            return Err(Error::NotFound("CustomerQuest".to_string()));
        };
        customer_quest.current_task_id = Some(task_id.to_string());
        Ok(())
    }

    async fn current_task(&self, customer_quest_id: &str) -> Result<Option<CustomerTask>, Error> {
        let customer_quest = self.customer_quest(customer_quest_id).await?;
        let Some(task_id) = customer_quest.current_task_id else {
            return Ok(None);
        };
        Ok(self
            .customer_tasks
            .read()
            .await
            .iter()
            .find(|t| t.id == task_id)
            .cloned())
    }

    async fn task_for_item(
        &self,
        customer_quest_id: &str,
        quest_item_id: &str,
    ) -> Result<Option<CustomerTask>, Error> {
        Ok(self
            .customer_tasks
            .read()
            .await
            .iter()
            .filter(|t| t.customer_quest_id == customer_quest_id && t.quest_item_id == quest_item_id)
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn last_finished_task(
        &self,
        customer_quest_id: &str,
    ) -> Result<Option<CustomerTask>, Error> {
        Ok(self
            .customer_tasks
            .read()
            .await
            .iter()
            .filter(|t| t.customer_quest_id == customer_quest_id && t.is_finished)
            .max_by_key(|t| t.created_at)
            .cloned())
    }

    async fn distinct_item_count(&self, customer_quest_id: &str) -> Result<u64, Error> {
        let tasks = self.customer_tasks.read().await;
        let mut seen: Vec<&str> = tasks
            .iter()
            .filter(|t| t.customer_quest_id == customer_quest_id)
            .map(|t| t.quest_item_id.as_str())
            .collect();
        seen.sort_unstable();
        seen.dedup();
        Ok(seen.len() as u64)
    }

    async fn set_final_point(
        &self,
        customer_quest_id: &str,
        final_point: f32,
    ) -> Result<(), Error> {
        let mut customer_quests = self.customer_quests.write().await;
        let Some(customer_quest) = customer_quests.get_mut(customer_quest_id) else {
            return Err(Error::NotFound("CustomerQuest".to_string()));
        };
        customer_quest.final_point = Some(final_point);
        Ok(())
    }
}
