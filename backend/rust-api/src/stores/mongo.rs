use anyhow::Context;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use crate::error::Error;
use crate::models::answer::CustomerAnswer;
use crate::models::suggestion::Suggestion;
use crate::models::{CustomerQuest, CustomerTask, Location, Quest, QuestItem};
use crate::stores::{AnswerArchive, LocationStore, ProgressStore, QuestCatalog};

/// MongoDB-backed implementation of every collaborator capability. The
/// surrounding CRUD layer owns the catalog/location collections; this store
/// only reads them. Progress and answer collections are owned here.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn quests(&self) -> Collection<Quest> {
        self.db.collection("quests")
    }

    fn quest_items(&self) -> Collection<QuestItem> {
        self.db.collection("quest_items")
    }

    fn suggestions(&self) -> Collection<Suggestion> {
        self.db.collection("suggestions")
    }

    fn locations(&self) -> Collection<Location> {
        self.db.collection("locations")
    }

    fn customer_quests(&self) -> Collection<CustomerQuest> {
        self.db.collection("customer_quests")
    }

    fn customer_tasks(&self) -> Collection<CustomerTask> {
        self.db.collection("customer_tasks")
    }

    fn customer_answers(&self) -> Collection<CustomerAnswer> {
        self.db.collection("customer_answers")
    }
}

#[async_trait]
impl QuestCatalog for MongoStore {
    async fn get_quest(&self, quest_id: &str) -> Result<Quest, Error> {
        self.quests()
            .find_one(doc! { "_id": quest_id })
            .await
            .context("failed to query quests collection")?
            .ok_or_else(|| Error::NotFound("Quest".to_string()))
    }

    async fn list_quest_items(&self, quest_id: &str) -> Result<Vec<QuestItem>, Error> {
        // Chain traversal depends on insertion order; the catalog collection
        // is append-only, so natural order is sufficient.
        let items = self
            .quest_items()
            .find(doc! { "quest_id": quest_id })
            .await
            .context("failed to query quest_items collection")?
            .try_collect()
            .await
            .context("failed to read quest_items cursor")?;
        Ok(items)
    }

    async fn get_quest_item(&self, quest_item_id: &str) -> Result<QuestItem, Error> {
        self.quest_items()
            .find_one(doc! { "_id": quest_item_id })
            .await
            .context("failed to query quest_items collection")?
            .ok_or_else(|| Error::NotFound("QuestItem".to_string()))
    }

    async fn suggestions_for_item(&self, quest_item_id: &str) -> Result<Vec<String>, Error> {
        let suggestions: Vec<Suggestion> = self
            .suggestions()
            .find(doc! { "quest_item_id": quest_item_id })
            .await
            .context("failed to query suggestions collection")?
            .try_collect()
            .await
            .context("failed to read suggestions cursor")?;
        Ok(suggestions.into_iter().map(|s| s.content).collect())
    }
}

#[async_trait]
impl LocationStore for MongoStore {
    async fn get_location(&self, location_id: &str) -> Result<Location, Error> {
        self.locations()
            .find_one(doc! { "_id": location_id })
            .await
            .context("failed to query locations collection")?
            .ok_or_else(|| Error::NotFound("Location".to_string()))
    }
}

#[async_trait]
impl AnswerArchive for MongoStore {
    async fn append(&self, answer: CustomerAnswer) -> Result<String, Error> {
        let id = answer.id.clone();
        self.customer_answers()
            .insert_one(&answer)
            .await
            .context("failed to archive customer answer")?;
        Ok(id)
    }
}

#[async_trait]
impl ProgressStore for MongoStore {
    async fn customer_quest(&self, customer_quest_id: &str) -> Result<CustomerQuest, Error> {
        self.customer_quests()
            .find_one(doc! { "_id": customer_quest_id })
            .await
            .context("failed to query customer_quests collection")?
            .ok_or_else(|| Error::NotFound("CustomerQuest".to_string()))
    }

    async fn insert_task(&self, task: &CustomerTask) -> Result<(), Error> {
        self.customer_tasks()
            .insert_one(task)
            .await
            .context("failed to insert customer task")?;
        Ok(())
    }

    async fn update_task(&self, task: &CustomerTask) -> Result<(), Error> {
        let result = self
            .customer_tasks()
            .replace_one(doc! { "_id": &task.id }, task)
            .await
            .context("failed to update customer task")?;
        if result.matched_count == 0 {
            return Err(Error::NotFound("CustomerTask".to_string()));
        }
        Ok(())
    }

    async fn set_current_task(&self, customer_quest_id: &str, task_id: &str) -> Result<(), Error> {
        let result = self
            .customer_quests()
            .update_one(
                doc! { "_id": customer_quest_id },
                doc! { "$set": { "current_task_id": task_id } },
            )
            .await
            .context("failed to update current task pointer")?;
        if result.matched_count == 0 {
            return Err(Error::NotFound("CustomerQuest".to_string()));
        }
        Ok(())
    }

    async fn current_task(&self, customer_quest_id: &str) -> Result<Option<CustomerTask>, Error> {
        let customer_quest = self.customer_quest(customer_quest_id).await?;
        let Some(task_id) = customer_quest.current_task_id else {
            return Ok(None);
        };
        let task = self
            .customer_tasks()
            .find_one(doc! { "_id": task_id })
            .await
            .context("failed to query customer_tasks collection")?;
        Ok(task)
    }

    async fn task_for_item(
        &self,
        customer_quest_id: &str,
        quest_item_id: &str,
    ) -> Result<Option<CustomerTask>, Error> {
        let task = self
            .customer_tasks()
            .find_one(doc! {
                "customer_quest_id": customer_quest_id,
                "quest_item_id": quest_item_id,
            })
            .sort(doc! { "created_at": -1 })
            .await
            .context("failed to query customer_tasks collection")?;
        Ok(task)
    }

    async fn last_finished_task(
        &self,
        customer_quest_id: &str,
    ) -> Result<Option<CustomerTask>, Error> {
        let task = self
            .customer_tasks()
            .find_one(doc! {
                "customer_quest_id": customer_quest_id,
                "is_finished": true,
            })
            .sort(doc! { "created_at": -1 })
            .await
            .context("failed to query customer_tasks collection")?;
        Ok(task)
    }

    async fn distinct_item_count(&self, customer_quest_id: &str) -> Result<u64, Error> {
        let items = self
            .customer_tasks()
            .distinct("quest_item_id", doc! { "customer_quest_id": customer_quest_id })
            .await
            .context("failed to count distinct quest items")?;
        Ok(items.len() as u64)
    }

    async fn set_final_point(
        &self,
        customer_quest_id: &str,
        final_point: f32,
    ) -> Result<(), Error> {
        let result = self
            .customer_quests()
            .update_one(
                doc! { "_id": customer_quest_id },
                doc! { "$set": { "final_point": f64::from(final_point) } },
            )
            .await
            .context("failed to record final point")?;
        if result.matched_count == 0 {
            return Err(Error::NotFound("CustomerQuest".to_string()));
        }
        Ok(())
    }
}
