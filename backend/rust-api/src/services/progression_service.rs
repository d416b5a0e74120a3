//! The customer-task lifecycle: starting a quest, scoring answers, paying
//! for suggestions and advancing along the quest item chain.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::Error;
use crate::metrics::{ANSWERS_SUBMITTED_TOTAL, SUGGESTIONS_USED_TOTAL, TASKS_STARTED_TOTAL};
use crate::models::answer::{AnswerNote, CustomerAnswer, SubmitAnswerResponse};
use crate::models::event::ProgressionEvent;
use crate::models::suggestion::RequestSuggestionResponse;
use crate::models::{CustomerQuest, CustomerTask, CustomerTaskView, LifecycleStatus};
use crate::services::answer_checker::{self, AnswerOutcome};
use crate::services::notifier::EventBus;
use crate::services::quest_item_chain;
use crate::services::scoring_policy::{self, PolicyViolation};
use crate::stores::{AnswerArchive, ProgressStore, QuestCatalog};

/// Logical locks keyed by customer quest. Holding the lock makes every
/// read-check-write sequence on that customer's progress atomic; duplicate
/// network retries serialize here instead of double-penalizing.
#[derive(Default)]
pub struct CustomerQuestLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CustomerQuestLocks {
    pub async fn acquire(&self, customer_quest_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            locks
                .entry(customer_quest_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

pub struct ProgressionService {
    catalog: Arc<dyn QuestCatalog>,
    archive: Arc<dyn AnswerArchive>,
    progress: Arc<dyn ProgressStore>,
    events: EventBus,
    locks: CustomerQuestLocks,
}

impl ProgressionService {
    pub fn new(
        catalog: Arc<dyn QuestCatalog>,
        archive: Arc<dyn AnswerArchive>,
        progress: Arc<dyn ProgressStore>,
        events: EventBus,
    ) -> Self {
        Self {
            catalog,
            archive,
            progress,
            events,
            locks: CustomerQuestLocks::default(),
        }
    }

    pub async fn customer_quest(&self, customer_quest_id: &str) -> Result<CustomerQuest, Error> {
        self.progress.customer_quest(customer_quest_id).await
    }

    /// Creates the first task of an enrollment at the quest's head item,
    /// carrying the quest's begin point as the starting score.
    pub async fn start_quest(
        &self,
        customer_quest_id: &str,
        quest_id: &str,
    ) -> Result<CustomerTaskView, Error> {
        let _guard = self.locks.acquire(customer_quest_id).await;

        let customer_quest = self.progress.customer_quest(customer_quest_id).await?;
        let quest = self.catalog.get_quest(quest_id).await?;
        if quest.status == LifecycleStatus::Deleted {
            return Err(Error::NotFound("Quest".to_string()));
        }

        let items = self.catalog.list_quest_items(quest_id).await?;
        let head = quest_item_chain::head_item(&items)?;

        if self
            .progress
            .task_for_item(customer_quest_id, &head.id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyStarted);
        }

        let task = CustomerTask::started(customer_quest_id, &head.id, customer_quest.begin_point);
        self.progress.insert_task(&task).await?;
        self.progress
            .set_current_task(customer_quest_id, &task.id)
            .await?;

        TASKS_STARTED_TOTAL.inc();
        tracing::info!(
            "Customer quest {} started quest {} at item {}",
            customer_quest_id,
            quest_id,
            head.id
        );

        let view = CustomerTaskView::from(&task);
        self.events
            .publish(ProgressionEvent::CustomerTaskAdded(view.clone()));
        Ok(view)
    }

    /// Classifies the reply against the quest item's expected answer,
    /// applies the scoring outcome and archives the attempt.
    ///
    /// Past the wrong-answer ceiling the error carries the expected answer
    /// so the caller can reveal it; no further points are deducted and no
    /// progression event is published.
    pub async fn submit_answer(
        &self,
        customer_quest_id: &str,
        quest_item_id: &str,
        reply: &str,
    ) -> Result<SubmitAnswerResponse, Error> {
        let _guard = self.locks.acquire(customer_quest_id).await;

        let task = self
            .progress
            .task_for_item(customer_quest_id, quest_item_id)
            .await?
            .ok_or_else(|| Error::NotFound("CustomerTask".to_string()))?;
        let item = self.catalog.get_quest_item(quest_item_id).await?;

        let outcome = answer_checker::classify(&item.right_answer, reply);
        let correct = outcome == AnswerOutcome::Correct;
        ANSWERS_SUBMITTED_TOTAL
            .with_label_values(&[if correct { "true" } else { "false" }])
            .inc();

        let updated = match scoring_policy::apply_answer_outcome(task, outcome) {
            Ok(updated) => updated,
            Err(PolicyViolation::WrongAnswerLimitExceeded) => {
                return Err(Error::WrongAnswerLimitExceeded {
                    correct_answer: item.right_answer,
                });
            }
            Err(PolicyViolation::SuggestionLimitExceeded) => {
                // apply_answer_outcome only raises the wrong-answer ceiling.
                return Err(Error::Internal(anyhow::anyhow!(
                    "unexpected policy violation for answer outcome"
                )));
            }
        };
        self.progress.update_task(&updated).await?;

        let note = if correct {
            AnswerNote::CorrectAnswer
        } else {
            AnswerNote::WrongAnswer
        };
        self.archive
            .append(CustomerAnswer::new(&updated.id, quest_item_id, note, reply))
            .await?;

        if correct && self.is_quest_complete(customer_quest_id).await? {
            self.progress
                .set_final_point(customer_quest_id, updated.current_point)
                .await?;
            tracing::info!(
                "Customer quest {} completed with final point {}",
                customer_quest_id,
                updated.current_point
            );
        }

        let view = CustomerTaskView::from(&updated);
        self.events
            .publish(ProgressionEvent::CustomerTaskUpdated(view.clone()));
        Ok(SubmitAnswerResponse {
            correct,
            task: view,
        })
    }

    /// Deducts the suggestion cost from the current task and returns the
    /// item's suggestion content alongside the updated projection.
    pub async fn request_suggestion(
        &self,
        customer_quest_id: &str,
    ) -> Result<RequestSuggestionResponse, Error> {
        let _guard = self.locks.acquire(customer_quest_id).await;

        let task = self
            .progress
            .current_task(customer_quest_id)
            .await?
            .ok_or_else(|| Error::NotFound("CustomerTask".to_string()))?;

        let updated = scoring_policy::apply_suggestion_penalty(task)
            .map_err(|_| Error::SuggestionLimitExceeded)?;
        self.progress.update_task(&updated).await?;
        SUGGESTIONS_USED_TOTAL.inc();

        let suggestions = self
            .catalog
            .suggestions_for_item(&updated.quest_item_id)
            .await?;
        let suggestion = if suggestions.is_empty() {
            None
        } else {
            Some(suggestions.join(","))
        };

        let view = CustomerTaskView::from(&updated);
        self.events
            .publish(ProgressionEvent::CustomerTaskUpdated(view.clone()));
        Ok(RequestSuggestionResponse {
            suggestion,
            task: view,
        })
    }

    /// Moves the customer to the next Active item in the chain, carrying the
    /// score of the task they just finished.
    pub async fn advance_to_next(
        &self,
        quest_id: &str,
        customer_quest_id: &str,
    ) -> Result<CustomerTaskView, Error> {
        let _guard = self.locks.acquire(customer_quest_id).await;

        let finished = self
            .progress
            .last_finished_task(customer_quest_id)
            .await?
            .ok_or_else(|| Error::NotFound("CustomerTask".to_string()))?;

        let items = self.catalog.list_quest_items(quest_id).await?;
        let next = quest_item_chain::next_active_item(&finished.quest_item_id, &items)?;

        // A retried advance must not create a second task at the same item.
        if self
            .progress
            .task_for_item(customer_quest_id, &next.id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyStarted);
        }

        let task = CustomerTask::started(customer_quest_id, &next.id, finished.current_point);
        self.progress.insert_task(&task).await?;
        self.progress
            .set_current_task(customer_quest_id, &task.id)
            .await?;

        TASKS_STARTED_TOTAL.inc();
        tracing::info!(
            "Customer quest {} advanced to item {}",
            customer_quest_id,
            next.id
        );

        let view = CustomerTaskView::from(&task);
        self.events
            .publish(ProgressionEvent::CustomerTaskAdded(view.clone()));
        Ok(view)
    }

    /// True iff the customer has a task for every Active item of the quest.
    pub async fn is_quest_complete(&self, customer_quest_id: &str) -> Result<bool, Error> {
        let customer_quest = self.progress.customer_quest(customer_quest_id).await?;
        let items = self.catalog.list_quest_items(&customer_quest.quest_id).await?;
        let total = quest_item_chain::active_item_count(&items) as u64;
        let done = self.progress.distinct_item_count(customer_quest_id).await?;
        Ok(total > 0 && done == total)
    }
}
