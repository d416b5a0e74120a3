//! Duplicate network retries must never double-penalize: the engine
//! serializes read-then-penalize sequences per customer quest.

mod common;

use std::sync::Arc;

use cityquest_api::error::Error;
use cityquest_api::stores::memory::MemoryStore;
use cityquest_api::AppState;

async fn create_started_state() -> (Arc<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    common::seed_quest(&store).await;
    let oracle = Arc::new(common::TestOracle::returning(100.0));

    let state = Arc::new(AppState::with_collaborators(
        common::test_config(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        oracle,
    ));
    state
        .progression
        .start_quest(common::CUSTOMER_QUEST_ID, common::QUEST_ID)
        .await
        .unwrap();
    (state, store)
}

#[tokio::test]
async fn one_remaining_suggestion_slot_admits_exactly_one_of_two_racers() {
    let (state, store) = create_started_state().await;

    // Use up two of the three suggestion slots.
    for _ in 0..2 {
        state
            .progression
            .request_suggestion(common::CUSTOMER_QUEST_ID)
            .await
            .unwrap();
    }

    let (first, second) = tokio::join!(
        state.progression.request_suggestion(common::CUSTOMER_QUEST_ID),
        state.progression.request_suggestion(common::CUSTOMER_QUEST_ID),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one racer may take the last slot");

    let rejected = if first.is_err() { first } else { second };
    assert!(matches!(rejected, Err(Error::SuggestionLimitExceeded)));

    // Exactly three suggestions were paid for: 1000 - 3 * 150.
    let tasks = store.tasks().await;
    let task = tasks
        .iter()
        .find(|t| t.quest_item_id == common::HEAD_ITEM_ID)
        .unwrap();
    assert_eq!(task.suggestion_count, 3);
    assert_eq!(task.current_point, 550.0);
}

#[tokio::test]
async fn a_retried_advance_does_not_create_a_second_task() {
    let (state, store) = create_started_state().await;

    state
        .progression
        .submit_answer(common::CUSTOMER_QUEST_ID, common::HEAD_ITEM_ID, "Paris")
        .await
        .unwrap();

    let (first, second) = tokio::join!(
        state
            .progression
            .advance_to_next(common::QUEST_ID, common::CUSTOMER_QUEST_ID),
        state
            .progression
            .advance_to_next(common::QUEST_ID, common::CUSTOMER_QUEST_ID),
    );

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "only one advance may create the next task");

    let rejected = if first.is_err() { first } else { second };
    assert!(matches!(rejected, Err(Error::AlreadyStarted)));

    let tasks = store.tasks().await;
    assert_eq!(
        tasks
            .iter()
            .filter(|t| t.quest_item_id == common::SECOND_ITEM_ID)
            .count(),
        1
    );
}

#[tokio::test]
async fn concurrent_wrong_answers_each_apply_exactly_once() {
    let (state, store) = create_started_state().await;

    let (first, second) = tokio::join!(
        state.progression.submit_answer(
            common::CUSTOMER_QUEST_ID,
            common::HEAD_ITEM_ID,
            "wrong one"
        ),
        state.progression.submit_answer(
            common::CUSTOMER_QUEST_ID,
            common::HEAD_ITEM_ID,
            "wrong two"
        ),
    );

    first.unwrap();
    second.unwrap();

    // No lost update: both penalties landed on the same task.
    let tasks = store.tasks().await;
    let task = tasks
        .iter()
        .find(|t| t.quest_item_id == common::HEAD_ITEM_ID)
        .unwrap();
    assert_eq!(task.wrong_answer_count, 2);
    assert_eq!(task.current_point, 800.0);
    assert_eq!(store.archived_answers().await.len(), 2);
}
