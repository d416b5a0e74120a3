//! Traversal of the singly-linked, soft-deletable quest item chain.
//!
//! Items link backwards: `predecessor_id` names the item each one follows
//! and `None` marks the head, so the successor of X is the item whose
//! `predecessor_id` is X's id. Traversal is an explicit loop with a
//! visited-set guard; a corrupted (cyclic) chain fails with `InvalidChain`
//! instead of looping forever.

use std::collections::HashSet;

use crate::error::Error;
use crate::models::{LifecycleStatus, QuestItem};

/// Resolves the chain head, skipping forward past soft-deleted items.
///
/// Fails with `NotFound` when the quest has no items at all and with
/// `QuestFinished` when every item has been deleted.
pub fn head_item<'a>(items: &'a [QuestItem]) -> Result<&'a QuestItem, Error> {
    if items.is_empty() {
        return Err(Error::NotFound("QuestItem".to_string()));
    }

    let head = items
        .iter()
        .find(|item| item.predecessor_id.is_none())
        .ok_or_else(|| Error::InvalidChain("quest has items but no chain head".to_string()))?;

    if head.status == LifecycleStatus::Active {
        return Ok(head);
    }
    next_active_item(&head.id, items)
}

/// The first Active successor of `current_id`, skipping soft-deleted items.
///
/// Fails with `QuestFinished` when the chain is exhausted and with
/// `InvalidChain` when a cycle is detected.
pub fn next_active_item<'a>(current_id: &str, items: &'a [QuestItem]) -> Result<&'a QuestItem, Error> {
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(current_id);

    let mut cursor = current_id;
    loop {
        let Some(next) = items
            .iter()
            .find(|item| item.predecessor_id.as_deref() == Some(cursor))
        else {
            return Err(Error::QuestFinished);
        };

        if !visited.insert(next.id.as_str()) {
            return Err(Error::InvalidChain(format!(
                "cycle detected at quest item {}",
                next.id
            )));
        }

        if next.status == LifecycleStatus::Active {
            return Ok(next);
        }
        cursor = next.id.as_str();
    }
}

/// Number of Active items in the quest, the denominator of completion checks.
pub fn active_item_count(items: &[QuestItem]) -> usize {
    items
        .iter()
        .filter(|item| item.status == LifecycleStatus::Active)
        .count()
}
