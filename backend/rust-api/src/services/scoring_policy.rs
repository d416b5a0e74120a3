//! Point deductions and per-task retry ceilings.
//!
//! Both operations read the task they are given and return the updated copy;
//! callers re-read current state and hold the per-customer-quest lock around
//! the whole read-check-write sequence so concurrent penalties cannot lose
//! updates.

use crate::models::{CustomerTask, TaskStatus};
use crate::services::answer_checker::AnswerOutcome;

pub const SUGGESTION_PENALTY: f32 = 150.0;
pub const WRONG_ANSWER_PENALTY: f32 = 100.0;
pub const MAX_SUGGESTIONS: u32 = 3;
pub const MAX_WRONG_ANSWERS: u32 = 5;

/// Ceiling violations. The caller decides how to surface each one; the
/// wrong-answer ceiling in particular obliges it to reveal the expected
/// answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    SuggestionLimitExceeded,
    WrongAnswerLimitExceeded,
}

/// Deducts the suggestion cost and counts the reveal. The task is left
/// untouched past the ceiling.
pub fn apply_suggestion_penalty(mut task: CustomerTask) -> Result<CustomerTask, PolicyViolation> {
    if task.suggestion_count >= MAX_SUGGESTIONS {
        return Err(PolicyViolation::SuggestionLimitExceeded);
    }
    task.current_point -= SUGGESTION_PENALTY;
    task.suggestion_count += 1;
    Ok(task)
}

/// Applies an answer classification to the task: a correct answer finishes
/// it with the score unchanged, a wrong one costs points up to the ceiling.
pub fn apply_answer_outcome(
    mut task: CustomerTask,
    outcome: AnswerOutcome,
) -> Result<CustomerTask, PolicyViolation> {
    match outcome {
        AnswerOutcome::Correct => {
            task.status = TaskStatus::Finished;
            task.is_finished = true;
            Ok(task)
        }
        AnswerOutcome::Incorrect => {
            if task.wrong_answer_count >= MAX_WRONG_ANSWERS {
                return Err(PolicyViolation::WrongAnswerLimitExceeded);
            }
            task.current_point -= WRONG_ANSWER_PENALTY;
            task.wrong_answer_count += 1;
            Ok(task)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_task() -> CustomerTask {
        CustomerTask::started("cq-1", "item-1", 1000.0)
    }

    #[test]
    fn three_suggestions_cost_450_points() {
        let mut task = fresh_task();
        for used in 1..=3u32 {
            task = apply_suggestion_penalty(task).unwrap();
            assert_eq!(task.suggestion_count, used);
        }
        assert_eq!(task.current_point, 1000.0 - 450.0);
    }

    #[test]
    fn fourth_suggestion_is_rejected_without_deduction() {
        let mut task = fresh_task();
        for _ in 0..3 {
            task = apply_suggestion_penalty(task).unwrap();
        }
        let violation = apply_suggestion_penalty(task.clone()).unwrap_err();
        assert_eq!(violation, PolicyViolation::SuggestionLimitExceeded);
        assert_eq!(task.current_point, 550.0);
        assert_eq!(task.suggestion_count, 3);
    }

    #[test]
    fn five_wrong_answers_cost_500_points() {
        let mut task = fresh_task();
        for attempt in 1..=5u32 {
            task = apply_answer_outcome(task, AnswerOutcome::Incorrect).unwrap();
            assert_eq!(task.wrong_answer_count, attempt);
            assert_eq!(task.status, TaskStatus::Progress);
        }
        assert_eq!(task.current_point, 1000.0 - 500.0);
    }

    #[test]
    fn sixth_wrong_answer_is_rejected_without_deduction() {
        let mut task = fresh_task();
        for _ in 0..5 {
            task = apply_answer_outcome(task, AnswerOutcome::Incorrect).unwrap();
        }
        let violation = apply_answer_outcome(task, AnswerOutcome::Incorrect).unwrap_err();
        assert_eq!(violation, PolicyViolation::WrongAnswerLimitExceeded);
    }

    #[test]
    fn correct_answer_finishes_the_task_with_score_unchanged() {
        let task = fresh_task();
        let task = apply_answer_outcome(task, AnswerOutcome::Correct).unwrap();
        assert_eq!(task.current_point, 1000.0);
        assert_eq!(task.status, TaskStatus::Finished);
        assert!(task.is_finished);
    }

    #[test]
    fn correct_answer_still_finishes_after_penalties() {
        let task = fresh_task();
        let task = apply_suggestion_penalty(task).unwrap();
        let task = apply_answer_outcome(task, AnswerOutcome::Incorrect).unwrap();
        let task = apply_answer_outcome(task, AnswerOutcome::Correct).unwrap();
        assert_eq!(task.current_point, 1000.0 - 150.0 - 100.0);
        assert!(task.is_finished);
    }
}
