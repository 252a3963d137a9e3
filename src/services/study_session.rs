//! Per-session interaction state.
//!
//! Both objects travel with the request/response cycle: the handler receives
//! the current state, returns the next one, and nothing lives in process
//! globals between interactions.

use serde::{Deserialize, Serialize};

use crate::db::models::ProjectTask;

/// Flashcard review session: a fixed deck order and a cursor. Grading the
/// current card advances the cursor; the difficulty itself is persisted by
/// the caller through the flashcard repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ReviewSession {
    pub(crate) deck: Vec<i64>,
    pub(crate) position: usize,
}

impl ReviewSession {
    pub(crate) fn new(deck: Vec<i64>) -> Self {
        Self { deck, position: 0 }
    }

    pub(crate) fn current(&self) -> Option<i64> {
        self.deck.get(self.position).copied()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.position >= self.deck.len()
    }

    /// Advance past the current card, returning its id.
    pub(crate) fn advance(&mut self) -> Option<i64> {
        let current = self.current()?;
        self.position += 1;
        Some(current)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.deck.len().saturating_sub(self.position)
    }
}

/// Task-list editing before (and after) submission. Each operation returns
/// the full new list so the caller can write it back atomically.
pub(crate) fn add_task(mut tasks: Vec<ProjectTask>, name: &str) -> Vec<ProjectTask> {
    tasks.push(ProjectTask { name: name.to_string(), done: false });
    tasks
}

pub(crate) fn toggle_task(mut tasks: Vec<ProjectTask>, index: usize) -> Option<Vec<ProjectTask>> {
    let task = tasks.get_mut(index)?;
    task.done = !task.done;
    Some(tasks)
}

pub(crate) fn remove_task(mut tasks: Vec<ProjectTask>, index: usize) -> Option<Vec<ProjectTask>> {
    if index >= tasks.len() {
        return None;
    }
    tasks.remove(index);
    Some(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_session_advances_through_deck() {
        let mut session = ReviewSession::new(vec![3, 1, 2]);
        assert_eq!(session.current(), Some(3));
        assert_eq!(session.remaining(), 3);

        assert_eq!(session.advance(), Some(3));
        assert_eq!(session.current(), Some(1));
        assert_eq!(session.advance(), Some(1));
        assert_eq!(session.advance(), Some(2));

        assert!(session.is_finished());
        assert_eq!(session.advance(), None);
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn empty_deck_is_finished_immediately() {
        let session = ReviewSession::new(Vec::new());
        assert!(session.is_finished());
        assert_eq!(session.current(), None);
    }

    #[test]
    fn task_operations_preserve_order() {
        let tasks = add_task(Vec::new(), "collect data");
        let tasks = add_task(tasks, "clean data");
        let tasks = add_task(tasks, "train model");
        assert_eq!(
            tasks.iter().map(|task| task.name.as_str()).collect::<Vec<_>>(),
            vec!["collect data", "clean data", "train model"]
        );

        let tasks = toggle_task(tasks, 1).expect("toggle");
        assert!(tasks[1].done);
        assert!(!tasks[0].done);

        let tasks = remove_task(tasks, 0).expect("remove");
        assert_eq!(tasks[0].name, "clean data");
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn task_operations_reject_out_of_range_index() {
        let tasks = add_task(Vec::new(), "only");
        assert!(toggle_task(tasks.clone(), 5).is_none());
        assert!(remove_task(tasks, 5).is_none());
    }
}
