use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Told about every deletion a timeline performs, whether or not anything was removed.
pub trait DeletionHook {
    fn notify_deleted(&mut self, id: Uuid);
}

impl<F> DeletionHook for F
where
    F: FnMut(Uuid),
{
    fn notify_deleted(&mut self, id: Uuid) {
        self(id)
    }
}

/// A free-text note attached to any number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub id: Uuid,
    pub description: String,
    pub occurrence_ids: Vec<Uuid>,
}

impl Memo {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            description: description.into(),
            occurrence_ids: Vec::new(),
        }
    }

    pub fn references(&self, occurrence_id: Uuid) -> bool {
        self.occurrence_ids.contains(&occurrence_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoBook {
    memos: Vec<Memo>,
}

impl MemoBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn create(&mut self, description: impl Into<String>) -> Uuid {
        let memo = Memo::new(description);
        let id = memo.id;
        tracing::debug!(memo = %id, "memo created");
        self.memos.push(memo);
        id
    }

    pub fn link(&mut self, memo_id: Uuid, occurrence_id: Uuid) -> Result<(), CoreError> {
        let memo = self
            .memos
            .iter_mut()
            .find(|m| m.id == memo_id)
            .ok_or_else(|| CoreError::InvalidInput(format!("no memo with id {memo_id}")))?;
        memo.occurrence_ids.push(occurrence_id);
        Ok(())
    }

    /// The first memo referencing `occurrence_id`.
    pub fn memo_for(&self, occurrence_id: Uuid) -> Option<&Memo> {
        self.memos.iter().find(|m| m.references(occurrence_id))
    }

    pub fn find_by_text(&self, text: &str) -> Option<&Memo> {
        self.memos.iter().find(|m| m.description == text)
    }

    pub fn remove(&mut self, memo_id: Uuid) -> Option<Memo> {
        let index = self.memos.iter().position(|m| m.id == memo_id)?;
        Some(self.memos.remove(index))
    }

    /// Drops one reference to `occurrence_id` from the first memo holding it.
    /// Returns whether anything was unlinked.
    pub fn unlink(&mut self, occurrence_id: Uuid) -> bool {
        let Some(memo) = self.memos.iter_mut().find(|m| m.references(occurrence_id)) else {
            return false;
        };
        if let Some(index) = memo.occurrence_ids.iter().position(|id| *id == occurrence_id) {
            memo.occurrence_ids.remove(index);
        }
        true
    }
}

impl DeletionHook for MemoBook {
    fn notify_deleted(&mut self, id: Uuid) {
        if self.unlink(id) {
            tracing::debug!(occurrence = %id, "unlinked deleted occurrence from memo");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_link_and_find() {
        let mut book = MemoBook::new();
        let memo_id = book.create("Bring slides");
        let occurrence = Uuid::now_v7();
        book.link(memo_id, occurrence).unwrap();

        assert_eq!(book.memo_for(occurrence).map(|m| m.id), Some(memo_id));
        assert_eq!(book.find_by_text("Bring slides").map(|m| m.id), Some(memo_id));
        assert!(book.find_by_text("bring slides").is_none());
    }

    #[test]
    fn test_link_to_missing_memo() {
        let mut book = MemoBook::new();
        let result = book.link(Uuid::now_v7(), Uuid::now_v7());
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_deletion_unlinks_from_first_memo_only() {
        let mut book = MemoBook::new();
        let first = book.create("first");
        let second = book.create("second");
        let occurrence = Uuid::now_v7();
        book.link(first, occurrence).unwrap();
        book.link(second, occurrence).unwrap();

        book.notify_deleted(occurrence);
        assert_eq!(book.memo_for(occurrence).map(|m| m.id), Some(second));
        book.notify_deleted(occurrence);
        assert!(book.memo_for(occurrence).is_none());
        // Nothing left to unlink is fine.
        assert!(!book.unlink(occurrence));
    }

    #[test]
    fn test_remove_memo() {
        let mut book = MemoBook::new();
        let id = book.create("gone soon");
        assert!(book.remove(id).is_some());
        assert!(book.remove(id).is_none());
        assert!(book.memos().is_empty());
    }

    #[test]
    fn test_closures_are_hooks() {
        let mut seen = Vec::new();
        let id = Uuid::now_v7();
        {
            let mut hook = |deleted: Uuid| seen.push(deleted);
            hook.notify_deleted(id);
        }
        assert_eq!(seen, vec![id]);
    }
}
