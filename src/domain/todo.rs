use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TodoError {
    #[error("Todo title must not be empty.")]
    EmptyTitle,
}

/// A single to-do entry, owned by exactly one date bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: Uuid,
    pub title: String,
    pub is_done: bool,
    pub memo: Option<String>,
}

impl TodoItem {
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            is_done: false,
            memo: None,
        }
    }
}

/// Per-day to-do lists. Insertion order is display order; items are never
/// shared between dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoStore {
    #[serde(flatten)]
    days: BTreeMap<NaiveDate, Vec<TodoItem>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items for a date; missing dates read as empty
    pub fn items(&self, date: NaiveDate) -> &[TodoItem] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, date: NaiveDate) -> usize {
        self.items(date).len()
    }

    /// Append a new item to the date bucket
    pub fn add(&mut self, date: NaiveDate, title: &str) -> Result<(), TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }
        self.days
            .entry(date)
            .or_default()
            .push(TodoItem::new(title.to_string()));
        Ok(())
    }

    /// Flip the done flag by position. Out-of-range indices are no-ops.
    pub fn toggle_done(&mut self, date: NaiveDate, index: usize) {
        if let Some(item) = self.days.get_mut(&date).and_then(|items| items.get_mut(index)) {
            item.is_done = !item.is_done;
        }
    }

    /// Overwrite the memo by position. An empty memo clears it.
    pub fn set_memo(&mut self, date: NaiveDate, index: usize, memo: &str) {
        if let Some(item) = self.days.get_mut(&date).and_then(|items| items.get_mut(index)) {
            item.memo = if memo.is_empty() {
                None
            } else {
                Some(memo.to_string())
            };
        }
    }

    /// Delete an item by position. Empty buckets are dropped so the
    /// persisted document does not accumulate stale dates.
    pub fn remove(&mut self, date: NaiveDate, index: usize) {
        if let Some(items) = self.days.get_mut(&date) {
            if index < items.len() {
                items.remove(index);
            }
            if items.is_empty() {
                self.days.remove(&date);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let mut store = TodoStore::new();
        assert_eq!(store.add(date("2024-01-01"), "  "), Err(TodoError::EmptyTitle));
        assert!(store.items(date("2024-01-01")).is_empty());
    }

    #[test]
    fn test_round_trip() {
        let day = date("2024-01-01");
        let mut store = TodoStore::new();

        store.add(day, "X").unwrap();
        store.toggle_done(day, 0);
        store.set_memo(day, 0, "note");

        let item = &store.items(day)[0];
        assert_eq!(item.title, "X");
        assert!(item.is_done);
        assert_eq!(item.memo.as_deref(), Some("note"));

        store.remove(day, 0);
        assert!(store.items(day).is_empty());
    }

    #[test]
    fn test_insertion_order_is_display_order() {
        let day = date("2024-01-01");
        let mut store = TodoStore::new();
        store.add(day, "first").unwrap();
        store.add(day, "second").unwrap();
        store.add(day, "first").unwrap(); // No uniqueness constraint on titles

        let titles: Vec<&str> = store.items(day).iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "first"]);
    }

    #[test]
    fn test_dates_are_independent() {
        let mut store = TodoStore::new();
        store.add(date("2024-01-01"), "X").unwrap();
        store.add(date("2024-01-02"), "Y").unwrap();

        store.toggle_done(date("2024-01-01"), 0);
        assert!(store.items(date("2024-01-01"))[0].is_done);
        assert!(!store.items(date("2024-01-02"))[0].is_done);
        assert_eq!(store.count(date("2024-01-03")), 0);
    }

    #[test]
    fn test_out_of_range_index_is_noop() {
        let day = date("2024-01-01");
        let mut store = TodoStore::new();
        store.add(day, "X").unwrap();

        store.toggle_done(day, 5);
        store.set_memo(day, 5, "note");
        store.remove(day, 5);

        let item = &store.items(day)[0];
        assert!(!item.is_done);
        assert_eq!(item.memo, None);
        assert_eq!(store.count(day), 1);
    }

    #[test]
    fn test_set_memo_empty_clears() {
        let day = date("2024-01-01");
        let mut store = TodoStore::new();
        store.add(day, "X").unwrap();
        store.set_memo(day, 0, "note");
        store.set_memo(day, 0, "");
        assert_eq!(store.items(day)[0].memo, None);
    }

    #[test]
    fn test_serde_round_trip() {
        let day = date("2024-01-01");
        let mut store = TodoStore::new();
        store.add(day, "X").unwrap();
        store.set_memo(day, 0, "note");

        let json = serde_json::to_value(&store).unwrap();
        let restored: TodoStore = serde_json::from_value(json).unwrap();
        assert_eq!(restored.items(day), store.items(day));
    }
}
