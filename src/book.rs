//! Capped, thread-safe in-memory books of managed records.

use crate::error::{GradeError, Result};
use crate::ids::generate_id;
use crate::model::Grade;
use crate::scoring::Assessment;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_BOOK_LIMIT: usize = 10_000;

/// A record plus the management info of whoever recorded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Managed<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(default)]
    pub management: BTreeMap<String, Value>,
}

impl<T> Managed<T> {
    pub fn new(item: T, management: BTreeMap<String, Value>) -> Self {
        Self { item, management }
    }
}

pub type ManagedGrade = Managed<Grade>;
pub type GradeBook = MemoryBook<ManagedGrade>;
pub type ManagedAssessment = Managed<Assessment>;
pub type AssessmentBook = MemoryBook<ManagedAssessment>;

/// Named list of records behind one lock, refusing writes past `limit`.
///
/// Searches are linear scans; every call takes the lock once.
pub struct MemoryBook<T> {
    name: String,
    limit: usize,
    entries: Mutex<Vec<T>>,
}

impl<T: Clone + PartialEq> MemoryBook<T> {
    pub fn new() -> Self {
        Self::with_limit(generate_id(), DEFAULT_BOOK_LIMIT)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::with_limit(name, DEFAULT_BOOK_LIMIT)
    }

    /// A blank name is replaced by a generated one.
    pub fn with_limit(name: impl Into<String>, limit: usize) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() { generate_id() } else { name };
        Self {
            name,
            limit,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Seeds the book with existing records.
    pub fn with_entries(name: impl Into<String>, entries: Vec<T>, limit: usize) -> Result<Self> {
        if entries.len() > limit {
            return Err(GradeError::InvalidArgument(format!(
                "{} entries exceed book limit {limit}",
                entries.len()
            )));
        }
        let book = Self::with_limit(name, limit);
        *book.entries.lock() = entries;
        Ok(book)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn record(&self, entry: T) -> Result<()> {
        let mut entries = self.entries.lock();
        if entries.len() >= self.limit {
            return Err(GradeError::BookFull { limit: self.limit });
        }
        entries.push(entry);
        Ok(())
    }

    /// Records all of `batch` or none of it.
    pub fn record_all(&self, batch: Vec<T>) -> Result<()> {
        let mut entries = self.entries.lock();
        if entries.len() + batch.len() > self.limit {
            return Err(GradeError::BookFull { limit: self.limit });
        }
        entries.extend(batch);
        Ok(())
    }

    /// Removes the first entry equal to `entry`.
    pub fn erase(&self, entry: &T) -> bool {
        let mut entries = self.entries.lock();
        match entries.iter().position(|e| e == entry) {
            Some(idx) => {
                entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes and returns every entry matching `search`, in book order.
    pub fn erase_where<F>(&self, mut search: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut entries = self.entries.lock();
        let (erased, kept): (Vec<T>, Vec<T>) = entries.drain(..).partition(|e| search(e));
        *entries = kept;
        erased
    }

    pub fn erase_all(&self) -> Vec<T> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn find<F>(&self, mut search: F) -> Vec<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.entries
            .lock()
            .iter()
            .filter(|e| search(e))
            .cloned()
            .collect()
    }

    pub fn find_all(&self) -> Vec<T> {
        self.entries.lock().clone()
    }
}

impl<T: Clone + PartialEq> Default for MemoryBook<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MemoryBook<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBook")
            .field("name", &self.name)
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::thread;

    fn managed(id: &str) -> ManagedGrade {
        let grade = Grade::builder()
            .id(id)
            .numeric_value(dec!(90))
            .text_value("A")
            .grading_system("s")
            .build()
            .unwrap();
        Managed::new(grade, BTreeMap::from([("owner".to_string(), Value::from("tests"))]))
    }

    #[test]
    fn test_blank_name_is_generated() {
        let book = GradeBook::named("  ");
        assert_eq!(book.name().len(), 32);
        assert_eq!(GradeBook::named("semester").name(), "semester");
    }

    #[test]
    fn test_record_and_find() {
        let book = GradeBook::named("b");
        book.record(managed("g1")).unwrap();
        book.record_all(vec![managed("g2"), managed("g3")]).unwrap();

        assert_eq!(book.len(), 3);
        let found = book.find(|m| m.item.id() == "g2");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].management["owner"], "tests");
        assert_eq!(book.find_all().len(), 3);
    }

    #[test]
    fn test_limit_enforced() {
        let book = GradeBook::with_limit("small", 2);
        book.record(managed("g1")).unwrap();
        assert!(matches!(
            book.record_all(vec![managed("g2"), managed("g3")]),
            Err(GradeError::BookFull { limit: 2 })
        ));
        assert_eq!(book.len(), 1);
        book.record(managed("g2")).unwrap();
        assert!(matches!(book.record(managed("g3")), Err(GradeError::BookFull { .. })));
    }

    #[test]
    fn test_with_entries_over_limit() {
        let result = GradeBook::with_entries("x", vec![managed("a"), managed("b")], 1);
        assert!(matches!(result, Err(GradeError::InvalidArgument(_))));
    }

    #[test]
    fn test_erase_first_equal() {
        let book = GradeBook::named("b");
        let entry = managed("dup");
        book.record_all(vec![entry.clone(), entry.clone()]).unwrap();
        assert!(book.erase(&entry));
        assert_eq!(book.len(), 1);
        assert!(book.erase(&entry));
        assert!(!book.erase(&entry));
    }

    #[test]
    fn test_erase_where_and_all() {
        let book = GradeBook::named("b");
        book.record_all(vec![managed("a1"), managed("b1"), managed("a2")]).unwrap();

        let erased = book.erase_where(|m| m.item.id().starts_with('a'));
        let ids: Vec<&str> = erased.iter().map(|m| m.item.id()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
        assert_eq!(book.len(), 1);

        assert_eq!(book.erase_all().len(), 1);
        assert!(book.is_empty());
    }

    #[test]
    fn test_concurrent_records_respect_limit() {
        let book = Arc::new(GradeBook::with_limit("shared", 100));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let book = Arc::clone(&book);
                thread::spawn(move || {
                    (0..50)
                        .filter(|i| book.record(managed(&format!("{t}-{i}"))).is_ok())
                        .count()
                })
            })
            .collect();
        let recorded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(recorded, 100);
        assert_eq!(book.len(), 100);
    }
}
