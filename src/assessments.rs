//! Recording and scoring of assessments.

use crate::book::{AssessmentBook, Managed, ManagedAssessment};
use crate::error::Result;
use crate::scoring::{Assessment, AssessmentScore, Scorer, Submission};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Keeps assessments in a book, tagged with this manager's management
/// info, and scores submissions against them.
#[derive(Debug)]
pub struct AssessmentManager {
    book: AssessmentBook,
    management: BTreeMap<String, Value>,
}

impl AssessmentManager {
    pub fn new(management: BTreeMap<String, Value>) -> Self {
        Self::with_book(AssessmentBook::new(), management)
    }

    pub fn with_book(book: AssessmentBook, management: BTreeMap<String, Value>) -> Self {
        Self { book, management }
    }

    pub fn book(&self) -> &AssessmentBook {
        &self.book
    }

    pub fn management(&self) -> &BTreeMap<String, Value> {
        &self.management
    }

    #[tracing::instrument(skip_all, fields(assessment = %assessment.id, submission = %submission.id))]
    pub fn score(&self, assessment: &Assessment, submission: &Submission) -> Result<AssessmentScore> {
        Scorer::new(assessment.clone()).score(submission)
    }

    fn manage(&self, assessment: Assessment) -> ManagedAssessment {
        Managed::new(assessment, self.management.clone())
    }

    pub fn record(&self, assessment: Assessment) -> Result<()> {
        debug!(id = %assessment.id, book = self.book.name(), "Recording assessment");
        self.book.record(self.manage(assessment))
    }

    pub fn record_all(&self, assessments: Vec<Assessment>) -> Result<()> {
        let batch = assessments.into_iter().map(|a| self.manage(a)).collect();
        self.book.record_all(batch)
    }

    pub fn find<F>(&self, search: F) -> Vec<Assessment>
    where
        F: FnMut(&ManagedAssessment) -> bool,
    {
        self.book.find(search).into_iter().map(|m| m.item).collect()
    }

    pub fn find_all(&self) -> Vec<Assessment> {
        self.book.find_all().into_iter().map(|m| m.item).collect()
    }

    /// Erases the first entry equal to `assessment` recorded by this manager.
    pub fn erase(&self, assessment: &Assessment) -> bool {
        self.book.erase(&self.manage(assessment.clone()))
    }

    pub fn erase_where<F>(&self, search: F) -> Vec<Assessment>
    where
        F: FnMut(&ManagedAssessment) -> bool,
    {
        self.book
            .erase_where(search)
            .into_iter()
            .map(|m| m.item)
            .collect()
    }

    pub fn erase_all(&self) -> Vec<Assessment> {
        self.book.erase_all().into_iter().map(|m| m.item).collect()
    }
}
