//! Question-based assessments and a weighted scorer for submissions.
//!
//! A submission scores `Σ(question weight · answer weight) / question count`,
//! optionally scaled by a multiplier. Unanswered or unrecognised answers
//! score zero for their question. The score carries the references of both
//! the assessment and the submission, submission entries winning on a key
//! clash, plus an `assessment` and a `submission` entry naming the two.

use crate::error::{GradeError, Result};
use crate::ids::generate_id;
use crate::model::GradeReference;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Question difficulty, used as the question's default weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DifficultyLevel {
    Extreme,
    Hard,
    #[default]
    Medium,
    Easy,
    None,
}

impl DifficultyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyLevel::Extreme => "Extreme",
            DifficultyLevel::Hard => "Hard",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::None => "",
        }
    }

    pub fn weight(&self) -> Decimal {
        match self {
            DifficultyLevel::Extreme => Decimal::new(110, 2),
            DifficultyLevel::Hard => Decimal::new(101, 2),
            DifficultyLevel::Medium => Decimal::ONE,
            DifficultyLevel::Easy => Decimal::new(99, 2),
            DifficultyLevel::None => Decimal::new(90, 2),
        }
    }

    /// Case-insensitive; anything unknown is `None`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "EXTREME" => DifficultyLevel::Extreme,
            "HARD" => DifficultyLevel::Hard,
            "MEDIUM" => DifficultyLevel::Medium,
            "EASY" => DifficultyLevel::Easy,
            _ => DifficultyLevel::None,
        }
    }
}

impl From<String> for DifficultyLevel {
    fn from(label: String) -> Self {
        DifficultyLevel::from_label(&label)
    }
}

impl From<DifficultyLevel> for String {
    fn from(level: DifficultyLevel) -> Self {
        level.label().to_string()
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default = "one")]
    pub weight: Decimal,
}

impl AnswerOption {
    pub fn new(id: impl Into<String>, value: impl Into<String>, weight: Decimal) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            weight,
        }
    }
}

fn one() -> Decimal {
    Decimal::ONE
}

fn yes() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, rename = "values")]
    pub options: Vec<AnswerOption>,
    #[serde(default = "one")]
    pub weight: Decimal,
    #[serde(default = "yes")]
    pub case_sensitive: bool,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            options: Vec::new(),
            weight: DifficultyLevel::Medium.weight(),
            case_sensitive: true,
        }
    }

    pub fn with_difficulty(mut self, difficulty: DifficultyLevel) -> Self {
        self.weight = difficulty.weight();
        self
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_option(mut self, option: AnswerOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// First option whose value matches `answer`.
    pub fn option_for(&self, answer: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| {
            if self.case_sensitive {
                option.value == answer
            } else {
                option.value.eq_ignore_ascii_case(answer)
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    #[serde(rename = "type", default = "standard")]
    pub assessment_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub references: BTreeMap<String, GradeReference>,
}

fn standard() -> String {
    "standard".to_string()
}

impl Assessment {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            assessment_type: standard(),
            name: name.into(),
            description: String::new(),
            questions: Vec::new(),
            references: BTreeMap::new(),
        }
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn with_reference(mut self, key: impl Into<String>, reference: GradeReference) -> Self {
        self.references.insert(key.into(), reference);
        self
    }
}

/// Answers keyed by question id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub references: BTreeMap<String, GradeReference>,
}

impl Submission {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: Utc::now(),
            answers: BTreeMap::new(),
            references: BTreeMap::new(),
        }
    }

    pub fn answer(mut self, question_id: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers.insert(question_id.into(), answer.into());
        self
    }

    pub fn with_reference(mut self, key: impl Into<String>, reference: GradeReference) -> Self {
        self.references.insert(key.into(), reference);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentScore {
    pub id: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
    /// Answer weight earned per question id.
    pub question_scores: BTreeMap<String, Decimal>,
    pub assessment_id: String,
    pub submission_id: String,
    #[serde(default)]
    pub references: BTreeMap<String, GradeReference>,
}

#[derive(Debug, Clone)]
pub struct Scorer {
    assessment: Assessment,
    multiplier: Option<Decimal>,
}

impl Scorer {
    pub fn new(assessment: Assessment) -> Self {
        Self {
            assessment,
            multiplier: None,
        }
    }

    pub fn with_multiplier(assessment: Assessment, multiplier: Decimal) -> Self {
        Self {
            assessment,
            multiplier: Some(multiplier),
        }
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn score(&self, submission: &Submission) -> Result<AssessmentScore> {
        let mut question_scores = BTreeMap::new();
        let mut weights = BTreeMap::new();
        for question in &self.assessment.questions {
            let answer = submission
                .answers
                .get(&question.id)
                .map(String::as_str)
                .unwrap_or_default();
            let earned = question
                .option_for(answer)
                .map(|option| option.weight)
                .unwrap_or(Decimal::ZERO);
            question_scores.insert(question.id.clone(), earned);
            weights.insert(question.id.clone(), question.weight);
        }

        let overflow = || GradeError::CannotCompute(format!("score for submission {}", submission.id));
        let mut value = Decimal::ZERO;
        if !question_scores.is_empty() {
            let mut sum = Decimal::ZERO;
            for (id, earned) in &question_scores {
                let product = weights[id].checked_mul(*earned).ok_or_else(overflow)?;
                sum = sum.checked_add(product).ok_or_else(overflow)?;
            }
            if !sum.is_zero() {
                value = sum
                    .checked_div(Decimal::from(question_scores.len()))
                    .ok_or_else(overflow)?;
            }
        }
        if let Some(multiplier) = self.multiplier {
            value = value.checked_mul(multiplier).ok_or_else(overflow)?;
        }

        let mut references = self.assessment.references.clone();
        references.extend(submission.references.clone());
        references.insert(
            "assessment".to_string(),
            GradeReference::new(&self.assessment.id, "assessment")
                .with_description(&self.assessment.name),
        );
        references.insert(
            "submission".to_string(),
            GradeReference::new(&submission.id, "submission"),
        );

        Ok(AssessmentScore {
            id: generate_id(),
            description: format!(
                "score {value} from assessment containing {} questions",
                self.assessment.questions.len()
            ),
            timestamp: Utc::now(),
            value,
            question_scores,
            assessment_id: self.assessment.id.clone(),
            submission_id: submission.id.clone(),
            references,
        })
    }
}
