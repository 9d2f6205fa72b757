//! Classified grade values, grades and ranks.

use crate::error::{GradeError, Result};
use crate::ids::generate_id;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A numeric value, its text label and the grading system it was classified under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeValue {
    numeric_value: Decimal,
    #[serde(default)]
    text_value: String,
    grading_system: String,
}

impl GradeValue {
    pub fn new(
        numeric_value: Decimal,
        text_value: impl Into<String>,
        grading_system: impl Into<String>,
    ) -> Self {
        Self {
            numeric_value,
            text_value: text_value.into(),
            grading_system: grading_system.into(),
        }
    }

    pub fn numeric_value(&self) -> Decimal {
        self.numeric_value
    }

    pub fn text_value(&self) -> &str {
        &self.text_value
    }

    pub fn grading_system(&self) -> &str {
        &self.grading_system
    }

    /// Ordering by numeric value alone.
    pub fn compare_numeric(&self, other: &GradeValue) -> Ordering {
        self.numeric_value.cmp(&other.numeric_value)
    }
}

impl AsRef<GradeValue> for GradeValue {
    fn as_ref(&self) -> &GradeValue {
        self
    }
}

/// Identity of a graded thing or of an entity a grade relates to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReference {
    pub id: String,
    #[serde(rename = "type")]
    pub reference_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
}

impl GradeReference {
    pub fn new(id: impl Into<String>, reference_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reference_type: reference_type.into(),
            description: String::new(),
            extensions: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }
}

/// A recorded grade: a [`GradeValue`] plus identity, weight, timestamp and
/// references to related entities.
///
/// Equality compares every field, with timestamps truncated to whole seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    id: String,
    #[serde(rename = "type")]
    grade_type: String,
    #[serde(alias = "timeStamp", default = "Utc::now")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    description: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extensions: BTreeMap<String, Value>,
    #[serde(default = "default_weight")]
    weight: Decimal,
    #[serde(flatten)]
    value: GradeValue,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    references: BTreeMap<String, GradeReference>,
}

fn default_weight() -> Decimal {
    Decimal::ONE
}

impl Grade {
    pub fn builder() -> GradeBuilder {
        GradeBuilder::new(false)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn grade_type(&self) -> &str {
        &self.grade_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn value(&self) -> &GradeValue {
        &self.value
    }

    pub fn numeric_value(&self) -> Decimal {
        self.value.numeric_value
    }

    pub fn text_value(&self) -> &str {
        &self.value.text_value
    }

    pub fn grading_system(&self) -> &str {
        &self.value.grading_system
    }

    pub fn extensions(&self) -> &BTreeMap<String, Value> {
        &self.extensions
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    pub fn references(&self) -> &BTreeMap<String, GradeReference> {
        &self.references
    }

    pub fn reference(&self, key: &str) -> Option<&GradeReference> {
        self.references.get(key)
    }

    /// Copy of this grade carrying a different value (e.g. after conversion).
    pub fn with_value(&self, value: GradeValue) -> Grade {
        Grade {
            value,
            ..self.clone()
        }
    }
}

impl PartialEq for Grade {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.grade_type == other.grade_type
            && self.value == other.value
            && self.timestamp.timestamp() == other.timestamp.timestamp()
            && self.description == other.description
            && self.extensions == other.extensions
            && self.references == other.references
            && self.weight == other.weight
    }
}

impl AsRef<GradeValue> for Grade {
    fn as_ref(&self) -> &GradeValue {
        &self.value
    }
}

/// Builder for [`Grade`]. With `auto_id` set, a fresh id is generated on
/// every `build` unless one was given explicitly.
#[derive(Debug, Clone)]
pub struct GradeBuilder {
    auto_id: bool,
    id: Option<String>,
    grade_type: String,
    description: String,
    extensions: BTreeMap<String, Value>,
    numeric_value: Option<Decimal>,
    text_value: String,
    grading_system: Option<String>,
    timestamp: DateTime<Utc>,
    weight: Decimal,
    references: BTreeMap<String, GradeReference>,
}

impl GradeBuilder {
    pub fn new(auto_id: bool) -> Self {
        Self {
            auto_id,
            id: None,
            grade_type: String::new(),
            description: String::new(),
            extensions: BTreeMap::new(),
            numeric_value: None,
            text_value: String::new(),
            grading_system: None,
            timestamp: Utc::now(),
            weight: Decimal::ONE,
            references: BTreeMap::new(),
        }
    }

    /// Starts from every field of an existing grade.
    pub fn from_grade(grade: &Grade) -> Self {
        Self {
            auto_id: false,
            id: Some(grade.id.clone()),
            grade_type: grade.grade_type.clone(),
            description: grade.description.clone(),
            extensions: grade.extensions.clone(),
            numeric_value: Some(grade.value.numeric_value),
            text_value: grade.value.text_value.clone(),
            grading_system: Some(grade.value.grading_system.clone()),
            timestamp: grade.timestamp,
            weight: grade.weight,
            references: grade.references.clone(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn grade_type(mut self, grade_type: impl Into<String>) -> Self {
        self.grade_type = grade_type.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn extension(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }

    pub fn grade_value(mut self, value: &GradeValue) -> Self {
        self.numeric_value = Some(value.numeric_value);
        self.text_value = value.text_value.clone();
        self.grading_system = Some(value.grading_system.clone());
        self
    }

    pub fn numeric_value(mut self, value: impl Into<Decimal>) -> Self {
        self.numeric_value = Some(value.into());
        self
    }

    pub fn text_value(mut self, text_value: impl Into<String>) -> Self {
        self.text_value = text_value.into();
        self
    }

    pub fn grading_system(mut self, grading_system: impl Into<String>) -> Self {
        self.grading_system = Some(grading_system.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn weight(mut self, weight: impl Into<Decimal>) -> Self {
        self.weight = weight.into();
        self
    }

    pub fn reference(mut self, key: impl Into<String>, reference: GradeReference) -> Self {
        self.references.insert(key.into(), reference);
        self
    }

    pub fn build(self) -> Result<Grade> {
        let numeric_value = self.numeric_value.ok_or_else(|| {
            GradeError::InvalidArgument("grade numeric value must be set".to_string())
        })?;
        let grading_system = self.grading_system.ok_or_else(|| {
            GradeError::InvalidArgument("grade grading system must be set".to_string())
        })?;
        let id = match self.id {
            Some(id) => id,
            None if self.auto_id => generate_id(),
            None => {
                return Err(GradeError::InvalidArgument(
                    "grade id must be set when ids are not auto-generated".to_string(),
                ));
            }
        };

        Ok(Grade {
            id,
            grade_type: self.grade_type,
            timestamp: self.timestamp,
            description: self.description,
            extensions: self.extensions,
            weight: self.weight,
            value: GradeValue::new(numeric_value, self.text_value, grading_system),
            references: self.references,
        })
    }
}

/// A grade paired with its rank (1-based; ties share a rank).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeRank {
    pub rank: u64,
    pub grade: Grade,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn sample() -> Grade {
        GradeBuilder::new(true)
            .grade_type("FINAL_EXAM_ENG101")
            .description("English 101 Final Exam")
            .numeric_value(dec!(100))
            .text_value("A+")
            .grading_system("academic.percent.standard-plus-minus.us")
            .weight(dec!(0.3))
            .extension("semester", "fall")
            .reference(
                "test",
                GradeReference::new("ref-1", "test").with_description("English 101 Final Exam Test"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_generates_ids() {
        let builder = GradeBuilder::new(true)
            .numeric_value(dec!(1))
            .grading_system("s");
        let a = builder.clone().build().unwrap();
        let b = builder.build().unwrap();
        assert_eq!(a.id().len(), 32);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_builder_requires_id_without_auto() {
        let result = Grade::builder().numeric_value(dec!(1)).grading_system("s").build();
        assert!(matches!(result, Err(GradeError::InvalidArgument(_))));
    }

    #[test]
    fn test_builder_requires_value_and_system() {
        assert!(GradeBuilder::new(true).grading_system("s").build().is_err());
        assert!(GradeBuilder::new(true).numeric_value(dec!(1)).build().is_err());
    }

    #[test]
    fn test_weight_defaults_to_one() {
        let grade = GradeBuilder::new(true)
            .numeric_value(dec!(50))
            .grading_system("s")
            .build()
            .unwrap();
        assert_eq!(grade.weight(), Decimal::ONE);
        assert_eq!(grade.text_value(), "");
    }

    #[test]
    fn test_equality_ignores_sub_second_timestamp() {
        let grade = sample();
        let base = grade.timestamp().with_timezone(&Utc);
        let truncated = DateTime::<Utc>::from_timestamp(base.timestamp(), 0).unwrap();

        let a = GradeBuilder::from_grade(&grade).timestamp(truncated).build().unwrap();
        let b = GradeBuilder::from_grade(&grade)
            .timestamp(truncated + Duration::milliseconds(400))
            .build()
            .unwrap();
        let c = GradeBuilder::from_grade(&grade)
            .timestamp(truncated + Duration::seconds(1))
            .build()
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_from_grade_copies_everything() {
        let grade = sample();
        assert_eq!(GradeBuilder::from_grade(&grade).build().unwrap(), grade);
    }

    #[test]
    fn test_with_value_keeps_identity() {
        let grade = sample();
        let converted = grade.with_value(GradeValue::new(dec!(4.3), "A+", "gpa"));
        assert_eq!(converted.id(), grade.id());
        assert_eq!(converted.weight(), dec!(0.3));
        assert_eq!(converted.grading_system(), "gpa");
    }

    #[test]
    fn test_grade_json_round_trip() {
        let grade = sample();
        let json = serde_json::to_value(&grade).unwrap();
        assert_eq!(json["type"], "FINAL_EXAM_ENG101");
        assert_eq!(json["textValue"], "A+");
        assert_eq!(json["gradingSystem"], "academic.percent.standard-plus-minus.us");
        assert_eq!(json["references"]["test"]["type"], "test");

        let back: Grade = serde_json::from_value(json).unwrap();
        assert_eq!(back, grade);
        assert_eq!(back.reference("test").unwrap().id, "ref-1");
        assert_eq!(back.extension("semester"), Some(&Value::from("fall")));
    }

    #[test]
    fn test_grade_accepts_numeric_json_values() {
        let json = r#"{"id":"g1","type":"quiz","numericValue":87.5,"textValue":"B+","gradingSystem":"s","timeStamp":"2021-03-01T10:00:00Z"}"#;
        let grade: Grade = serde_json::from_str(json).unwrap();
        assert_eq!(grade.numeric_value(), dec!(87.5));
        assert_eq!(grade.weight(), Decimal::ONE);
        assert_eq!(grade.timestamp().timestamp(), 1614592800);
    }

    #[test]
    fn test_compare_numeric() {
        let low = GradeValue::new(dec!(1), "", "s");
        let high = GradeValue::new(dec!(2), "", "t");
        assert_eq!(low.compare_numeric(&high), Ordering::Less);
        assert_eq!(high.compare_numeric(&low), Ordering::Greater);
    }
}
