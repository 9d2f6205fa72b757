//! Grading systems: ordered, searchable collections of ranges.

use crate::error::{GradeError, Result};
use crate::model::level::PerformanceLevel;
use crate::model::range::Range;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Well-known values of a grading system's `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradingSystemType {
    Binary,
    Gpa,
    Percent,
    Rating,
    Ternary,
}

impl GradingSystemType {
    pub fn label(&self) -> &'static str {
        match self {
            GradingSystemType::Binary => "binary",
            GradingSystemType::Gpa => "gpa",
            GradingSystemType::Percent => "percent",
            GradingSystemType::Rating => "rating",
            GradingSystemType::Ternary => "ternary",
        }
    }
}

impl fmt::Display for GradingSystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named scale of non-overlapping ranges.
///
/// Ids conventionally follow `category.type.name.variant`. Ranges are kept
/// sorted by effective start; numeric lookups return the first matching
/// range in that order. Text lookups go through an upper-cased label index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "GradingSystemDefinition", into = "GradingSystemDefinition")]
pub struct GradingSystem {
    id: String,
    description: String,
    category: String,
    system_type: String,
    name: String,
    variant: String,
    ranges: Vec<Range>,
    ranges_by_label: HashMap<String, usize>,
}

impl GradingSystem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        system_type: impl Into<String>,
        name: impl Into<String>,
        variant: impl Into<String>,
        mut ranges: Vec<Range>,
    ) -> Self {
        ranges.sort_by(|a, b| a.effective_start().cmp(&b.effective_start()));

        let ranges_by_label = ranges
            .iter()
            .enumerate()
            .map(|(idx, range)| (range.text_value().to_uppercase(), idx))
            .collect();

        Self {
            id: id.into(),
            description: description.into(),
            category: category.into(),
            system_type: system_type.into(),
            name: name.into(),
            variant: variant.into(),
            ranges,
            ranges_by_label,
        }
    }

    pub fn builder() -> GradingSystemBuilder {
        GradingSystemBuilder::default()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn system_type(&self) -> &str {
        &self.system_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn is_type(&self, system_type: GradingSystemType) -> bool {
        self.system_type == system_type.label()
    }

    /// Copy of all ranges in ascending effective-start order.
    pub fn ranges(&self) -> Vec<Range> {
        self.ranges.clone()
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    /// First range, in sort order, containing `value`.
    pub fn range_for_value(&self, value: Decimal) -> Option<&Range> {
        self.ranges.iter().find(|range| range.in_range(value))
    }

    pub fn range_for_label(&self, text_value: &str) -> Option<&Range> {
        self.ranges_by_label
            .get(&text_value.to_uppercase())
            .map(|&idx| &self.ranges[idx])
    }

    pub fn text_value_for(&self, value: Decimal) -> Option<&str> {
        self.range_for_value(value).map(Range::text_value)
    }

    pub fn performance_level_for(&self, value: Decimal) -> Option<PerformanceLevel> {
        self.range_for_value(value).map(Range::performance_level)
    }

    pub fn start_value_for(&self, text_value: &str) -> Option<Decimal> {
        self.range_for_label(text_value).map(Range::effective_start)
    }

    pub fn mid_value_for(&self, text_value: &str) -> Option<Decimal> {
        self.range_for_label(text_value).map(Range::effective_mid)
    }

    pub fn end_value_for(&self, text_value: &str) -> Option<Decimal> {
        self.range_for_label(text_value).map(Range::effective_end)
    }

    /// Label for `value`, or a classification error naming this system.
    pub fn classify(&self, value: Decimal) -> Result<&str> {
        self.text_value_for(value).ok_or_else(|| GradeError::Classification {
            value,
            system: self.id.clone(),
        })
    }

    /// Pairs of labels whose ranges share at least one value.
    ///
    /// Lookups tolerate overlap (first match wins); this is for loaders that
    /// want to report malformed definitions.
    pub fn overlapping_ranges(&self) -> Vec<(String, String)> {
        let mut overlaps = Vec::new();
        for (i, a) in self.ranges.iter().enumerate() {
            for b in &self.ranges[i + 1..] {
                if b.effective_start() > a.effective_end() {
                    break;
                }
                if a.overlaps(b) {
                    overlaps.push((a.text_value().to_string(), b.text_value().to_string()));
                }
            }
        }
        overlaps
    }

    /// Labels that appear on more than one range (case-insensitive).
    pub fn duplicate_labels(&self) -> Vec<String> {
        let mut seen = HashMap::new();
        for range in &self.ranges {
            *seen.entry(range.text_value().to_uppercase()).or_insert(0usize) += 1;
        }
        let mut duplicates: Vec<String> = seen
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(label, _)| label)
            .collect();
        duplicates.sort();
        duplicates
    }
}

impl PartialEq for GradingSystem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.description == other.description
            && self.category == other.category
            && self.system_type == other.system_type
            && self.name == other.name
            && self.variant == other.variant
            && self.ranges == other.ranges
    }
}

impl fmt::Display for GradingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ranges)", self.id, self.ranges.len())
    }
}

#[derive(Debug, Default, Clone)]
pub struct GradingSystemBuilder {
    id: String,
    description: String,
    category: String,
    system_type: String,
    name: String,
    variant: String,
    ranges: Vec<Range>,
}

impl GradingSystemBuilder {
    /// Starts from an existing system so a variant can be derived from it.
    pub fn from_system(system: &GradingSystem) -> Self {
        Self {
            id: system.id.clone(),
            description: system.description.clone(),
            category: system.category.clone(),
            system_type: system.system_type.clone(),
            name: system.name.clone(),
            variant: system.variant.clone(),
            ranges: system.ranges(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn system_type(mut self, system_type: impl Into<String>) -> Self {
        self.system_type = system_type.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    pub fn range(mut self, range: Range) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn ranges(mut self, ranges: impl IntoIterator<Item = Range>) -> Self {
        self.ranges = ranges.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<GradingSystem> {
        if self.id.trim().is_empty() {
            return Err(GradeError::InvalidArgument(
                "grading system id must not be empty".to_string(),
            ));
        }
        Ok(GradingSystem::new(
            self.id,
            self.description,
            self.category,
            self.system_type,
            self.name,
            self.variant,
            self.ranges,
        ))
    }
}

/// On-disk shape of a grading system.
#[derive(Debug, Serialize, Deserialize)]
struct GradingSystemDefinition {
    id: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(rename = "type", default)]
    system_type: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    variant: String,
    #[serde(default)]
    ranges: Vec<Range>,
}

impl From<GradingSystemDefinition> for GradingSystem {
    fn from(def: GradingSystemDefinition) -> Self {
        GradingSystem::new(
            def.id,
            def.description,
            def.category,
            def.system_type,
            def.name,
            def.variant,
            def.ranges,
        )
    }
}

impl From<GradingSystem> for GradingSystemDefinition {
    fn from(system: GradingSystem) -> Self {
        Self {
            id: system.id,
            description: system.description,
            category: system.category,
            system_type: system.system_type,
            name: system.name,
            variant: system.variant,
            ranges: system.ranges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::range::EPSILON;
    use rust_decimal_macros::dec;

    fn letter_system() -> GradingSystem {
        GradingSystem::builder()
            .id("academic.percent.letter.test")
            .system_type("percent")
            // deliberately out of order
            .range(Range::new("C", dec!(70), dec!(80), true, false, PerformanceLevel::Medium).unwrap())
            .range(Range::new("A", dec!(90), dec!(100), true, true, PerformanceLevel::Top).unwrap())
            .range(Range::new("B", dec!(80), dec!(90), true, false, PerformanceLevel::High).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_ranges_sorted_by_effective_start() {
        let labels: Vec<String> = letter_system()
            .ranges()
            .iter()
            .map(|r| r.text_value().to_string())
            .collect();
        assert_eq!(labels, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_text_value_for() {
        let system = letter_system();
        assert_eq!(system.text_value_for(dec!(92.5)), Some("A"));
        assert_eq!(system.text_value_for(dec!(90)), Some("A"));
        assert_eq!(system.text_value_for(dec!(89.999999999)), Some("B"));
        assert_eq!(system.text_value_for(dec!(83.75)), Some("B"));
        assert_eq!(system.text_value_for(dec!(69)), None);
        assert_eq!(system.text_value_for(dec!(100) + EPSILON), None);
    }

    #[test]
    fn test_performance_level_for() {
        let system = letter_system();
        assert_eq!(system.performance_level_for(dec!(75)), Some(PerformanceLevel::Medium));
        assert_eq!(system.performance_level_for(dec!(10)), None);
    }

    #[test]
    fn test_reverse_lookup_matches_effective_bounds() {
        let system = letter_system();
        for range in system.ranges() {
            let label = range.text_value();
            assert_eq!(system.start_value_for(label), Some(range.effective_start()));
            assert_eq!(system.mid_value_for(label), Some(range.effective_mid()));
            assert_eq!(system.end_value_for(label), Some(range.effective_end()));
            assert_eq!(system.text_value_for(range.effective_start()), Some(label));
            assert_eq!(system.text_value_for(range.effective_mid()), Some(label));
            assert_eq!(system.text_value_for(range.effective_end()), Some(label));
        }
    }

    #[test]
    fn test_reverse_lookup_is_case_insensitive() {
        let system = GradingSystem::builder()
            .id("pf")
            .range(Range::new("Pass", dec!(60), dec!(100), true, true, PerformanceLevel::Top).unwrap())
            .build()
            .unwrap();
        assert_eq!(system.start_value_for("PASS"), Some(dec!(60)));
        assert_eq!(system.end_value_for("pass"), Some(dec!(100)));
        assert_eq!(system.mid_value_for("fail"), None);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let system = GradingSystem::builder()
            .id("overlap")
            .range(Range::new("LOW", dec!(0), dec!(60), true, true, PerformanceLevel::Low).unwrap())
            .range(Range::new("HIGH", dec!(50), dec!(100), true, true, PerformanceLevel::High).unwrap())
            .build()
            .unwrap();
        assert_eq!(system.text_value_for(dec!(55)), Some("LOW"));
        assert_eq!(
            system.overlapping_ranges(),
            vec![("LOW".to_string(), "HIGH".to_string())]
        );
    }

    #[test]
    fn test_well_formed_system_has_no_overlap() {
        assert!(letter_system().overlapping_ranges().is_empty());
        assert!(letter_system().duplicate_labels().is_empty());
    }

    #[test]
    fn test_classify_error_names_system() {
        let err = letter_system().classify(dec!(12)).unwrap_err();
        match err {
            GradeError::Classification { value, system } => {
                assert_eq!(value, dec!(12));
                assert_eq!(system, "academic.percent.letter.test");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_builder_requires_id() {
        assert!(GradingSystem::builder().name("x").build().is_err());
    }

    #[test]
    fn test_builder_from_system() {
        let base = letter_system();
        let variant = GradingSystemBuilder::from_system(&base)
            .id("academic.percent.letter.copy")
            .build()
            .unwrap();
        assert_eq!(variant.ranges(), base.ranges());
        assert_ne!(variant, base);
    }

    #[test]
    fn test_is_type() {
        assert!(letter_system().is_type(GradingSystemType::Percent));
        assert!(!letter_system().is_type(GradingSystemType::Rating));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(letter_system()).unwrap();
        assert_eq!(json["type"], "percent");
        assert_eq!(json["ranges"][0]["textValue"], "C");
        assert_eq!(json["ranges"][0]["startValueInclusive"], true);

        let back: GradingSystem = serde_json::from_value(json).unwrap();
        assert_eq!(back, letter_system());
        assert_eq!(back.text_value_for(dec!(95)), Some("A"));
    }
}
