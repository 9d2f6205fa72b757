//! A single labeled interval of a grading system.

use crate::error::{GradeError, Result};
use crate::model::level::PerformanceLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Minimal unit used to turn an exclusive bound into its inclusive equivalent (1e-9).
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// A numeric interval mapped to a text label and a performance tier.
///
/// The effective bounds are the inclusive-equivalent bounds after applying
/// [`EPSILON`] to any exclusive side; they drive midpoint arithmetic and the
/// reverse (label to number) lookups. Ranges are immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeDefinition", into = "RangeDefinition")]
pub struct Range {
    text_value: String,
    start_value: Decimal,
    end_value: Decimal,
    start_inclusive: bool,
    end_inclusive: bool,
    performance_level: PerformanceLevel,
    effective_start: Decimal,
    effective_mid: Decimal,
    effective_end: Decimal,
}

impl Range {
    pub fn new(
        text_value: impl Into<String>,
        start_value: Decimal,
        end_value: Decimal,
        start_inclusive: bool,
        end_inclusive: bool,
        performance_level: PerformanceLevel,
    ) -> Result<Self> {
        let text_value = text_value.into();
        let overflow = |what: &str| {
            GradeError::InvalidArgument(format!("range '{text_value}': {what} is out of decimal range"))
        };
        let effective_start = if start_inclusive {
            start_value
        } else {
            start_value
                .checked_add(EPSILON)
                .ok_or_else(|| overflow("effective start"))?
        };
        let effective_end = if end_inclusive {
            end_value
        } else {
            end_value
                .checked_sub(EPSILON)
                .ok_or_else(|| overflow("effective end"))?
        };

        if effective_start > effective_end {
            return Err(GradeError::InvalidArgument(format!(
                "range '{text_value}': effective start {effective_start} is greater than effective end {effective_end}"
            )));
        }

        let effective_mid = if effective_start == effective_end {
            effective_start
        } else {
            effective_start
                .checked_add(effective_end)
                .and_then(|sum| sum.checked_div(Decimal::TWO))
                .ok_or_else(|| overflow("effective mid"))?
        };

        Ok(Self {
            text_value,
            start_value,
            end_value,
            start_inclusive,
            end_inclusive,
            performance_level,
            effective_start,
            effective_mid,
            effective_end,
        })
    }

    pub fn builder() -> RangeBuilder {
        RangeBuilder::default()
    }

    pub fn text_value(&self) -> &str {
        &self.text_value
    }

    pub fn start_value(&self) -> Decimal {
        self.start_value
    }

    pub fn end_value(&self) -> Decimal {
        self.end_value
    }

    pub fn start_inclusive(&self) -> bool {
        self.start_inclusive
    }

    pub fn end_inclusive(&self) -> bool {
        self.end_inclusive
    }

    pub fn performance_level(&self) -> PerformanceLevel {
        self.performance_level
    }

    pub fn effective_start(&self) -> Decimal {
        self.effective_start
    }

    pub fn effective_mid(&self) -> Decimal {
        self.effective_mid
    }

    pub fn effective_end(&self) -> Decimal {
        self.effective_end
    }

    /// Position of `value` relative to this range: `Less` when below it,
    /// `Greater` when above it, `Equal` when inside.
    pub fn compare_value(&self, value: Decimal) -> Ordering {
        let below = if self.start_inclusive {
            value < self.start_value
        } else {
            value <= self.start_value
        };
        if below {
            return Ordering::Less;
        }

        let above = if self.end_inclusive {
            value > self.end_value
        } else {
            value >= self.end_value
        };
        if above {
            return Ordering::Greater;
        }

        Ordering::Equal
    }

    pub fn in_range(&self, value: Decimal) -> bool {
        self.compare_value(value) == Ordering::Equal
    }

    /// True if some value lies in both ranges.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.effective_start <= other.effective_end && other.effective_start <= self.effective_end
    }
}

/// Builder mirroring the usual authoring defaults: start inclusive, end exclusive.
#[derive(Debug, Clone)]
pub struct RangeBuilder {
    text_value: String,
    start_value: Option<Decimal>,
    end_value: Option<Decimal>,
    start_inclusive: bool,
    end_inclusive: bool,
    performance_level: PerformanceLevel,
}

impl Default for RangeBuilder {
    fn default() -> Self {
        Self {
            text_value: String::new(),
            start_value: None,
            end_value: None,
            start_inclusive: true,
            end_inclusive: false,
            performance_level: PerformanceLevel::None,
        }
    }
}

impl RangeBuilder {
    pub fn text_value(mut self, text_value: impl Into<String>) -> Self {
        self.text_value = text_value.into();
        self
    }

    pub fn start(mut self, value: impl Into<Decimal>) -> Self {
        self.start_value = Some(value.into());
        self
    }

    pub fn end(mut self, value: impl Into<Decimal>) -> Self {
        self.end_value = Some(value.into());
        self
    }

    pub fn start_inclusive(mut self, inclusive: bool) -> Self {
        self.start_inclusive = inclusive;
        self
    }

    pub fn end_inclusive(mut self, inclusive: bool) -> Self {
        self.end_inclusive = inclusive;
        self
    }

    pub fn performance_level(mut self, level: PerformanceLevel) -> Self {
        self.performance_level = level;
        self
    }

    pub fn build(self) -> Result<Range> {
        let start = self.start_value.ok_or_else(|| {
            GradeError::InvalidArgument(format!("range '{}' has no start value", self.text_value))
        })?;
        let end = self.end_value.ok_or_else(|| {
            GradeError::InvalidArgument(format!("range '{}' has no end value", self.text_value))
        })?;
        Range::new(
            self.text_value,
            start,
            end,
            self.start_inclusive,
            self.end_inclusive,
            self.performance_level,
        )
    }
}

/// On-disk shape of a range.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeDefinition {
    #[serde(default)]
    text_value: String,
    start_value: Decimal,
    #[serde(default)]
    start_value_inclusive: bool,
    end_value: Decimal,
    #[serde(default)]
    end_value_inclusive: bool,
    #[serde(default)]
    performance_level: PerformanceLevel,
}

impl TryFrom<RangeDefinition> for Range {
    type Error = GradeError;

    fn try_from(def: RangeDefinition) -> Result<Self> {
        Range::new(
            def.text_value,
            def.start_value,
            def.end_value,
            def.start_value_inclusive,
            def.end_value_inclusive,
            def.performance_level,
        )
    }
}

impl From<Range> for RangeDefinition {
    fn from(range: Range) -> Self {
        Self {
            text_value: range.text_value,
            start_value: range.start_value,
            start_value_inclusive: range.start_inclusive,
            end_value: range.end_value,
            end_value_inclusive: range.end_inclusive,
            performance_level: range.performance_level,
        }
    }
}
