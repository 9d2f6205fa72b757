use super::{Grader, GraderCore};
use crate::error::{GradeError, Result};
use crate::model::{GradeValue, GradingSystem};
use crate::registry::GradingSystemRegistry;
use crate::stats;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Classifies the arithmetic mean of raw numbers.
#[derive(Debug, Clone)]
pub struct NumberAverageGrader {
    core: GraderCore,
}

impl NumberAverageGrader {
    pub fn new(system: Arc<GradingSystem>, registry: Option<Arc<GradingSystemRegistry>>) -> Self {
        Self {
            core: GraderCore::new(system, registry),
        }
    }
}

impl Grader<[Decimal]> for NumberAverageGrader {
    fn grade(&self, input: &[Decimal]) -> Result<GradeValue> {
        let mean = stats::average(input)
            .ok_or_else(|| GradeError::CannotCompute(format!("average of {} numbers", input.len())))?;
        self.core.grade_value_for(mean)
    }

    fn grading_system(&self) -> &GradingSystem {
        self.core.system()
    }
}

/// Converts each value into the bound system, then classifies their mean.
#[derive(Debug, Clone)]
pub struct GradeValueAverageGrader {
    core: GraderCore,
}

impl GradeValueAverageGrader {
    pub fn new(system: Arc<GradingSystem>, registry: Option<Arc<GradingSystemRegistry>>) -> Self {
        Self {
            core: GraderCore::new(system, registry),
        }
    }
}

impl Grader<[GradeValue]> for GradeValueAverageGrader {
    fn grade(&self, input: &[GradeValue]) -> Result<GradeValue> {
        let converted: Vec<GradeValue> = input.iter().map(|v| self.core.convert(v)).collect();
        let mean = stats::grade_average(&converted).ok_or_else(|| {
            GradeError::CannotCompute(format!("average of {} grade values", input.len()))
        })?;
        self.core.grade_value_for(mean)
    }

    fn grading_system(&self) -> &GradingSystem {
        self.core.system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::TextValueBasedConverter;
    use crate::systems::{self, STANDARD_ACADEMIC_SYSTEM, STANDARD_GPA_PLUS_MINUS_ACADEMIC_SYSTEM, STANDARD_PLUS_MINUS_ACADEMIC_SYSTEM};
    use rust_decimal_macros::dec;

    fn registry() -> Arc<GradingSystemRegistry> {
        let registry = Arc::new(GradingSystemRegistry::new());
        for id in [
            STANDARD_ACADEMIC_SYSTEM,
            STANDARD_PLUS_MINUS_ACADEMIC_SYSTEM,
            STANDARD_GPA_PLUS_MINUS_ACADEMIC_SYSTEM,
        ] {
            registry.register_system(id, Arc::new(systems::bundled_grading_system(id).unwrap()));
        }
        registry
    }

    #[test]
    fn test_number_average() {
        let registry = registry();
        let system = registry.lookup_system(STANDARD_PLUS_MINUS_ACADEMIC_SYSTEM).unwrap();
        let grader = NumberAverageGrader::new(system, Some(registry));
        let value = grader.grade(&[dec!(92.5), dec!(75)]).unwrap();
        assert_eq!(value.numeric_value(), dec!(83.75));
        assert_eq!(value.text_value(), "B");
    }

    #[test]
    fn test_number_average_empty() {
        let registry = registry();
        let system = registry.lookup_system(STANDARD_ACADEMIC_SYSTEM).unwrap();
        let grader = NumberAverageGrader::new(system, None);
        assert!(matches!(grader.grade(&[]), Err(GradeError::CannotCompute(_))));
    }

    #[test]
    fn test_grade_value_average_converts_inputs() {
        let registry = registry();
        registry.register_converter(
            STANDARD_PLUS_MINUS_ACADEMIC_SYSTEM,
            STANDARD_GPA_PLUS_MINUS_ACADEMIC_SYSTEM,
            Arc::new(TextValueBasedConverter),
        );
        let system = registry.lookup_system(STANDARD_GPA_PLUS_MINUS_ACADEMIC_SYSTEM).unwrap();
        let grader = GradeValueAverageGrader::new(system, Some(registry));

        let values = [
            GradeValue::new(dec!(92.5), "A-", STANDARD_PLUS_MINUS_ACADEMIC_SYSTEM),
            GradeValue::new(dec!(3.9), "A-", STANDARD_GPA_PLUS_MINUS_ACADEMIC_SYSTEM),
        ];
        let value = grader.grade(&values).unwrap();
        assert_eq!(value.numeric_value(), dec!(3.87499999975));
        assert_eq!(value.text_value(), "A-");
    }

    #[test]
    fn test_grade_value_average_unknown_source_uses_raw_numbers() {
        let registry = registry();
        let system = registry.lookup_system(STANDARD_ACADEMIC_SYSTEM).unwrap();
        let grader = GradeValueAverageGrader::new(system, Some(registry));

        let values = [
            GradeValue::new(dec!(80), "B", "unregistered.system"),
            GradeValue::new(dec!(90), "A", "unregistered.system"),
        ];
        let value = grader.grade(&values).unwrap();
        assert_eq!(value.numeric_value(), dec!(85));
        assert_eq!(value.text_value(), "B");
    }
}
