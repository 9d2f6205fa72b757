use super::{GradeConverter, target_system};
use crate::error::Result;
use crate::model::GradeValue;
use crate::registry::GradingSystemRegistry;

/// Keeps the numeric value and re-derives the label on the target system.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumericValueBasedConverter;

impl GradeConverter for NumericValueBasedConverter {
    fn convert(
        &self,
        value: &GradeValue,
        target_id: &str,
        registry: &GradingSystemRegistry,
    ) -> Result<GradeValue> {
        let target = target_system(registry, target_id)?;
        let text_value = target.classify(value.numeric_value())?;
        Ok(GradeValue::new(value.numeric_value(), text_value, target.id()))
    }
}
