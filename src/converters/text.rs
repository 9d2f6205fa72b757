use super::{GradeConverter, target_system};
use crate::error::{GradeError, Result};
use crate::model::GradeValue;
use crate::registry::GradingSystemRegistry;

/// Keeps the label and maps the number onto the target's range for that label.
///
/// A numeric value already inside the target range is kept; anything else is
/// snapped to the range's effective midpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextValueBasedConverter;

impl GradeConverter for TextValueBasedConverter {
    fn convert(
        &self,
        value: &GradeValue,
        target_id: &str,
        registry: &GradingSystemRegistry,
    ) -> Result<GradeValue> {
        let target = target_system(registry, target_id)?;
        let range = target
            .range_for_label(value.text_value())
            .ok_or_else(|| GradeError::label_not_found(value.text_value(), target.id()))?;

        let numeric = value.numeric_value();
        let numeric = if numeric < range.effective_start() || numeric > range.effective_end() {
            range.effective_mid()
        } else {
            numeric
        };

        Ok(GradeValue::new(numeric, value.text_value(), target.id()))
    }
}
