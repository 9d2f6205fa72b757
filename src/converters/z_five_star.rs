use super::{GradeConverter, target_system};
use crate::error::{GradeError, Result};
use crate::model::{GradeValue, GradingSystemType};
use crate::registry::GradingSystemRegistry;
use crate::systems::{Z_SYSTEM, ZLevel};

/// Buckets Z-system levels into a five-star rating, three levels per star.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZSystemToFiveStarConverter;

impl ZSystemToFiveStarConverter {
    fn star_label(level: ZLevel) -> &'static str {
        match level {
            ZLevel::TopPlus | ZLevel::Top | ZLevel::TopMinus => "5-STAR",
            ZLevel::HighPlus | ZLevel::High | ZLevel::HighMinus => "4-STAR",
            ZLevel::MediumPlus | ZLevel::Medium | ZLevel::MediumMinus => "3-STAR",
            ZLevel::LowPlus | ZLevel::Low | ZLevel::LowMinus => "2-STAR",
            ZLevel::BottomPlus | ZLevel::Bottom | ZLevel::BottomMinus => "1-STAR",
        }
    }
}

impl GradeConverter for ZSystemToFiveStarConverter {
    fn convert(
        &self,
        value: &GradeValue,
        target_id: &str,
        registry: &GradingSystemRegistry,
    ) -> Result<GradeValue> {
        if value.grading_system() != Z_SYSTEM {
            return Err(GradeError::InvalidArgument(format!(
                "expected a {Z_SYSTEM} value, got {}",
                value.grading_system()
            )));
        }

        let target = target_system(registry, target_id)?;
        if !target.is_type(GradingSystemType::Rating) {
            return Err(GradeError::InvalidArgument(format!(
                "target {} is a {} system, not a rating",
                target.id(),
                target.system_type()
            )));
        }

        let level = ZLevel::from_label(value.text_value())
            .ok_or_else(|| GradeError::label_not_found(value.text_value(), Z_SYSTEM))?;
        let label = Self::star_label(level);
        let numeric = target
            .end_value_for(label)
            .ok_or_else(|| GradeError::label_not_found(label, target.id()))?;

        Ok(GradeValue::new(numeric, label, target_id))
    }
}
