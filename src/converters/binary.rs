use super::{GradeConverter, target_system};
use crate::error::Result;
use crate::model::GradeValue;
use crate::registry::GradingSystemRegistry;
use rust_decimal::Decimal;

/// Maps a pass/fail binary value onto a percent scale: 1 becomes 100,
/// anything else becomes 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct BinaryToPercentConverter;

const PASS_PERCENT: Decimal = Decimal::ONE_HUNDRED;
const FAIL_PERCENT: Decimal = Decimal::ONE;

impl GradeConverter for BinaryToPercentConverter {
    fn convert(
        &self,
        value: &GradeValue,
        target_id: &str,
        registry: &GradingSystemRegistry,
    ) -> Result<GradeValue> {
        let target = target_system(registry, target_id)?;
        let numeric = if value.numeric_value() == Decimal::ONE {
            PASS_PERCENT
        } else {
            FAIL_PERCENT
        };
        let text_value = target.classify(numeric)?;
        Ok(GradeValue::new(numeric, text_value, target.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::{self, BINARY_PASS_FAIL_SYSTEM, PERCENT_PASS_FAIL_SYSTEM};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn registry() -> GradingSystemRegistry {
        let registry = GradingSystemRegistry::new();
        for id in [BINARY_PASS_FAIL_SYSTEM, PERCENT_PASS_FAIL_SYSTEM] {
            registry.register_system(id, Arc::new(systems::bundled_grading_system(id).unwrap()));
        }
        registry
    }

    #[test]
    fn test_pass_maps_to_hundred() {
        let value = GradeValue::new(dec!(1), "PASS", BINARY_PASS_FAIL_SYSTEM);
        let converted = BinaryToPercentConverter
            .convert(&value, PERCENT_PASS_FAIL_SYSTEM, &registry())
            .unwrap();
        assert_eq!(converted.numeric_value(), dec!(100));
        assert_eq!(converted.text_value(), "PASS");
        assert_eq!(converted.grading_system(), PERCENT_PASS_FAIL_SYSTEM);
    }

    #[test]
    fn test_fail_maps_to_one() {
        let value = GradeValue::new(dec!(0), "FAIL", BINARY_PASS_FAIL_SYSTEM);
        let converted = BinaryToPercentConverter
            .convert(&value, PERCENT_PASS_FAIL_SYSTEM, &registry())
            .unwrap();
        assert_eq!(converted.numeric_value(), dec!(1));
        assert_eq!(converted.text_value(), "FAIL");
    }
}
