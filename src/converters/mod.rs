//! Strategies that re-express a grade value under another grading system.
//!
//! Converters are stateless; the registry holding the target system is
//! passed in on each call so converters can themselves live in that registry.

mod binary;
mod numeric;
mod text;
mod z_five_star;

pub use binary::BinaryToPercentConverter;
pub use numeric::NumericValueBasedConverter;
pub use text::TextValueBasedConverter;
pub use z_five_star::ZSystemToFiveStarConverter;

use crate::error::{GradeError, Result};
use crate::model::{GradeValue, GradingSystem};
use crate::registry::GradingSystemRegistry;
use std::fmt::Debug;
use std::sync::Arc;

pub trait GradeConverter: Debug + Send + Sync {
    /// Converts `value` into the system registered under `target_id`.
    ///
    /// # Errors
    ///
    /// Fails if the target is not registered or a lookup on it fails.
    fn convert(
        &self,
        value: &GradeValue,
        target_id: &str,
        registry: &GradingSystemRegistry,
    ) -> Result<GradeValue>;
}

pub(crate) fn target_system(
    registry: &GradingSystemRegistry,
    target_id: &str,
) -> Result<Arc<GradingSystem>> {
    registry
        .lookup_system(target_id)
        .ok_or_else(|| GradeError::system_not_found(target_id))
}

/// Looks up a registered converter and applies it, surfacing both
/// not-found cases and any conversion failure.
pub fn convert_with_registry(
    registry: &GradingSystemRegistry,
    value: &GradeValue,
    target_id: &str,
) -> Result<GradeValue> {
    let converter = registry
        .lookup_converter(value.grading_system(), target_id)
        .ok_or_else(|| GradeError::ConverterNotFound {
            from: value.grading_system().to_string(),
            to: target_id.to_string(),
        })?;
    converter.convert(value, target_id, registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_with_registry_missing_converter() {
        let registry = GradingSystemRegistry::new();
        let value = GradeValue::new(dec!(1), "PASS", "from");
        match convert_with_registry(&registry, &value, "to") {
            Err(GradeError::ConverterNotFound { from, to }) => {
                assert_eq!(from, "from");
                assert_eq!(to, "to");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_convert_with_registry_missing_target() {
        let registry = GradingSystemRegistry::new();
        registry.register_converter("from", "to", Arc::new(NumericValueBasedConverter));
        let value = GradeValue::new(dec!(1), "PASS", "from");
        let err = convert_with_registry(&registry, &value, "to").unwrap_err();
        assert!(matches!(err, GradeError::GradingSystemNotFound { id } if id == "to"));
    }
}
