//! Graders classify raw input into a [`GradeValue`] under one grading system.
//!
//! Every grader wraps a [`GraderCore`]: the bound system plus an optional
//! registry used to convert inputs tagged with another system. Conversion is
//! best effort; a missing converter or a failed conversion leaves the input
//! unchanged.

mod average;
mod factory;
mod number;
mod weighted;

pub use average::{GradeValueAverageGrader, NumberAverageGrader};
pub use factory::GraderFactory;
pub use number::NumberGrader;
pub use weighted::WeightedAverageGrader;

use crate::error::Result;
use crate::model::{GradeValue, GradingSystem};
use crate::registry::GradingSystemRegistry;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

pub trait Grader<I: ?Sized>: Send + Sync {
    /// Classifies `input` under the bound grading system.
    ///
    /// # Errors
    ///
    /// `CannotCompute` when an aggregate has no value, `Classification` when
    /// the result lies outside every range.
    fn grade(&self, input: &I) -> Result<GradeValue>;

    fn grading_system(&self) -> &GradingSystem;
}

#[derive(Debug, Clone)]
pub struct GraderCore {
    system: Arc<GradingSystem>,
    registry: Option<Arc<GradingSystemRegistry>>,
}

impl GraderCore {
    pub fn new(system: Arc<GradingSystem>, registry: Option<Arc<GradingSystemRegistry>>) -> Self {
        Self { system, registry }
    }

    pub fn system(&self) -> &GradingSystem {
        &self.system
    }

    pub fn registry(&self) -> Option<&GradingSystemRegistry> {
        self.registry.as_deref()
    }

    /// `value` expressed in the bound system when a converter allows it,
    /// otherwise `value` as given.
    pub fn convert(&self, value: &GradeValue) -> GradeValue {
        let target = self.system.id();
        if value.grading_system() == target {
            return value.clone();
        }
        let Some(registry) = self.registry.as_deref() else {
            return value.clone();
        };
        let Some(converter) = registry.lookup_converter(value.grading_system(), target) else {
            warn!(
                from = value.grading_system(),
                to = target,
                "No converter registered; using unconverted value"
            );
            return value.clone();
        };

        match converter.convert(value, target, registry) {
            Ok(converted) => converted,
            Err(e) => {
                warn!(
                    from = value.grading_system(),
                    to = target,
                    error = %e,
                    "Conversion failed; using unconverted value"
                );
                value.clone()
            }
        }
    }

    /// Classifies `numeric` and tags it with the bound system's id.
    pub fn grade_value_for(&self, numeric: Decimal) -> Result<GradeValue> {
        let text_value = self.system.classify(numeric)?;
        Ok(GradeValue::new(numeric, text_value, self.system.id()))
    }
}
