use super::{Grader, GraderCore};
use crate::error::Result;
use crate::model::{GradeValue, GradingSystem};
use crate::registry::GradingSystemRegistry;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Classifies a single number as-is.
#[derive(Debug, Clone)]
pub struct NumberGrader {
    core: GraderCore,
}

impl NumberGrader {
    pub fn new(system: Arc<GradingSystem>, registry: Option<Arc<GradingSystemRegistry>>) -> Self {
        Self {
            core: GraderCore::new(system, registry),
        }
    }
}

impl Grader<Decimal> for NumberGrader {
    fn grade(&self, input: &Decimal) -> Result<GradeValue> {
        self.core.grade_value_for(*input)
    }

    fn grading_system(&self) -> &GradingSystem {
        self.core.system()
    }
}
