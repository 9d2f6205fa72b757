use super::{Grader, GraderCore};
use crate::error::{GradeError, Result};
use crate::model::{Grade, GradeValue, GradingSystem};
use crate::registry::GradingSystemRegistry;
use crate::stats;
use std::sync::Arc;

/// Classifies `Σ(weight · value) / Σ(weight)` over grades.
///
/// Grades are averaged on their own numeric scale; convert them first if
/// they come from another system.
#[derive(Debug, Clone)]
pub struct WeightedAverageGrader {
    core: GraderCore,
}

impl WeightedAverageGrader {
    pub fn new(system: Arc<GradingSystem>, registry: Option<Arc<GradingSystemRegistry>>) -> Self {
        Self {
            core: GraderCore::new(system, registry),
        }
    }
}

impl Grader<[Grade]> for WeightedAverageGrader {
    fn grade(&self, input: &[Grade]) -> Result<GradeValue> {
        let mean = stats::weighted_average(input).ok_or_else(|| {
            GradeError::CannotCompute(format!("weighted average of {} grades", input.len()))
        })?;
        self.core.grade_value_for(mean)
    }

    fn grading_system(&self) -> &GradingSystem {
        self.core.system()
    }
}
