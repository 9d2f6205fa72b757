use super::{GradeValueAverageGrader, NumberAverageGrader, NumberGrader, WeightedAverageGrader};
use crate::error::{GradeError, Result};
use crate::model::GradingSystem;
use crate::registry::GradingSystemRegistry;
use std::sync::Arc;

/// Builds graders bound to systems looked up in one registry.
///
/// Every grader it creates shares that registry for input conversion.
#[derive(Debug, Clone)]
pub struct GraderFactory {
    registry: Arc<GradingSystemRegistry>,
}

impl GraderFactory {
    pub fn new(registry: Arc<GradingSystemRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<GradingSystemRegistry> {
        &self.registry
    }

    fn system(&self, id: &str) -> Result<Arc<GradingSystem>> {
        self.registry
            .lookup_system(id)
            .ok_or_else(|| GradeError::system_not_found(id))
    }

    fn shared_registry(&self) -> Option<Arc<GradingSystemRegistry>> {
        Some(Arc::clone(&self.registry))
    }

    pub fn create_number_grader(&self, id: &str) -> Result<NumberGrader> {
        Ok(NumberGrader::new(self.system(id)?, self.shared_registry()))
    }

    pub fn create_number_average_grader(&self, id: &str) -> Result<NumberAverageGrader> {
        Ok(NumberAverageGrader::new(self.system(id)?, self.shared_registry()))
    }

    pub fn create_grade_value_average_grader(&self, id: &str) -> Result<GradeValueAverageGrader> {
        Ok(GradeValueAverageGrader::new(self.system(id)?, self.shared_registry()))
    }

    pub fn create_weighted_average_grader(&self, id: &str) -> Result<WeightedAverageGrader> {
        Ok(WeightedAverageGrader::new(self.system(id)?, self.shared_registry()))
    }
}
