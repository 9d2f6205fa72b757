//! The grading context: registry, default system, graders and grade book.

use crate::book::{GradeBook, Managed, ManagedGrade};
use crate::converters::GradeConverter;
use crate::error::{GradeError, Result};
use crate::graders::{
    GradeValueAverageGrader, Grader, GraderFactory, NumberAverageGrader, NumberGrader,
    WeightedAverageGrader,
};
use crate::model::{Grade, GradeRank, GradeValue, GradingSystem};
use crate::registry::GradingSystemRegistry;
use crate::stats;
use crate::systems::{self, DEFAULT_GRADING_SYSTEM};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Graders bound to whichever system is currently the default.
#[derive(Debug, Clone)]
struct DefaultGraders {
    number: NumberGrader,
    average: NumberAverageGrader,
    rollup: GradeValueAverageGrader,
    weighted_rollup: WeightedAverageGrader,
}

impl DefaultGraders {
    fn bind(system: &Arc<GradingSystem>, registry: &Arc<GradingSystemRegistry>) -> Self {
        let registry = Some(Arc::clone(registry));
        Self {
            number: NumberGrader::new(Arc::clone(system), None),
            average: NumberAverageGrader::new(Arc::clone(system), registry.clone()),
            rollup: GradeValueAverageGrader::new(Arc::clone(system), registry.clone()),
            weighted_rollup: WeightedAverageGrader::new(Arc::clone(system), registry),
        }
    }
}

/// Owns everything a caller needs to grade, convert, rank and record.
///
/// The Z system is registered and made the default on construction.
/// [`GradeManager::set_default_system`] re-points the `"default"` alias and
/// every default grader at once.
#[derive(Debug)]
pub struct GradeManager {
    registry: Arc<GradingSystemRegistry>,
    factory: GraderFactory,
    book: GradeBook,
    management: BTreeMap<String, Value>,
    default_system: Arc<GradingSystem>,
    defaults: DefaultGraders,
}

impl GradeManager {
    pub fn new() -> Result<Self> {
        Self::with_parts(Arc::new(GradingSystemRegistry::new()), GradeBook::new(), BTreeMap::new())
    }

    pub fn with_management(management: BTreeMap<String, Value>) -> Result<Self> {
        Self::with_parts(Arc::new(GradingSystemRegistry::new()), GradeBook::new(), management)
    }

    pub fn with_parts(
        registry: Arc<GradingSystemRegistry>,
        book: GradeBook,
        management: BTreeMap<String, Value>,
    ) -> Result<Self> {
        let z = Arc::new(systems::z_grading_system()?);
        registry.register_system(z.id(), Arc::clone(&z));
        registry.register_system(DEFAULT_GRADING_SYSTEM, Arc::clone(&z));

        Ok(Self {
            factory: GraderFactory::new(Arc::clone(&registry)),
            defaults: DefaultGraders::bind(&z, &registry),
            default_system: z,
            registry,
            book,
            management,
        })
    }

    pub fn set_default_system(&mut self, system: Arc<GradingSystem>) {
        info!(system = system.id(), "Setting default grading system");
        self.registry
            .register_system(DEFAULT_GRADING_SYSTEM, Arc::clone(&system));
        self.defaults = DefaultGraders::bind(&system, &self.registry);
        self.default_system = system;
    }

    /// Makes an already registered system the default.
    pub fn set_default_system_id(&mut self, id: &str) -> Result<()> {
        let system = self.lookup_system(id)?;
        self.set_default_system(system);
        Ok(())
    }

    pub fn default_system(&self) -> &Arc<GradingSystem> {
        &self.default_system
    }

    pub fn registry(&self) -> &Arc<GradingSystemRegistry> {
        &self.registry
    }

    pub fn factory(&self) -> &GraderFactory {
        &self.factory
    }

    pub fn book(&self) -> &GradeBook {
        &self.book
    }

    pub fn management(&self) -> &BTreeMap<String, Value> {
        &self.management
    }

    /// Registers every bundled definition under its own id.
    ///
    /// Returns `true` when all of them loaded. Failures are logged and
    /// skipped; ranges that overlap are reported but still registered.
    #[tracing::instrument(skip(self), fields(registry = self.registry.registry_id()))]
    pub fn load_bundled_grading_systems(&self) -> bool {
        let mut failed = 0usize;
        for (id, result) in systems::bundled_grading_systems() {
            match result {
                Ok(system) => {
                    let overlaps = system.overlapping_ranges();
                    if !overlaps.is_empty() {
                        warn!(id, ?overlaps, "Bundled grading system has overlapping ranges");
                    }
                    self.registry.register_system(id, Arc::new(system));
                }
                Err(e) => {
                    failed += 1;
                    error!(id, error = %e, "Failed to load bundled grading system");
                }
            }
        }

        info!(
            registered = self.registry.system_count(),
            "Registered bundled grading systems"
        );
        if failed > 0 {
            warn!(failed, "Some bundled grading systems failed to load");
        }
        failed == 0
    }

    pub fn register_system(&self, id: impl Into<String>, system: Arc<GradingSystem>) {
        self.registry.register_system(id, system);
    }

    pub fn lookup_system(&self, id: &str) -> Result<Arc<GradingSystem>> {
        self.registry
            .lookup_system(id)
            .ok_or_else(|| GradeError::system_not_found(id))
    }

    pub fn systems(&self) -> Vec<Arc<GradingSystem>> {
        self.registry.registered_systems()
    }

    pub fn register_converter(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
        converter: Arc<dyn GradeConverter>,
    ) {
        self.registry.register_converter(from, to, converter);
    }

    pub fn lookup_converter(&self, from: &str, to: &str) -> Result<Arc<dyn GradeConverter>> {
        self.registry
            .lookup_converter(from, to)
            .ok_or_else(|| GradeError::ConverterNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Converts `value` into `target_id` with the registered converter.
    pub fn convert(&self, value: &GradeValue, target_id: &str) -> Result<GradeValue> {
        let converter = self.lookup_converter(value.grading_system(), target_id)?;
        converter.convert(value, target_id, &self.registry)
    }

    pub fn grade(&self, value: Decimal) -> Result<GradeValue> {
        self.defaults.number.grade(&value)
    }

    pub fn grade_with(&self, value: Decimal, system_id: &str) -> Result<GradeValue> {
        self.factory.create_number_grader(system_id)?.grade(&value)
    }

    pub fn grade_average(&self, values: &[Decimal]) -> Result<GradeValue> {
        self.defaults.average.grade(values)
    }

    pub fn grade_average_with(&self, values: &[Decimal], system_id: &str) -> Result<GradeValue> {
        self.factory
            .create_number_average_grader(system_id)?
            .grade(values)
    }

    pub fn grade_rollup(&self, values: &[GradeValue]) -> Result<GradeValue> {
        self.defaults.rollup.grade(values)
    }

    pub fn grade_rollup_with(&self, values: &[GradeValue], system_id: &str) -> Result<GradeValue> {
        self.factory
            .create_grade_value_average_grader(system_id)?
            .grade(values)
    }

    pub fn grade_weighted_rollup(&self, grades: &[Grade]) -> Result<GradeValue> {
        self.defaults.weighted_rollup.grade(grades)
    }

    pub fn grade_weighted_rollup_with(&self, grades: &[Grade], system_id: &str) -> Result<GradeValue> {
        self.factory
            .create_weighted_average_grader(system_id)?
            .grade(grades)
    }

    pub fn rank_hi_to_low(&self, grades: &[Grade]) -> Vec<GradeRank> {
        stats::rank_hi_to_low(grades)
    }

    pub fn rank_low_to_high(&self, grades: &[Grade]) -> Vec<GradeRank> {
        stats::rank_low_to_high(grades)
    }

    pub fn distribution<V: AsRef<GradeValue>>(&self, values: &[V]) -> Vec<(String, usize)> {
        stats::distribution(values)
    }

    fn manage(&self, grade: Grade) -> ManagedGrade {
        Managed::new(grade, self.management.clone())
    }

    /// Records a grade tagged with this manager's management info.
    pub fn record(&self, grade: Grade) -> Result<()> {
        debug!(id = grade.id(), book = self.book.name(), "Recording grade");
        self.book.record(self.manage(grade))
    }

    pub fn record_all(&self, grades: Vec<Grade>) -> Result<()> {
        let batch = grades.into_iter().map(|g| self.manage(g)).collect();
        self.book.record_all(batch)
    }

    pub fn find<F>(&self, search: F) -> Vec<Grade>
    where
        F: FnMut(&ManagedGrade) -> bool,
    {
        self.book.find(search).into_iter().map(|m| m.item).collect()
    }

    pub fn find_all(&self) -> Vec<Grade> {
        self.book.find_all().into_iter().map(|m| m.item).collect()
    }

    /// Erases the first entry equal to `grade` recorded by this manager.
    pub fn erase(&self, grade: &Grade) -> bool {
        self.book.erase(&self.manage(grade.clone()))
    }

    pub fn erase_where<F>(&self, search: F) -> Vec<Grade>
    where
        F: FnMut(&ManagedGrade) -> bool,
    {
        self.book
            .erase_where(search)
            .into_iter()
            .map(|m| m.item)
            .collect()
    }

    pub fn erase_all(&self) -> Vec<Grade> {
        self.book.erase_all().into_iter().map(|m| m.item).collect()
    }
}
