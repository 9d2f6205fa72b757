//! Core data model: ranges, grading systems, grade values and grades.

pub mod level;
pub mod range;
pub mod system;
pub mod value;

pub use level::PerformanceLevel;
pub use range::{EPSILON, Range, RangeBuilder};
pub use system::{GradingSystem, GradingSystemBuilder, GradingSystemType};
pub use value::{Grade, GradeBuilder, GradeRank, GradeReference, GradeValue};
