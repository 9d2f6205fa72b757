pub mod assessments;
pub mod book;
pub mod converters;
pub mod error;
pub mod graders;
pub mod ids;
pub mod manager;
pub mod model;
pub mod output;
pub mod persist;
pub mod registry;
pub mod scoring;
pub mod stats;
pub mod systems;

pub use assessments::AssessmentManager;
pub use error::{GradeError, Result};
pub use manager::GradeManager;
pub use model::{Grade, GradeRank, GradeValue, GradingSystem, PerformanceLevel, Range};
pub use registry::GradingSystemRegistry;
