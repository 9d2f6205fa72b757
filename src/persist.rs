//! JSON files for grading systems and grades.
//!
//! Field names follow the camelCase layout used by the bundled definitions
//! (`textValue`, `startValue`, `startValueInclusive`, ...). Files are written
//! pretty-printed.

use crate::error::Result;
use crate::model::{Grade, GradingSystem};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Parses a single grading system definition.
///
/// # Errors
///
/// Fails on malformed JSON or on a range whose effective start exceeds its
/// effective end.
pub fn parse_grading_system(json: &str) -> Result<GradingSystem> {
    Ok(serde_json::from_str(json)?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "Reading JSON");
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    debug!(path = %path.display(), "Writing JSON");
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn load_grading_system(path: impl AsRef<Path>) -> Result<GradingSystem> {
    read_json(path.as_ref())
}

/// Loads a JSON array of grading systems.
pub fn load_grading_systems(path: impl AsRef<Path>) -> Result<Vec<GradingSystem>> {
    read_json(path.as_ref())
}

pub fn save_grading_system(path: impl AsRef<Path>, system: &GradingSystem) -> Result<()> {
    write_json(path.as_ref(), system)
}

pub fn save_grading_systems(path: impl AsRef<Path>, systems: &[GradingSystem]) -> Result<()> {
    write_json(path.as_ref(), systems)
}

pub fn load_grade(path: impl AsRef<Path>) -> Result<Grade> {
    read_json(path.as_ref())
}

/// Loads a JSON array of grades.
pub fn load_grades(path: impl AsRef<Path>) -> Result<Vec<Grade>> {
    read_json(path.as_ref())
}

pub fn save_grade(path: impl AsRef<Path>, grade: &Grade) -> Result<()> {
    write_json(path.as_ref(), grade)
}

pub fn save_grades(path: impl AsRef<Path>, grades: &[Grade]) -> Result<()> {
    write_json(path.as_ref(), grades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GradeError;
    use crate::model::{GradeReference, PerformanceLevel, Range};
    use crate::systems::{self, STANDARD_ACADEMIC_SYSTEM};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn test_parse_defaults() {
        let json = r#"{
            "id": "tiny",
            "ranges": [
                { "textValue": "LOW", "startValue": 0, "endValue": 50, "endValueInclusive": true },
                { "textValue": "HIGH", "startValue": "50", "endValue": "100", "endValueInclusive": true, "performanceLevel": "top" }
            ]
        }"#;
        let system = parse_grading_system(json).unwrap();
        assert_eq!(system.id(), "tiny");
        assert_eq!(system.description(), "");
        assert_eq!(system.text_value_for(dec!(50)), Some("LOW"));
        assert_eq!(system.text_value_for(dec!(50.1)), Some("HIGH"));
        assert_eq!(system.text_value_for(dec!(100)), Some("HIGH"));
        assert_eq!(system.text_value_for(dec!(0)), None);

        let high = system.range_for_label("high").unwrap();
        assert_eq!(high.performance_level(), PerformanceLevel::Top);
        let low = system.range_for_label("LOW").unwrap();
        assert_eq!(low.performance_level(), PerformanceLevel::None);
        assert!(!low.start_inclusive());
        assert!(low.end_inclusive());
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let json = r#"{ "id": "bad", "ranges": [ { "textValue": "X", "startValue": 10, "endValue": 5 } ] }"#;
        assert!(matches!(parse_grading_system(json), Err(GradeError::Json(_))));
    }

    #[test]
    fn test_grading_system_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("system.json");
        let system = systems::bundled_grading_system(STANDARD_ACADEMIC_SYSTEM).unwrap();

        save_grading_system(&path, &system).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"startValueInclusive\""));
        assert!(text.contains("\"type\": \"percent\""));

        assert_eq!(load_grading_system(&path).unwrap(), system);
    }

    #[test]
    fn test_grading_systems_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("systems.json");
        let z = systems::z_grading_system().unwrap();
        let tiny = GradingSystem::builder()
            .id("tiny")
            .range(Range::builder().text_value("ALL").start(0).end(1).end_inclusive(true).build().unwrap())
            .build()
            .unwrap();

        save_grading_systems(&path, &[z.clone(), tiny.clone()]).unwrap();
        assert_eq!(load_grading_systems(&path).unwrap(), vec![z, tiny]);
    }

    #[test]
    fn test_grades_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grades.json");
        let grade = Grade::builder()
            .id("g1")
            .grade_type("exam")
            .description("midterm")
            .numeric_value(dec!(92.5))
            .text_value("A-")
            .grading_system("academic.percent.standard-plus-minus.us")
            .weight(dec!(0.3))
            .extension("room", "B12")
            .reference("student", GradeReference::new("s-1", "student").with_description("Ada"))
            .build()
            .unwrap();

        save_grades(&path, std::slice::from_ref(&grade)).unwrap();
        let loaded = load_grades(&path).unwrap();
        assert_eq!(loaded, vec![grade.clone()]);
        assert_eq!(loaded[0].reference("student").unwrap().description, "Ada");

        let single = dir.path().join("grade.json");
        save_grade(&single, &grade).unwrap();
        assert_eq!(load_grade(&single).unwrap(), grade);
    }

    #[test]
    fn test_grade_reads_original_field_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(
            &path,
            r#"{"id":"g","type":"quiz","numericValue":88,"textValue":"B+","gradingSystem":"s","timeStamp":"2021-03-04T05:06:07Z"}"#,
        )
        .unwrap();

        let grade = load_grade(&path).unwrap();
        assert_eq!(grade.numeric_value(), dec!(88));
        assert_eq!(grade.weight(), dec!(1));
        assert_eq!(grade.timestamp().to_rfc3339(), "2021-03-04T05:06:07+00:00");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = load_grades(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, GradeError::Io(_)));
    }
}
