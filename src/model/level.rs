use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse performance tier attached to each range of a grading system.
///
/// Serialized as its display label ("Medium High", ...). Parsing is
/// case-insensitive and falls back to [`PerformanceLevel::None`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PerformanceLevel {
    Top,
    High,
    MediumHigh,
    Medium,
    MediumLow,
    Low,
    Bottom,
    #[default]
    None,
}

impl PerformanceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceLevel::Top => "Top",
            PerformanceLevel::High => "High",
            PerformanceLevel::MediumHigh => "Medium High",
            PerformanceLevel::Medium => "Medium",
            PerformanceLevel::MediumLow => "Medium Low",
            PerformanceLevel::Low => "Low",
            PerformanceLevel::Bottom => "Bottom",
            PerformanceLevel::None => "",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "TOP" => PerformanceLevel::Top,
            "HIGH" => PerformanceLevel::High,
            "MEDIUM HIGH" => PerformanceLevel::MediumHigh,
            "MEDIUM" => PerformanceLevel::Medium,
            "MEDIUM LOW" => PerformanceLevel::MediumLow,
            "LOW" => PerformanceLevel::Low,
            "BOTTOM" => PerformanceLevel::Bottom,
            _ => PerformanceLevel::None,
        }
    }
}

impl From<String> for PerformanceLevel {
    fn from(label: String) -> Self {
        PerformanceLevel::from_label(&label)
    }
}

impl From<PerformanceLevel> for String {
    fn from(level: PerformanceLevel) -> Self {
        level.label().to_string()
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
