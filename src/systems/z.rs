//! The Z system: fifteen percent-based tiers from ZM up to VP.

use super::Z_SYSTEM;
use crate::error::Result;
use crate::model::{GradingSystem, GradingSystemType, PerformanceLevel, Range};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const DESCRIPTION: &str = "A percent-based grading system consisting of five primary levels (V to Z)";
const CATEGORY: &str = "general";
const NAME: &str = "z-system";
const VARIANT: &str = "us";

/// Outer bound of the open-ended VP and ZM tiers.
const OUTER_BOUND: Decimal = Decimal::from_parts(i32::MAX as u32, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZLevel {
    TopPlus,
    Top,
    TopMinus,
    HighPlus,
    High,
    HighMinus,
    MediumPlus,
    Medium,
    MediumMinus,
    LowPlus,
    Low,
    LowMinus,
    BottomPlus,
    Bottom,
    BottomMinus,
}

impl ZLevel {
    /// Lowest tier first.
    pub const ORDERED: [ZLevel; 15] = [
        ZLevel::BottomMinus,
        ZLevel::Bottom,
        ZLevel::BottomPlus,
        ZLevel::LowMinus,
        ZLevel::Low,
        ZLevel::LowPlus,
        ZLevel::MediumMinus,
        ZLevel::Medium,
        ZLevel::MediumPlus,
        ZLevel::HighMinus,
        ZLevel::High,
        ZLevel::HighPlus,
        ZLevel::TopMinus,
        ZLevel::Top,
        ZLevel::TopPlus,
    ];

    pub fn text_value(self) -> &'static str {
        match self {
            ZLevel::TopPlus => "VP",
            ZLevel::Top => "V",
            ZLevel::TopMinus => "VM",
            ZLevel::HighPlus => "WP",
            ZLevel::High => "W",
            ZLevel::HighMinus => "WM",
            ZLevel::MediumPlus => "XP",
            ZLevel::Medium => "X",
            ZLevel::MediumMinus => "XM",
            ZLevel::LowPlus => "YP",
            ZLevel::Low => "Y",
            ZLevel::LowMinus => "YM",
            ZLevel::BottomPlus => "ZP",
            ZLevel::Bottom => "Z",
            ZLevel::BottomMinus => "ZM",
        }
    }

    /// 1 for VP through 15 for ZM.
    pub fn order(self) -> u8 {
        15 - Self::ORDERED
            .iter()
            .position(|level| *level == self)
            .unwrap_or_default() as u8
    }

    pub fn performance_level(self) -> PerformanceLevel {
        match self {
            ZLevel::TopPlus | ZLevel::Top | ZLevel::TopMinus => PerformanceLevel::Top,
            ZLevel::HighPlus | ZLevel::High | ZLevel::HighMinus => PerformanceLevel::High,
            ZLevel::MediumPlus => PerformanceLevel::MediumHigh,
            ZLevel::Medium => PerformanceLevel::Medium,
            ZLevel::MediumMinus => PerformanceLevel::MediumLow,
            ZLevel::LowPlus | ZLevel::Low | ZLevel::LowMinus => PerformanceLevel::Low,
            ZLevel::BottomPlus | ZLevel::Bottom | ZLevel::BottomMinus => PerformanceLevel::Bottom,
        }
    }

    /// `(start, end)` with the start always inclusive.
    fn bounds(self) -> (Decimal, Decimal) {
        let (start, end) = match self {
            ZLevel::TopPlus => return (Decimal::from(101), OUTER_BOUND),
            ZLevel::Top => (100, 101),
            ZLevel::TopMinus => (99, 100),
            ZLevel::HighPlus => (90, 99),
            ZLevel::High => (80, 90),
            ZLevel::HighMinus => (70, 80),
            ZLevel::MediumPlus => (60, 70),
            ZLevel::Medium => (50, 60),
            ZLevel::MediumMinus => (40, 50),
            ZLevel::LowPlus => (30, 40),
            ZLevel::Low => (20, 30),
            ZLevel::LowMinus => (10, 20),
            ZLevel::BottomPlus => (1, 10),
            ZLevel::Bottom => (0, 1),
            ZLevel::BottomMinus => return (-OUTER_BOUND, Decimal::ZERO),
        };
        (Decimal::from(start), Decimal::from(end))
    }

    /// Only VP includes its end value.
    fn end_inclusive(self) -> bool {
        self == ZLevel::TopPlus
    }

    pub fn range(self) -> Result<Range> {
        let (start, end) = self.bounds();
        Range::new(
            self.text_value(),
            start,
            end,
            true,
            self.end_inclusive(),
            self.performance_level(),
        )
    }

    fn contains(self, value: Decimal) -> bool {
        let (start, end) = self.bounds();
        value >= start && (value < end || (self.end_inclusive() && value == end))
    }

    /// Tier containing `value`, or `None` outside the system's span.
    ///
    /// The integer part picks where the scan starts; the scan itself uses
    /// the exact value.
    pub fn from_numeric(value: Decimal) -> Option<ZLevel> {
        let whole = value.trunc().to_i64().unwrap_or(if value.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });
        let start = if whole >= 90 {
            Self::ORDERED.len() - 5
        } else if whole >= 10 {
            (whole / 10) as usize
        } else {
            0
        };

        Self::ORDERED[start..]
            .iter()
            .copied()
            .find(|level| level.contains(value))
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<ZLevel> {
        let label = label.trim();
        Self::ORDERED
            .iter()
            .copied()
            .find(|level| level.text_value().eq_ignore_ascii_case(label))
    }
}

/// Builds the Z system from its tiers.
pub fn z_grading_system() -> Result<GradingSystem> {
    let ranges = ZLevel::ORDERED
        .iter()
        .rev()
        .map(|level| level.range())
        .collect::<Result<Vec<_>>>()?;

    Ok(GradingSystem::new(
        Z_SYSTEM,
        DESCRIPTION,
        CATEGORY,
        GradingSystemType::Percent.label(),
        NAME,
        VARIANT,
        ranges,
    ))
}
