//! Well-known grading system ids and the definitions shipped with the crate.

mod bundled;
mod z;

pub use bundled::{bundled_definition, bundled_grading_system, bundled_grading_systems};
pub use z::{ZLevel, z_grading_system};

/// Registration alias of the current default system.
pub const DEFAULT_GRADING_SYSTEM: &str = "default";

pub const Z_SYSTEM: &str = "general.percent.z-system.us";
pub const STANDARD_ACADEMIC_FRANCE_SYSTEM: &str = "academic.percent.standard.fr";
pub const STANDARD_ACADEMIC_JAPAN_SYSTEM: &str = "academic.percent.standard.jp";
pub const STANDARD_ACADEMIC_PERU_SYSTEM: &str = "academic.percent.standard.pe";
pub const STANDARD_ACADEMIC_RUSSIA_SYSTEM: &str = "academic.percent.standard.ru";
pub const STANDARD_ACADEMIC_SYSTEM: &str = "academic.percent.standard.us";
pub const BINARY_PASS_FAIL_SYSTEM: &str = "general.binary.pass-fail.us";
pub const CHESS_ELO_SYSTEM: &str = "game.rating.chess.elo";
pub const CHESS_USCF_SYSTEM: &str = "game.rating.chess.uscf";
pub const FIVE_STAR_RATING_SYSTEM: &str = "general.rating.five-star.us";
pub const STANDARD_GPA_PLUS_MINUS_ACADEMIC_SYSTEM: &str = "academic.gpa.standard-plus-minus.us";
pub const PERCENT_PASS_FAIL_SYSTEM: &str = "general.percent.pass-fail.us";
pub const STANDARD_PLUS_MINUS_ACADEMIC_SYSTEM: &str = "academic.percent.standard-plus-minus.us";
pub const POOR_TO_EXCELLENT_SYSTEM: &str = "general.percent.poor-to-excellent.us";
pub const RESTAURANT_INSPECTION_SYSTEM: &str = "restaurant.rating.inspection.us";
pub const RESTAURANT_MICHELIN_SYSTEM: &str = "restaurant.rating.michelin.us";
pub const SEVEN_STAR_RATING_SYSTEM: &str = "general.rating.seven-star.us";
pub const THREE_STAR_RATING_SYSTEM: &str = "general.rating.three-star.us";
pub const WIN_DRAW_LOSE_SYSTEM: &str = "general.ternary.win-draw-lose.us";

/// Every bundled system id, Z last.
pub const GRADING_SYSTEM_IDS: [&str; 19] = [
    STANDARD_ACADEMIC_FRANCE_SYSTEM,
    STANDARD_ACADEMIC_JAPAN_SYSTEM,
    STANDARD_ACADEMIC_PERU_SYSTEM,
    STANDARD_ACADEMIC_RUSSIA_SYSTEM,
    STANDARD_ACADEMIC_SYSTEM,
    BINARY_PASS_FAIL_SYSTEM,
    CHESS_ELO_SYSTEM,
    CHESS_USCF_SYSTEM,
    FIVE_STAR_RATING_SYSTEM,
    STANDARD_GPA_PLUS_MINUS_ACADEMIC_SYSTEM,
    PERCENT_PASS_FAIL_SYSTEM,
    STANDARD_PLUS_MINUS_ACADEMIC_SYSTEM,
    POOR_TO_EXCELLENT_SYSTEM,
    RESTAURANT_INSPECTION_SYSTEM,
    RESTAURANT_MICHELIN_SYSTEM,
    SEVEN_STAR_RATING_SYSTEM,
    THREE_STAR_RATING_SYSTEM,
    WIN_DRAW_LOSE_SYSTEM,
    Z_SYSTEM,
];
