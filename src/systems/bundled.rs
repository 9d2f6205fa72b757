use super::*;
use crate::error::{GradeError, Result};
use crate::model::GradingSystem;
use crate::persist::parse_grading_system;

macro_rules! definition {
    ($id:literal) => {
        ($id, include_str!(concat!("../../resources/grading-systems/", $id, ".json")))
    };
}

/// JSON definitions compiled into the binary, keyed by id.
const DEFINITIONS: [(&str, &str); 18] = [
    definition!("academic.percent.standard.fr"),
    definition!("academic.percent.standard.jp"),
    definition!("academic.percent.standard.pe"),
    definition!("academic.percent.standard.ru"),
    definition!("academic.percent.standard.us"),
    definition!("general.binary.pass-fail.us"),
    definition!("game.rating.chess.elo"),
    definition!("game.rating.chess.uscf"),
    definition!("general.rating.five-star.us"),
    definition!("academic.gpa.standard-plus-minus.us"),
    definition!("general.percent.pass-fail.us"),
    definition!("academic.percent.standard-plus-minus.us"),
    definition!("general.percent.poor-to-excellent.us"),
    definition!("restaurant.rating.inspection.us"),
    definition!("restaurant.rating.michelin.us"),
    definition!("general.rating.seven-star.us"),
    definition!("general.rating.three-star.us"),
    definition!("general.ternary.win-draw-lose.us"),
];

/// Raw JSON for a file-backed bundled system.
pub fn bundled_definition(id: &str) -> Option<&'static str> {
    DEFINITIONS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, json)| *json)
}

/// Parses one bundled system. The Z system is built in code.
pub fn bundled_grading_system(id: &str) -> Result<GradingSystem> {
    if id == Z_SYSTEM {
        return z_grading_system();
    }
    let json = bundled_definition(id).ok_or_else(|| GradeError::system_not_found(id))?;
    parse_grading_system(json)
}

/// Every bundled system paired with its parse result, in catalog order.
pub fn bundled_grading_systems() -> Vec<(&'static str, Result<GradingSystem>)> {
    GRADING_SYSTEM_IDS
        .iter()
        .map(|id| (*id, bundled_grading_system(id)))
        .collect()
}
