//! Identifier generation.

use uuid::Uuid;

/// Generates a 32 character lowercase hex identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
