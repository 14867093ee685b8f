//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

use super::group::SearchType;

// ============================================================================
// Top-Level Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

pub fn search_type() -> SearchType {
    SearchType::default()
}

// ============================================================================
// [[groups]] Section Defaults
// ============================================================================

pub mod group {
    pub fn path() -> String {
        "{group}/{title}".into()
    }

    pub fn page_layout() -> String {
        "index".into()
    }

    pub fn extension() -> String {
        ".html".into()
    }
}
