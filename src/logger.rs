//! Logging utilities with colored output.
//!
//! Provides the `log!` macro for formatted terminal output with colored
//! module prefixes. Messages go to stderr so that page-map JSON on
//! stdout stays clean for piping.
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "classified {} items", count);
//! ```

use colored::{ColoredString, Colorize};

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    eprintln!("{prefix} {message}");
}

/// Apply color to a module prefix based on module type.
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "check" => prefix.bright_blue().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_wraps_module_name() {
        let prefix = colorize_prefix("build", "build");
        assert!(prefix.to_string().contains("[build]"));
    }

    #[test]
    fn test_prefix_color_selection() {
        // color differs per module but the text is always the bracket form
        for module in ["check", "error", "build", "anything"] {
            let prefix = colorize_prefix(module, module);
            assert!(prefix.to_string().contains(&format!("[{module}]")));
        }
    }
}
