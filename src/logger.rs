//! Logging utilities with colored module prefixes.
//!
//! Provides the `log!` macro for formatted terminal output:
//!
//! ```ignore
//! log!("rss"; "wrote {} items", count);
//! // => [rss] wrote 12 items
//! ```

use colored::Colorize;

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

/// Color mapping for known module prefixes.
///
/// Unknown modules fall back to cyan so new call sites stay readable
/// without touching this table.
fn colorize_prefix(module: &str) -> colored::ColoredString {
    let prefix = format!("[{module}]");
    match module {
        "content" => prefix.yellow(),
        "json" => prefix.green(),
        "rss" => prefix.magenta(),
        "sitemap" => prefix.blue(),
        "serve" => prefix.bright_green(),
        "error" => prefix.red(),
        _ => prefix.cyan(),
    }
    .bold()
}

/// Print a single log line: `[module] message`.
pub fn log(module: &str, message: &str) {
    println!("{} {}", colorize_prefix(module), message);
}
