//! Diagnostic rendering for the CLI boundary: colorizes the category and
//! carries a one-line "at <span>" suffix per diagnostic.

use colored::Colorize;
use revive_common::{Diagnostic, DiagnosticCategory};

pub fn print_diagnostic(diagnostic: &Diagnostic) {
    let label = match diagnostic.category {
        DiagnosticCategory::Error => "error".red().bold(),
        DiagnosticCategory::Warning => "warning".yellow().bold(),
    };
    if diagnostic.span.is_synthetic() {
        eprintln!("{label}: {}", diagnostic.message);
    } else {
        eprintln!("{label}: {} (at {})", diagnostic.message, diagnostic.span);
    }
}
