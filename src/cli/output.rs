//! Output formatting for CLI

use crate::q_learning::{ACTION_COUNT, Action};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a rate in `[0, 1]` as a percentage
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print one line per action with its learned value.
///
/// Expects display values, where both sentinels read as `0.0`; an illegal
/// action is therefore shown as `0.0000`.
pub fn print_action_values(values: &[f64; ACTION_COUNT], best: Option<Action>) {
    for action in Action::ALL {
        let marker = if best == Some(action) { " *" } else { "" };
        print_kv(
            action.name(),
            &format!("{:.4}{marker}", values[action.index()]),
        );
    }
}
