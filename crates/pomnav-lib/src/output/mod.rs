use crossterm::style::{Color, Stylize};
use serde::Serialize;

use crate::errors::Result;

/// Print a success message in green to stdout.
pub fn success(msg: &str) {
    println!("{}", msg.with(Color::Green));
}

/// Print an error message in red to stderr.
pub fn error(msg: &str) {
    eprintln!("{}", msg.with(Color::Red));
}

/// Print a warning message in yellow to stderr.
pub fn warning(msg: &str) {
    eprintln!("{}", msg.with(Color::Yellow));
}

/// Print an info message in cyan to stdout.
pub fn info(msg: &str) {
    println!("{}", msg.with(Color::Cyan));
}

/// Print a `label: value` line with the label dimmed.
pub fn field(label: &str, value: &str) {
    println!("{} {}", format!("{}:", label).with(Color::DarkGrey), value);
}

/// Print `value` as pretty JSON to stdout.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
