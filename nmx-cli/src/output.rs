//! Shared output formatting helpers.

use serde::Serialize;

/// Print a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A titled block of `key: value` lines with values aligned past the longest key.
pub fn format_kv(title: &str, rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(k, _)| k.len() + 1).max().unwrap_or(0);
    let mut out = format!("{title}\n");
    for (key, value) in rows {
        out.push_str(&format!("  {:<width$} {}\n", format!("{key}:"), value));
    }
    out
}

pub fn print_kv(title: &str, rows: &[(&str, String)]) {
    print!("{}", format_kv(title, rows));
}
