use std::path::Path;

use crate::error::Result;

const SIZE_UNITS: [&str; 4] = ["B", "kB", "MB", "GB"];

/// Scale a byte count by powers of 1000 and format it with three decimals,
/// e.g. `139.884 MB`. Returns an empty string past `GB`.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 {
        value /= 1000.0;
        unit += 1;
    }
    match SIZE_UNITS.get(unit) {
        Some(name) => format!("{:.3} {}", value, name),
        None => String::new(),
    }
}

/// Display form of a price: the raw amount, or `$0` when there is none.
pub fn format_amount(raw: &str) -> &str {
    if raw.is_empty() {
        "$0"
    } else {
        raw
    }
}

pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
