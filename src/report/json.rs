//! JSON rendering for split reports.

use super::SplitReport;
use crate::error::Result;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert one or more reports to JSON.
pub fn to_json(reports: &[SplitReport], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(reports)?,
        JsonFormat::Compact => serde_json::to_string(reports)?,
    };
    Ok(json)
}
