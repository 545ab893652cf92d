// Format sniffing: classify raw content into a format tag without an explicit
// file-type marker. Precedence is load-bearing; see `detect`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of leading lines the line heuristics look at.
const SNIFF_LINES: usize = 10;

/// Supported benchmark file families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    CapFrame,
    LegacyAfterburner,
    Generic,
}

impl FormatTag {
    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::CapFrame => "capframe",
            FormatTag::LegacyAfterburner => "afterburner",
            FormatTag::Generic => "generic",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies content into a format tag. Total: unrecognized content maps to
/// `Generic`. Evaluation order matters: a JSON document that lacks any of
/// the three CapFrameX keys falls through to the line heuristics even though
/// it looks like JSON.
pub fn detect(content: &str) -> FormatTag {
    let trimmed = content.trim();
    if trimmed.starts_with('{')
        && trimmed.ends_with('}')
        && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed)
        && map.contains_key("Hash")
        && map.contains_key("Info")
        && map.get("Runs").is_some_and(Value::is_array)
    {
        return FormatTag::CapFrame;
    }

    let lines: Vec<&str> = content.lines().take(SNIFF_LINES).collect();

    if lines.iter().any(|l| l.to_lowercase().contains("capframe")) {
        return FormatTag::CapFrame;
    }
    if lines
        .iter()
        .any(|l| l.contains("completed,") && l.contains("frames") && l.contains(".exe"))
    {
        return FormatTag::LegacyAfterburner;
    }
    // "completed, N frames" without an executable marker: generic table territory.
    FormatTag::Generic
}
