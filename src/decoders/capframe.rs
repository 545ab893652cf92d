// CapFrameX decoder: one JSON document per capture session, cumulative frame
// timestamps per run. Produces exactly one sample per file; the cross-file
// pass happens later when a coalesced batch is aggregated.

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::Deserialize;
use serde_json::Value;

use crate::aggregate;
use crate::detect::FormatTag;
use crate::models::{AggregatedGroup, RawSample};

use super::{DecodeError, DecodeReport, Decoder};

#[derive(Debug, Deserialize)]
struct CapFrameFile {
    #[serde(rename = "Info", default)]
    info: Info,
    #[serde(rename = "Runs", default)]
    runs: Vec<Run>,
}

#[derive(Debug, Default, Deserialize)]
struct Info {
    #[serde(rename = "ProcessName")]
    process_name: Option<String>,
    #[serde(rename = "CreationDate")]
    creation_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Run {
    #[serde(rename = "CaptureData")]
    capture_data: Option<CaptureData>,
}

#[derive(Debug, Deserialize)]
struct CaptureData {
    #[serde(rename = "TimeInSeconds", default)]
    time_in_seconds: Vec<f64>,
}

pub struct CapFrameDecoder;

impl Decoder for CapFrameDecoder {
    fn format(&self) -> FormatTag {
        FormatTag::CapFrame
    }

    fn describe(&self) -> &'static str {
        "CapFrameX capture JSON (per-frame timestamps)"
    }

    fn sniff(&self, content: &str) -> bool {
        let trimmed = content.trim();
        if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
            return false;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => {
                map.contains_key("Hash")
                    && map.contains_key("Info")
                    && map.get("Runs").is_some_and(Value::is_array)
            }
            _ => false,
        }
    }

    fn decode(&self, content: &str) -> Result<DecodeReport, DecodeError> {
        let file: CapFrameFile = serde_json::from_str(content)?;
        if file.runs.is_empty() {
            return Err(DecodeError::NoRuns);
        }

        let mut report = DecodeReport::default();
        let mut timestamps: Vec<f64> = Vec::new();
        let mut total_duration = 0.0;

        for (idx, run) in file.runs.iter().enumerate() {
            match &run.capture_data {
                Some(capture) if !capture.time_in_seconds.is_empty() => {
                    timestamps.extend_from_slice(&capture.time_in_seconds);
                    // Each run's final cumulative timestamp is its duration.
                    if let Some(last) = capture.time_in_seconds.last() {
                        total_duration += *last;
                    }
                }
                _ => report.skip(idx, "run has no capture data"),
            }
        }

        if timestamps.len() < 2 {
            return Err(DecodeError::NoFrameData);
        }

        timestamps.sort_by(|a, b| a.total_cmp(b));
        let fps: Vec<f64> = timestamps
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|delta| *delta > 0.0)
            .map(|delta| 1.0 / delta)
            .collect();
        if fps.is_empty() {
            return Err(DecodeError::NoFrameData);
        }

        let avg_fps = fps.iter().sum::<f64>() / fps.len() as f64;
        let min_fps = fps.iter().copied().fold(f64::INFINITY, f64::min);
        let max_fps = fps.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut sorted_fps = fps;
        sorted_fps.sort_by(|a, b| a.total_cmp(b));

        let when = file
            .info
            .creation_date
            .as_deref()
            .and_then(parse_creation_date)
            .unwrap_or_else(|| Local::now().naive_local());

        let application = file
            .info
            .process_name
            .as_deref()
            .unwrap_or("Unknown")
            .replace(".exe", "");

        report.samples.push(RawSample {
            date: when.date(),
            hour_bucket: when.hour() as u8,
            application,
            frame_count: timestamps.len() as u32,
            duration_seconds: total_duration,
            avg_fps,
            min_fps,
            max_fps,
            low_1_percent_fps: low_percentile(&sorted_fps, 0.01).unwrap_or_default(),
            low_01_percent_fps: low_percentile(&sorted_fps, 0.001).unwrap_or_default(),
        });
        Ok(report)
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &[".json"]
    }

    fn requires_coalescing(&self) -> bool {
        true
    }

    fn aggregate(&self, samples: &[RawSample]) -> Vec<AggregatedGroup> {
        aggregate::filter_and_group(samples)
    }
}

/// Low-order percentile sample: the element at index `floor(n * fraction)` of
/// a sorted FPS series, clamped to the last element. Not an interpolated
/// percentile. `None` for an empty series.
pub fn low_percentile(sorted_fps: &[f64], fraction: f64) -> Option<f64> {
    let last = sorted_fps.len().checked_sub(1)?;
    let index = (sorted_fps.len() as f64 * fraction) as usize;
    Some(sorted_fps[index.min(last)])
}

/// ISO-8601 creation date; a trailing `Z` means UTC, an offset-less value is
/// taken as-is. Callers substitute the current time on failure rather than
/// failing the file.
fn parse_creation_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
