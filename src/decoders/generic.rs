// Universal fallback decoder: tries comma-delimited, tab-delimited, then a
// JSON array of objects. Recognized column names map onto the uniform record;
// everything else defaults. Never raises.

use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::detect::FormatTag;
use crate::models::RawSample;

use super::{DecodeError, DecodeReport, Decoder};

pub struct GenericDecoder;

impl Decoder for GenericDecoder {
    fn format(&self) -> FormatTag {
        FormatTag::Generic
    }

    fn describe(&self) -> &'static str {
        "generic benchmark table (CSV, TSV, or JSON array)"
    }

    /// Universal fallback: claims everything.
    fn sniff(&self, _content: &str) -> bool {
        true
    }

    fn decode(&self, content: &str) -> Result<DecodeReport, DecodeError> {
        if let Some(report) = parse_delimited(content, b',') {
            return Ok(report);
        }
        if let Some(report) = parse_delimited(content, b'\t') {
            return Ok(report);
        }
        if let Some(report) = parse_json_array(content) {
            return Ok(report);
        }
        Ok(DecodeReport::default())
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &[".csv", ".tsv", ".json", ".txt"]
    }
}

/// Structurally valid when every row parses with a consistent column count
/// and there is at least one data row; anything else falls through to the
/// next interpretation.
fn parse_delimited(content: &str, delimiter: u8) -> Option<DecodeReport> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(content.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .ok()?
        .iter()
        .map(normalize_column)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return None;
    }

    let mut report = DecodeReport::default();
    for record in reader.records() {
        // A row that does not match the header width means this is not
        // really a table in this delimiter.
        let record = record.ok()?;
        let mut sample = default_sample();
        for (header, value) in headers.iter().zip(record.iter()) {
            assign_column(&mut sample, header, value);
        }
        report.samples.push(sample);
    }
    if report.samples.is_empty() {
        return None;
    }
    Some(report)
}

fn parse_json_array(content: &str) -> Option<DecodeReport> {
    let rows: Vec<Value> = serde_json::from_str(content).ok()?;
    let mut report = DecodeReport::default();
    for (row, value) in rows.iter().enumerate() {
        let Value::Object(map) = value else {
            report.skip(row, "array element is not an object");
            continue;
        };
        let mut sample = default_sample();
        for (key, value) in map {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            assign_column(&mut sample, &normalize_column(key), &rendered);
        }
        report.samples.push(sample);
    }
    Some(report)
}

fn default_sample() -> RawSample {
    RawSample {
        date: Local::now().date_naive(),
        hour_bucket: 0,
        application: "Unknown".to_string(),
        frame_count: 0,
        duration_seconds: 0.0,
        avg_fps: 0.0,
        min_fps: 0.0,
        max_fps: 0.0,
        low_1_percent_fps: 0.0,
        low_01_percent_fps: 0.0,
    }
}

/// Lowercased, alphanumerics only: "Average Framerate" and "avg_fps" style
/// headers both land on the same key.
fn normalize_column(raw: impl AsRef<str>) -> String {
    raw.as_ref()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn assign_column(sample: &mut RawSample, column: &str, value: &str) {
    let value = value.trim();
    match column {
        "date" => {
            if let Some(date) = parse_date(value) {
                sample.date = date;
            }
        }
        "time" | "hour" => {
            let head: String = value
                .chars()
                .take(2)
                .filter(|c| c.is_ascii_digit())
                .collect();
            if let Ok(hour) = head.parse() {
                sample.hour_bucket = hour;
            }
        }
        "application" | "app" | "process" => {
            if !value.is_empty() {
                sample.application = value.to_string();
            }
        }
        "frames" | "framecount" => {
            if let Ok(frames) = value.parse() {
                sample.frame_count = frames;
            }
        }
        "timetaken" | "duration" | "durationseconds" => {
            if let Ok(duration) = value.parse() {
                sample.duration_seconds = duration;
            }
        }
        "averageframerate" | "avgfps" => {
            if let Ok(fps) = value.parse() {
                sample.avg_fps = fps;
            }
        }
        "minframerate" | "minfps" => {
            if let Ok(fps) = value.parse() {
                sample.min_fps = fps;
            }
        }
        "maxframerate" | "maxfps" => {
            if let Ok(fps) = value.parse() {
                sample.max_fps = fps;
            }
        }
        "low1percent" | "low1percentfps" => {
            if let Ok(fps) = value.parse() {
                sample.low_1_percent_fps = fps;
            }
        }
        "low01percent" | "low01percentfps" => {
            if let Ok(fps) = value.parse() {
                sample.low_01_percent_fps = fps;
            }
        }
        _ => {}
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .ok()
}
