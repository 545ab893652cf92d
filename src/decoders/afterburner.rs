// Legacy MSI Afterburner decoder: fixed six-line text records with no
// structural delimiter other than line position. Tolerant of individual bad
// blocks; decoding continues with the next block.

use chrono::NaiveDate;

use crate::aggregate;
use crate::detect::FormatTag;
use crate::models::{AggregatedGroup, RawSample};

use super::{DecodeError, DecodeReport, Decoder};

/// Lines per record: a header line plus five labelled metric lines
/// (avg / min / max / 1% low / 0.1% low, in that order).
const BLOCK_LINES: usize = 6;

pub struct AfterburnerDecoder;

impl Decoder for AfterburnerDecoder {
    fn format(&self) -> FormatTag {
        FormatTag::LegacyAfterburner
    }

    fn describe(&self) -> &'static str {
        "MSI Afterburner benchmark text (six-line records)"
    }

    fn sniff(&self, content: &str) -> bool {
        content
            .lines()
            .any(|l| l.contains("completed,") && l.contains("frames"))
    }

    fn decode(&self, content: &str) -> Result<DecodeReport, DecodeError> {
        let lines: Vec<&str> = content.lines().collect();
        let mut report = DecodeReport::default();

        for (block, start) in (0..lines.len()).step_by(BLOCK_LINES).enumerate() {
            if start + BLOCK_LINES > lines.len() {
                report.skip(block, "truncated block");
                continue;
            }
            match parse_block(&lines[start..start + BLOCK_LINES]) {
                Ok(sample) => report.samples.push(sample),
                Err(reason) => report.skip(block, reason),
            }
        }
        // Zero valid blocks is an empty record set, not a decode error;
        // the orchestrator decides what that means.
        Ok(report)
    }

    fn supported_extensions(&self) -> &'static [&'static str] {
        &[".txt", ".benchmark"]
    }

    fn aggregate(&self, samples: &[RawSample]) -> Vec<AggregatedGroup> {
        aggregate::filter_and_group(samples)
    }
}

fn parse_block(lines: &[&str]) -> Result<RawSample, &'static str> {
    let tokens: Vec<&str> = lines[0].split(' ').collect();

    let date_string: String = tokens
        .first()
        .ok_or("empty header line")?
        .replace(',', "")
        .replace('\u{0}', "");
    let date = NaiveDate::parse_from_str(date_string.trim(), "%d-%m-%Y")
        .map_err(|_| "unparseable date")?;

    let time_token = tokens.get(1).ok_or("missing time token")?;
    let hour_bucket: u8 = time_token
        .get(..2)
        .and_then(|h| h.parse().ok())
        .ok_or("unparseable time")?;

    let application = find_application(&tokens);

    let completed = tokens
        .iter()
        .position(|t| t.contains("completed,"))
        .ok_or("missing completed marker")?;
    if completed + 5 >= tokens.len() {
        return Err("short header after completed marker");
    }
    let frame_count: u32 = tokens[completed + 1]
        .parse()
        .map_err(|_| "unparseable frame count")?;
    let duration_seconds: f64 = tokens[completed + 5]
        .parse()
        .map_err(|_| "unparseable duration")?;

    let avg_fps = metric_value(lines[1]).ok_or("unparseable average framerate")?;
    let min_fps = metric_value(lines[2]).ok_or("unparseable minimum framerate")?;
    let max_fps = metric_value(lines[3]).ok_or("unparseable maximum framerate")?;
    let low_1_percent_fps = metric_value(lines[4]).ok_or("unparseable 1% low")?;
    let low_01_percent_fps = metric_value(lines[5]).ok_or("unparseable 0.1% low")?;

    Ok(RawSample {
        date,
        hour_bucket,
        application,
        frame_count,
        duration_seconds,
        avg_fps,
        min_fps,
        max_fps,
        low_1_percent_fps,
        low_01_percent_fps,
    })
}

/// First token carrying the executable marker, with the marker stripped;
/// falls back to the first non-whitespace token after position 1.
fn find_application(tokens: &[&str]) -> String {
    for (j, part) in tokens.iter().enumerate() {
        if !part.is_empty() && part.contains(".exe") {
            return part.replace(".exe", "").trim().to_string();
        }
        if j > 1 && !part.trim().is_empty() {
            return part.trim().to_string();
        }
    }
    "Unknown".to_string()
}

/// Labelled metric line: `label : 123,4 FPS`. Comma decimal separators are
/// normalized and the FPS suffix stripped.
fn metric_value(line: &str) -> Option<f64> {
    let value = line.splitn(2, ':').nth(1)?;
    value
        .trim()
        .replace("FPS", "")
        .replace(',', ".")
        .trim()
        .parse()
        .ok()
}
