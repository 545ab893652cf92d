// Report codec: serializes a dataset into the two byte artifacts.
// Never fails: serialization problems degrade to an empty artifact with a
// WARN log, and empty input still produces well-formed output.

use std::io::{Cursor, Write};

use zip::write::FileOptions;

use crate::models::{AggregatedGroup, RawSample, ReportArtifacts, SummaryStats};

/// Textual date format used in both artifacts.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Sheet names inside the workbook artifact.
pub const SHEET_RAW: &str = "raw_data.csv";
pub const SHEET_PROCESSED: &str = "processed.csv";
pub const SHEET_STATISTICS: &str = "statistics.csv";

const COLUMNS: [&str; 10] = [
    "Date",
    "Time",
    "Application",
    "Frames",
    "TimeTaken",
    "AverageFramerate",
    "MinFramerate",
    "MaxFramerate",
    "Low1Percent",
    "Low01Percent",
];

/// Encodes the dataset into the workbook and flat artifacts.
pub fn encode(
    raw: &[RawSample],
    processed: &[AggregatedGroup],
    stats: &SummaryStats,
) -> ReportArtifacts {
    let workbook = write_workbook(raw, processed, stats).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "workbook encoding failed; emitting empty artifact");
        Vec::new()
    });
    let flat = write_processed_sheet(processed).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "flat report encoding failed; emitting empty artifact");
        Vec::new()
    });
    ReportArtifacts { workbook, flat }
}

/// Zip archive of three named CSV sheets: raw view, processed view, statistics.
fn write_workbook(
    raw: &[RawSample],
    processed: &[AggregatedGroup],
    stats: &SummaryStats,
) -> anyhow::Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();

    writer.start_file(SHEET_RAW, options)?;
    writer.write_all(&write_raw_sheet(raw)?)?;

    writer.start_file(SHEET_PROCESSED, options)?;
    writer.write_all(&write_processed_sheet(processed)?)?;

    writer.start_file(SHEET_STATISTICS, options)?;
    writer.write_all(&write_statistics_sheet(stats)?)?;

    Ok(writer.finish()?.into_inner())
}

fn write_raw_sheet(raw: &[RawSample]) -> anyhow::Result<Vec<u8>> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(COLUMNS)?;
    for s in raw {
        w.write_record([
            s.date.format(DATE_FORMAT).to_string(),
            format!("{:02}", s.hour_bucket),
            s.application.clone(),
            s.frame_count.to_string(),
            s.duration_seconds.to_string(),
            s.avg_fps.to_string(),
            s.min_fps.to_string(),
            s.max_fps.to_string(),
            s.low_1_percent_fps.to_string(),
            s.low_01_percent_fps.to_string(),
        ])?;
    }
    Ok(w.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?)
}

/// Processed view; also the entire flat artifact. Header row is always
/// written so the empty case stays well-formed.
fn write_processed_sheet(processed: &[AggregatedGroup]) -> anyhow::Result<Vec<u8>> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(COLUMNS)?;
    for g in processed {
        w.write_record([
            g.date.format(DATE_FORMAT).to_string(),
            format!("{:02} h", g.hour_bucket),
            g.application.clone(),
            g.frame_count.to_string(),
            g.duration_seconds.to_string(),
            g.avg_fps.to_string(),
            g.min_fps.to_string(),
            g.max_fps.to_string(),
            g.low_1_percent_fps.to_string(),
            g.low_01_percent_fps.to_string(),
        ])?;
    }
    Ok(w.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?)
}

fn write_statistics_sheet(stats: &SummaryStats) -> anyhow::Result<Vec<u8>> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record([
        "AvgFramerate",
        "MinFramerate",
        "MaxFramerate",
        "TotalFrames",
        "TotalTimeSeconds",
    ])?;
    w.write_record([
        stats.avg_framerate.to_string(),
        stats.min_framerate.to_string(),
        stats.max_framerate.to_string(),
        stats.total_frames.to_string(),
        stats.total_time_seconds.to_string(),
    ])?;
    Ok(w.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?)
}
