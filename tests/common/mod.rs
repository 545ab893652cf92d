// Shared test fixtures

#![allow(dead_code)]

use benchreport::models::RawSample;
use chrono::NaiveDate;
use serde_json::json;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A sample with a fixed date and plausible FPS numbers; duration varies.
pub fn sample(application: &str, hour_bucket: u8, duration_seconds: f64) -> RawSample {
    RawSample {
        date: date(2023, 5, 1),
        hour_bucket,
        application: application.to_string(),
        frame_count: 5000,
        duration_seconds,
        avg_fps: 120.0,
        min_fps: 90.0,
        max_fps: 160.0,
        low_1_percent_fps: 85.0,
        low_01_percent_fps: 70.0,
    }
}

/// Minimal CapFrameX capture document with one timestamp array per run.
pub fn capframe_json(process_name: &str, creation_date: &str, runs: &[&[f64]]) -> String {
    let runs: Vec<_> = runs
        .iter()
        .map(|times| json!({ "CaptureData": { "TimeInSeconds": times } }))
        .collect();
    json!({
        "Hash": "d41d8cd98f00b204",
        "Info": { "ProcessName": process_name, "CreationDate": creation_date },
        "Runs": runs,
    })
    .to_string()
}

/// One six-line Afterburner record.
pub fn afterburner_block(
    date: &str,
    time: &str,
    exe: &str,
    frames: u32,
    duration: f64,
    fps: [&str; 5],
) -> String {
    format!(
        "{date}, {time} {exe} benchmark completed, {frames} frames rendered in {duration} s\n\
         Average framerate  : {} FPS\n\
         Minimum framerate  : {} FPS\n\
         Maximum framerate  : {} FPS\n\
         1% low framerate   : {} FPS\n\
         0.1% low framerate : {} FPS\n",
        fps[0], fps[1], fps[2], fps[3], fps[4]
    )
}
