// Benchmark measurement rows: raw (as decoded) and aggregated (post-filter means).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One decoded measurement row; the unit of aggregation input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSample {
    pub date: NaiveDate,
    /// Truncated (floor) hour of the measurement, 0..=23.
    pub hour_bucket: u8,
    pub application: String,
    pub frame_count: u32,
    pub duration_seconds: f64,
    pub avg_fps: f64,
    pub min_fps: f64,
    pub max_fps: f64,
    pub low_1_percent_fps: f64,
    pub low_01_percent_fps: f64,
}

impl RawSample {
    pub fn group_key(&self) -> GroupKey {
        (self.date, self.hour_bucket, self.application.clone())
    }
}

/// Aggregation grouping key: (date, hour bucket, application).
pub type GroupKey = (NaiveDate, u8, String);

/// One post-filtering output row: rounded means of the surviving samples in a group.
/// `frame_count` is the rounded mean of the members' frame counts, never a sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedGroup {
    pub date: NaiveDate,
    pub hour_bucket: u8,
    pub application: String,
    pub frame_count: i64,
    pub duration_seconds: i64,
    pub avg_fps: i64,
    pub min_fps: i64,
    pub max_fps: i64,
    pub low_1_percent_fps: i64,
    pub low_01_percent_fps: i64,
}

impl AggregatedGroup {
    /// Integer-cast pass-through for a single sample that skips filtering.
    /// Casts truncate toward zero; only the grouped path rounds its means.
    pub fn pass_through(sample: &RawSample) -> Self {
        Self {
            date: sample.date,
            hour_bucket: sample.hour_bucket,
            application: sample.application.clone(),
            frame_count: sample.frame_count as i64,
            duration_seconds: sample.duration_seconds as i64,
            avg_fps: sample.avg_fps as i64,
            min_fps: sample.min_fps as i64,
            max_fps: sample.max_fps as i64,
            low_1_percent_fps: sample.low_1_percent_fps as i64,
            low_01_percent_fps: sample.low_01_percent_fps as i64,
        }
    }
}

/// Named numeric summaries reported alongside the artifacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub avg_framerate: f64,
    pub min_framerate: f64,
    pub max_framerate: f64,
    pub total_frames: i64,
    pub total_time_seconds: i64,
}

impl SummaryStats {
    pub fn from_groups(groups: &[AggregatedGroup]) -> Self {
        if groups.is_empty() {
            return Self::default();
        }
        let n = groups.len() as f64;
        Self {
            avg_framerate: groups.iter().map(|g| g.avg_fps as f64).sum::<f64>() / n,
            min_framerate: groups.iter().map(|g| g.min_fps as f64).fold(f64::INFINITY, f64::min),
            max_framerate: groups
                .iter()
                .map(|g| g.max_fps as f64)
                .fold(f64::NEG_INFINITY, f64::max),
            total_frames: groups.iter().map(|g| g.frame_count).sum(),
            total_time_seconds: groups.iter().map(|g| g.duration_seconds).sum(),
        }
    }

    /// Fallback when every record was filtered out and no groups exist.
    pub fn from_samples(samples: &[RawSample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f64;
        Self {
            avg_framerate: samples.iter().map(|s| s.avg_fps).sum::<f64>() / n,
            min_framerate: samples.iter().map(|s| s.min_fps).fold(f64::INFINITY, f64::min),
            max_framerate: samples.iter().map(|s| s.max_fps).fold(f64::NEG_INFINITY, f64::max),
            total_frames: samples.iter().map(|s| s.frame_count as i64).sum(),
            total_time_seconds: samples.iter().map(|s| s.duration_seconds).sum::<f64>().round()
                as i64,
        }
    }
}
