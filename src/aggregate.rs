// Shared noise-filtering and grouping policy, invoked by format decoders
// that receive more than one sample. Never fails; empty output is valid.

use std::collections::{BTreeMap, HashMap};

use crate::models::{AggregatedGroup, GroupKey, RawSample};

/// Records with a duration below this fraction of their group's mean are dropped.
pub const DURATION_RATIO_FLOOR: f64 = 0.8;

/// Records with an absolute duration z-score at or above this are dropped.
pub const ZSCORE_LIMIT: f64 = 3.0;

/// Full pipeline: duration-ratio filter, z-score outlier filter, then group
/// by (date, hour, application) and average. A single sample skips filtering
/// and passes through with integer-cast fields.
pub fn filter_and_group(samples: &[RawSample]) -> Vec<AggregatedGroup> {
    match samples {
        [] => Vec::new(),
        [only] => vec![AggregatedGroup::pass_through(only)],
        _ => {
            let survivors = duration_ratio_filter(samples);
            let survivors = zscore_filter(survivors);
            group_and_average(&survivors)
        }
    }
}

/// Drops samples whose duration is below `DURATION_RATIO_FLOOR` of the mean
/// duration of their (date, hour, application) group.
pub fn duration_ratio_filter(samples: &[RawSample]) -> Vec<RawSample> {
    let mut sums: HashMap<GroupKey, (f64, usize)> = HashMap::new();
    for s in samples {
        let e = sums.entry(s.group_key()).or_insert((0.0, 0));
        e.0 += s.duration_seconds;
        e.1 += 1;
    }
    samples
        .iter()
        .filter(|s| {
            let (sum, count) = sums[&s.group_key()];
            s.duration_seconds >= DURATION_RATIO_FLOOR * (sum / count as f64)
        })
        .cloned()
        .collect()
}

/// Drops samples with |z| >= `ZSCORE_LIMIT` over `duration_seconds`,
/// using the population standard deviation. A no-op for fewer than two
/// samples or zero deviation (guards division by zero / NaN propagation).
pub fn zscore_filter(samples: Vec<RawSample>) -> Vec<RawSample> {
    if samples.len() < 2 {
        return samples;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().map(|s| s.duration_seconds).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|s| (s.duration_seconds - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return samples;
    }
    samples
        .into_iter()
        .filter(|s| ((s.duration_seconds - mean) / std_dev).abs() < ZSCORE_LIMIT)
        .collect()
}

/// Groups by (date, hour, application) and takes the rounded arithmetic mean
/// of each numeric column. Output is sorted ascending by the group key.
pub fn group_and_average(samples: &[RawSample]) -> Vec<AggregatedGroup> {
    let mut by_key: BTreeMap<GroupKey, Vec<&RawSample>> = BTreeMap::new();
    for s in samples {
        by_key.entry(s.group_key()).or_default().push(s);
    }

    by_key
        .into_iter()
        .map(|((date, hour_bucket, application), members)| {
            let mean = |f: &dyn Fn(&RawSample) -> f64| -> i64 {
                mean_f64(&members.iter().map(|s| f(s)).collect::<Vec<_>>()).round() as i64
            };
            AggregatedGroup {
                date,
                hour_bucket,
                application,
                frame_count: mean(&|s| s.frame_count as f64),
                duration_seconds: mean(&|s| s.duration_seconds),
                avg_fps: mean(&|s| s.avg_fps),
                min_fps: mean(&|s| s.min_fps),
                max_fps: mean(&|s| s.max_fps),
                low_1_percent_fps: mean(&|s| s.low_1_percent_fps),
                low_01_percent_fps: mean(&|s| s.low_01_percent_fps),
            }
        })
        .collect()
}

fn mean_f64(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / (v.len() as f64)
}
