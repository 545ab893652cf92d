// Shared aggregation policy tests: ratio filter, z-score filter, grouping

mod common;

use benchreport::aggregate::{
    duration_ratio_filter, filter_and_group, group_and_average, zscore_filter,
};
use common::{date, sample};

#[test]
fn empty_input_yields_empty_output() {
    assert!(filter_and_group(&[]).is_empty());
}

#[test]
fn single_sample_passes_through_with_integer_casts() {
    // Pass-through truncates, it never rounds: 42.6 -> 42, 117.9 -> 117.
    let mut s = sample("game", 18, 42.6);
    s.avg_fps = 117.9;
    let groups = filter_and_group(&[s]);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].duration_seconds, 42);
    assert_eq!(groups[0].avg_fps, 117);
    assert_eq!(groups[0].frame_count, 5000);
}

#[test]
fn ratio_filter_drops_short_runs() {
    // Mean duration is 7; the 1-second run is below 0.8 * 7 and is dropped.
    let samples = vec![
        sample("game", 18, 10.0),
        sample("game", 18, 10.0),
        sample("game", 18, 1.0),
    ];
    let survivors = duration_ratio_filter(&samples);
    assert_eq!(survivors.len(), 2);
    assert!(survivors.iter().all(|s| s.duration_seconds == 10.0));
}

#[test]
fn ratio_filter_groups_independently() {
    // The short run in one group must not be judged against another group's mean.
    let samples = vec![
        sample("game", 18, 100.0),
        sample("other", 19, 1.0),
        sample("other", 19, 1.0),
    ];
    let survivors = duration_ratio_filter(&samples);
    assert_eq!(survivors.len(), 3);
}

#[test]
fn zscore_filter_is_noop_for_single_survivor() {
    let samples = vec![sample("game", 18, 10.0)];
    let out = zscore_filter(samples.clone());
    assert_eq!(out, samples);
}

#[test]
fn zscore_filter_is_noop_for_zero_deviation() {
    let samples = vec![sample("game", 18, 10.0), sample("game", 18, 10.0)];
    assert_eq!(zscore_filter(samples).len(), 2);
}

#[test]
fn zscore_filter_drops_extreme_outliers() {
    // 30 tight samples and one far outlier: population z of the outlier
    // exceeds 3 while the cluster stays within bounds.
    let mut samples: Vec<_> = (0..30)
        .map(|i| sample("game", 18, 10.0 + (i % 2) as f64 * 0.1))
        .collect();
    samples.push(sample("game", 18, 1000.0));
    let out = zscore_filter(samples);
    assert_eq!(out.len(), 30);
    assert!(out.iter().all(|s| s.duration_seconds < 100.0));
}

#[test]
fn grouping_averages_and_rounds_each_column() {
    let mut a = sample("game", 18, 10.0);
    a.frame_count = 100;
    a.avg_fps = 100.0;
    let mut b = sample("game", 18, 11.0);
    b.frame_count = 201;
    b.avg_fps = 120.0;
    let groups = group_and_average(&[a, b]);
    assert_eq!(groups.len(), 1);
    // frame_count is the rounded mean of members, never a sum.
    assert_eq!(groups[0].frame_count, 151);
    assert_eq!(groups[0].avg_fps, 110);
    assert_eq!(groups[0].duration_seconds, 11); // 10.5 rounds up
}

#[test]
fn groups_are_sorted_ascending_by_key() {
    let samples = vec![
        sample("zebra", 20, 10.0),
        sample("alpha", 8, 10.0),
        sample("alpha", 6, 10.0),
    ];
    let groups = group_and_average(&samples);
    let keys: Vec<_> = groups
        .iter()
        .map(|g| (g.date, g.hour_bucket, g.application.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (date(2023, 5, 1), 6, "alpha".to_string()),
            (date(2023, 5, 1), 8, "alpha".to_string()),
            (date(2023, 5, 1), 20, "zebra".to_string()),
        ]
    );
}

#[test]
fn full_pipeline_drops_short_run_and_groups_the_rest() {
    let samples = vec![sample("game", 18, 10.0), sample("game", 18, 2.0)];
    // Group mean 6; 2.0 < 0.8 * 6 is dropped, 10.0 survives alone.
    let groups = filter_and_group(&samples);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].duration_seconds, 10);
}
