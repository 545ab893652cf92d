// Config parsing and validation tests

use benchreport::config::AppConfig;

#[test]
fn full_config_parses() {
    let config = AppConfig::load_from_str(
        r#"
        [session]
        quiet_window_secs = 15

        [limits]
        max_file_bytes = 1048576
        flush_channel_capacity = 4
        "#,
    )
    .unwrap();
    assert_eq!(config.session.quiet_window_secs, 15);
    assert_eq!(config.limits.max_file_bytes, 1_048_576);
    assert_eq!(config.limits.flush_channel_capacity, 4);
}

#[test]
fn omitted_values_fall_back_to_defaults() {
    let config = AppConfig::load_from_str("[session]\n[limits]\n").unwrap();
    assert_eq!(config.session.quiet_window_secs, 10);
    assert_eq!(config.limits.max_file_bytes, 50 * 1024 * 1024);
    assert_eq!(config.limits.flush_channel_capacity, 16);
}

#[test]
fn zero_quiet_window_is_rejected() {
    let err = AppConfig::load_from_str("[session]\nquiet_window_secs = 0\n[limits]\n")
        .unwrap_err()
        .to_string();
    assert!(err.contains("quiet_window_secs"));
}

#[test]
fn zero_max_file_bytes_is_rejected() {
    let err = AppConfig::load_from_str("[session]\n[limits]\nmax_file_bytes = 0\n")
        .unwrap_err()
        .to_string();
    assert!(err.contains("max_file_bytes"));
}

#[test]
fn zero_flush_channel_capacity_is_rejected() {
    let err = AppConfig::load_from_str("[session]\n[limits]\nflush_channel_capacity = 0\n")
        .unwrap_err()
        .to_string();
    assert!(err.contains("flush_channel_capacity"));
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(AppConfig::load_from_str("not toml at all [").is_err());
}

#[test]
fn load_reads_the_path_named_by_the_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[session]\nquiet_window_secs = 3\n[limits]\n").unwrap();
    // SAFETY: no other thread in this process reads CONFIG_FILE.
    unsafe { std::env::set_var("CONFIG_FILE", &path) };
    let config = AppConfig::load().unwrap();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    assert_eq!(config.session.quiet_window_secs, 3);
}
