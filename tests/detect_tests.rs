// Format detection precedence tests

use benchreport::detect::{FormatTag, detect};

#[test]
fn capframe_json_detected_regardless_of_key_order() {
    let a = r#"{"Hash":"x","Info":{},"Runs":[]}"#;
    let b = r#"{"Runs":[],"Hash":"x","Info":{}}"#;
    assert_eq!(detect(a), FormatTag::CapFrame);
    assert_eq!(detect(b), FormatTag::CapFrame);
}

#[test]
fn json_missing_required_keys_falls_through_to_line_heuristics() {
    // Looks like JSON but lacks Hash/Info/Runs, so it is not CapFrameX.
    assert_eq!(detect(r#"{"a": 1, "b": 2}"#), FormatTag::Generic);
}

#[test]
fn json_with_non_array_runs_is_not_capframe() {
    assert_eq!(
        detect(r#"{"Hash":"x","Info":{},"Runs":"nope"}"#),
        FormatTag::Generic
    );
}

#[test]
fn capframe_keyword_is_case_insensitive() {
    assert_eq!(detect("# CapFrameX capture export\n1,2,3"), FormatTag::CapFrame);
    assert_eq!(detect("# CAPFRAME data\n"), FormatTag::CapFrame);
}

#[test]
fn completed_frames_with_exe_marker_is_afterburner() {
    let line = "01-05-2023, 18:01:07 game.exe benchmark completed, 500 frames rendered in 4.2 s";
    assert_eq!(detect(line), FormatTag::LegacyAfterburner);
}

#[test]
fn completed_frames_without_exe_marker_is_generic() {
    let line = "01-05-2023, 18:01:07 game benchmark completed, 500 frames rendered in 4.2 s";
    assert_eq!(detect(line), FormatTag::Generic);
}

#[test]
fn unrecognized_content_defaults_to_generic() {
    assert_eq!(detect("just some text"), FormatTag::Generic);
    assert_eq!(detect(""), FormatTag::Generic);
}

#[test]
fn heuristics_only_look_at_leading_lines() {
    // The .exe completed marker is buried past the first ten lines.
    let mut content = String::from("a\nb\nc\nd\ne\nf\ng\nh\ni\nj\n");
    content.push_str("game.exe benchmark completed, 500 frames rendered in 4.2 s\n");
    assert_eq!(detect(&content), FormatTag::Generic);
}
