use skillgap_core::config::{AnalysisConfig, DEFAULT_GEMINI_ENDPOINT};
use std::io::Write;

// ── Tests ────────────────────────────────────────────────────────────────────

/// Keys absent from the file fall back to defaults.
#[test]
fn partial_file_uses_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "advisor": {{ "model": "gemini-test" }}, "reports": {{ "major_gap_threshold": 3 }} }}"#).unwrap();

    let config = AnalysisConfig::load(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.advisor.model, "gemini-test");
    assert_eq!(config.advisor.endpoint, DEFAULT_GEMINI_ENDPOINT);
    assert_eq!(config.advisor.sample_rows, 3);
    assert_eq!(config.reports.major_gap_threshold, 3.0);
    assert_eq!(config.reports.top_skill_chart_limit, 10);
}

/// A missing file names the path in the error.
#[test]
fn missing_file_is_reported() {
    let err = AnalysisConfig::load("/nonexistent/skillgap.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/skillgap.json"));
}

/// The test config never picks up a real key.
#[test]
fn test_config_has_no_api_key() {
    let config = AnalysisConfig::default_test();
    assert!(!config.advisor.enabled);
    assert!(config.advisor.api_key().is_none());
}
