//! Config Validation Tests
//!
//! Typo detection, range validation and file round-trips for `EngineConfig`,
//! exercised through the public API only.

use reservoir_analytics::config::validation::{
    known_config_keys, suggest_correction, validate_physical_ranges, validate_unknown_keys,
};
use reservoir_analytics::{ConfigError, EngineConfig};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_material_balance_key_warns_with_suggestion() {
    let toml_str = r#"
[material_balance]
excelent_r2 = 0.96
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("excelent_r2"));
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("material_balance.excellent_r2"),
        "Should suggest the correct spelling"
    );
}

#[test]
fn misspelled_section_warns() {
    let toml_str = r#"
[declin]
harmonic_eur_horizon_years = 40
"#;
    let warnings = validate_unknown_keys(toml_str);
    // The section and its child are both unknown
    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .any(|w| w.field == "declin" && w.suggestion.as_deref() == Some("decline")));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[decline]
hyperbolic_comparison_exponent = 0.5
harmonic_eur_horizon_years = 50
snapshot_horizons_years = [1, 3, 5, 10]

[ipr]
convergence_tolerance_bopd = 0.1
max_iterations = 10

[material_balance]
min_data_points = 3
excellent_r2 = 0.95
good_r2 = 0.85
fair_r2 = 0.7
dominant_drive_threshold = 0.5

[petrophysics]
tortuosity_factor = 1.0
cementation_exponent = 2.0
saturation_exponent = 2.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    assert_eq!(EngineConfig::from_toml_str(toml_str).unwrap(), EngineConfig::default());
}

#[test]
fn unknown_keys_do_not_fail_parsing() {
    let toml_str = r#"
[ipr]
max_iteratons = 25
"#;
    let config = EngineConfig::from_toml_str(toml_str).unwrap();
    // Typo ignored, default retained
    assert_eq!(config.ipr.max_iterations, EngineConfig::default().ipr.max_iterations);
}

#[test]
fn every_known_key_is_dotted_under_a_section() {
    let known = known_config_keys();
    for key in &known {
        let section = key.split('.').next().unwrap();
        assert!(known.contains(section), "{key} has no section entry");
    }
    assert!(suggest_correction("zzzzzzzzzzzzzzzz", &known).is_none());
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn empty_document_yields_defaults() {
    let config = EngineConfig::from_toml_str("").unwrap();
    assert_eq!(config, EngineConfig::default());
    let (errors, warnings) = validate_physical_ranges(&config);
    assert!(errors.is_empty());
    assert!(warnings.is_empty());
}

#[test]
fn non_descending_r2_thresholds_rejected() {
    let toml_str = r#"
[material_balance]
excellent_r2 = 0.8
good_r2 = 0.85
"#;
    match EngineConfig::from_toml_str(toml_str) {
        Err(ConfigError::Validation(errors)) => {
            assert!(errors.iter().any(|e| e.contains("must descend")), "{errors:?}");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn comparison_exponent_must_be_hyperbolic() {
    let mut config = EngineConfig::default();
    config.decline.hyperbolic_comparison_exponent = 1.0;
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn multiple_errors_reported_together() {
    let mut config = EngineConfig::default();
    config.ipr.max_iterations = 0;
    config.material_balance.min_data_points = 1;
    config.petrophysics.saturation_exponent = -2.0;
    match config.validate() {
        Err(ConfigError::Validation(errors)) => assert!(errors.len() >= 3, "{errors:?}"),
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_parse_error() {
    assert!(matches!(
        EngineConfig::from_toml_str("[ipr\nmax_iterations = "),
        Err(ConfigError::Parse(_))
    ));
}

// ============================================================================
// File Round-Trip
// ============================================================================

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.toml");

    let mut config = EngineConfig::default();
    config.decline.snapshot_horizons_years = vec![2, 20];
    config.ipr.max_iterations = 25;
    config.save_to_file(&path).unwrap();

    let loaded = EngineConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
    assert!(err.to_string().contains("absent.toml"));
}
