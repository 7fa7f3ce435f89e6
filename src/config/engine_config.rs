//! Engine Configuration - analyzer tuning as TOML values
//!
//! Each section implements `Default` with the values the analyzers were
//! calibrated against, so an empty file (or no file) behaves identically to
//! the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration handed to every analysis entry point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Arps decline comparison settings
    #[serde(default)]
    pub decline: DeclineConfig,

    /// Composite IPR solver bounds
    #[serde(default)]
    pub ipr: IprConfig,

    /// Havlena-Odeh regression and classification
    #[serde(default)]
    pub material_balance: MaterialBalanceConfig,

    /// Archie defaults used when a caller omits them
    #[serde(default)]
    pub petrophysics: PetrophysicsConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings and otherwise ignored.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Engine config saved");
        Ok(())
    }

    /// Validate all settings for internal consistency.
    ///
    /// Rules:
    /// - R² quality thresholds strictly descending, all within [0, 1]
    /// - Solver tolerance > 0 and iteration cap > 0
    /// - At least 3 points for a regression
    /// - Comparison exponent strictly hyperbolic (0 < b < 1)
    /// - Archie parameters > 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let mb = &self.material_balance;
        for (name, value) in [
            ("excellent_r2", mb.excellent_r2),
            ("good_r2", mb.good_r2),
            ("fair_r2", mb.fair_r2),
            ("dominant_drive_threshold", mb.dominant_drive_threshold),
        ] {
            if !value.is_finite() {
                errors.push(format!("material_balance.{name} must be a finite number"));
            } else if !(0.0..=1.0).contains(&value) {
                errors.push(format!(
                    "material_balance.{name} = {value:.3} must be within [0, 1]"
                ));
            }
        }
        if !(mb.excellent_r2 > mb.good_r2 && mb.good_r2 > mb.fair_r2) {
            errors.push(format!(
                "material_balance R² thresholds must descend: excellent ({:.2}) > good ({:.2}) > fair ({:.2})",
                mb.excellent_r2, mb.good_r2, mb.fair_r2
            ));
        }
        if mb.min_data_points < 3 {
            errors.push(format!(
                "material_balance.min_data_points = {} must be >= 3",
                mb.min_data_points
            ));
        }

        let ipr = &self.ipr;
        if !ipr.convergence_tolerance_bopd.is_finite() || ipr.convergence_tolerance_bopd <= 0.0 {
            errors.push("ipr.convergence_tolerance_bopd must be > 0".to_string());
        }
        if ipr.max_iterations == 0 {
            errors.push("ipr.max_iterations must be > 0".to_string());
        }

        let d = &self.decline;
        if !d.hyperbolic_comparison_exponent.is_finite()
            || d.hyperbolic_comparison_exponent <= 0.0
            || d.hyperbolic_comparison_exponent >= 1.0
        {
            errors.push(format!(
                "decline.hyperbolic_comparison_exponent = {} must be strictly between 0 and 1",
                d.hyperbolic_comparison_exponent
            ));
        }
        if d.harmonic_eur_horizon_years == 0 {
            errors.push("decline.harmonic_eur_horizon_years must be > 0".to_string());
        }

        let p = &self.petrophysics;
        for (name, value) in [
            ("tortuosity_factor", p.tortuosity_factor),
            ("cementation_exponent", p.cementation_exponent),
            ("saturation_exponent", p.saturation_exponent),
        ] {
            if !value.is_finite() || value <= 0.0 {
                errors.push(format!("petrophysics.{name} = {value} must be > 0"));
            }
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Decline
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclineConfig {
    /// Exponent used for the hyperbolic EUR comparison
    #[serde(default = "default_hyperbolic_comparison_exponent")]
    pub hyperbolic_comparison_exponent: f64,

    /// Practical horizon for harmonic EUR, which is unbounded as t → ∞ (years)
    #[serde(default = "default_harmonic_eur_horizon")]
    pub harmonic_eur_horizon_years: u32,

    /// Horizons at which rate/cumulative snapshots are taken (years)
    #[serde(default = "default_snapshot_horizons")]
    pub snapshot_horizons_years: Vec<u32>,
}

fn default_hyperbolic_comparison_exponent() -> f64 { 0.5 }
fn default_harmonic_eur_horizon() -> u32 { 50 }
fn default_snapshot_horizons() -> Vec<u32> { vec![1, 3, 5, 10] }

impl Default for DeclineConfig {
    fn default() -> Self {
        Self {
            hyperbolic_comparison_exponent: default_hyperbolic_comparison_exponent(),
            harmonic_eur_horizon_years: default_harmonic_eur_horizon(),
            snapshot_horizons_years: default_snapshot_horizons(),
        }
    }
}

// ============================================================================
// IPR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IprConfig {
    /// Composite solve stops once |test rate - model rate| is below this (bopd)
    #[serde(default = "default_convergence_tolerance")]
    pub convergence_tolerance_bopd: f64,

    /// Upper bound on fixed-point iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_convergence_tolerance() -> f64 { 0.1 }
fn default_max_iterations() -> usize { 10 }

impl Default for IprConfig {
    fn default() -> Self {
        Self {
            convergence_tolerance_bopd: default_convergence_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

// ============================================================================
// Material Balance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialBalanceConfig {
    /// Minimum points for a Havlena-Odeh regression
    #[serde(default = "default_min_data_points")]
    pub min_data_points: usize,

    /// R² at or above which the fit is EXCELLENT
    #[serde(default = "default_excellent_r2")]
    pub excellent_r2: f64,

    /// R² at or above which the fit is GOOD
    #[serde(default = "default_good_r2")]
    pub good_r2: f64,

    /// R² at or above which the fit is FAIR
    #[serde(default = "default_fair_r2")]
    pub fair_r2: f64,

    /// Largest drive index below this is reported as COMBINATION
    #[serde(default = "default_dominant_drive_threshold")]
    pub dominant_drive_threshold: f64,
}

fn default_min_data_points() -> usize { 3 }
fn default_excellent_r2() -> f64 { 0.95 }
fn default_good_r2() -> f64 { 0.85 }
fn default_fair_r2() -> f64 { 0.70 }
fn default_dominant_drive_threshold() -> f64 { 0.5 }

impl Default for MaterialBalanceConfig {
    fn default() -> Self {
        Self {
            min_data_points: default_min_data_points(),
            excellent_r2: default_excellent_r2(),
            good_r2: default_good_r2(),
            fair_r2: default_fair_r2(),
            dominant_drive_threshold: default_dominant_drive_threshold(),
        }
    }
}

// ============================================================================
// Petrophysics
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetrophysicsConfig {
    /// Archie tortuosity factor `a`
    #[serde(default = "default_tortuosity")]
    pub tortuosity_factor: f64,

    /// Archie cementation exponent `m`
    #[serde(default = "default_cementation")]
    pub cementation_exponent: f64,

    /// Archie saturation exponent `n`
    #[serde(default = "default_saturation")]
    pub saturation_exponent: f64,
}

fn default_tortuosity() -> f64 { 1.0 }
fn default_cementation() -> f64 { 2.0 }
fn default_saturation() -> f64 { 2.0 }

impl Default for PetrophysicsConfig {
    fn default() -> Self {
        Self {
            tortuosity_factor: default_tortuosity(),
            cementation_exponent: default_cementation(),
            saturation_exponent: default_saturation(),
        }
    }
}
