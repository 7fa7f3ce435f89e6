//! Config checks that never block loading
//!
//! - Unknown keys: the raw document is walked as a `toml::Value` tree and
//!   every dotted path is compared against the paths of the default config.
//!   Near misses get a "did you mean" suggestion.
//! - Physical ranges: values that parse and pass `EngineConfig::validate`
//!   but sit outside what the correlations and solver are tuned for.

use std::collections::HashSet;
use std::fmt;

use super::EngineConfig;

/// Largest edit distance still offered as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// A non-fatal config finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Dotted key path, e.g. `ipr.max_iterations`
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationWarning {
    fn out_of_typical_range(field: &str, value: f64, low: f64, high: f64) -> Self {
        Self {
            field: field.to_string(),
            message: format!("{field} = {value:.2} is outside the typical range {low}-{high}"),
            suggestion: None,
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suggestion {
            Some(s) => write!(f, "{} (did you mean '{s}'?)", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

// ============================================================================
// Key Paths
// ============================================================================

/// Every dotted key path a config file may contain.
///
/// Taken from the serialized default config, so new fields are picked up
/// without a separate list to maintain.
pub fn known_config_keys() -> HashSet<String> {
    toml::Value::try_from(EngineConfig::default())
        .map(|value| walk_toml_keys(&value, "").into_iter().collect())
        .unwrap_or_default()
}

/// Dotted paths of every key in `value`, tables before their children.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut pending: Vec<(String, &toml::Value)> = vec![(prefix.to_string(), value)];

    while let Some((path, node)) = pending.pop() {
        let Some(table) = node.as_table() else {
            continue;
        };
        for (key, child) in table {
            let child_path = if path.is_empty() {
                key.clone()
            } else {
                format!("{path}.{key}")
            };
            keys.push(child_path.clone());
            pending.push((child_path, child));
        }
    }
    keys
}

/// Edit distance between two keys (insert, delete, substitute).
fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    // row[j] = distance between the consumed prefix of `a` and b[..j]
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + usize::from(ca != cb));
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Closest known key within edit distance 3, ties broken alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), k))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min()
        .map(|(_, k)| k.clone())
}

/// Warnings for every key in `raw_toml` that `EngineConfig` does not define.
///
/// A document that fails to parse yields no warnings; the parse error is
/// reported by deserialization instead.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(table) = raw_toml.parse::<toml::Table>() else {
        return Vec::new();
    };
    let value = toml::Value::Table(table);

    let known = known_config_keys();
    let mut unknown: Vec<String> = walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key))
        .collect();
    unknown.sort();

    unknown
        .into_iter()
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Ranges
// ============================================================================

/// Returns (errors, warnings). Errors are values no analysis can use;
/// warnings are legal but outside what the correlations were fitted on.
pub fn validate_physical_ranges(config: &EngineConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Any composite IPR passes after one step at this tolerance
    let tol = config.ipr.convergence_tolerance_bopd;
    if tol >= 100.0 {
        errors.push(format!(
            "ipr.convergence_tolerance_bopd = {tol:.2} is too loose to calibrate against (must be < 100 bopd)"
        ));
    }

    if config.ipr.max_iterations > 1_000 {
        warnings.push(ValidationWarning {
            field: "ipr.max_iterations".to_string(),
            message: format!(
                "ipr.max_iterations = {} is far above what the composite solve needs",
                config.ipr.max_iterations
            ),
            suggestion: None,
        });
    }

    // a: 0.5-1.5, m: 1.3 (unconsolidated) to 3.0 (vuggy carbonate), n: 1.5-3.0
    let p = &config.petrophysics;
    for (field, value, low, high) in [
        ("petrophysics.tortuosity_factor", p.tortuosity_factor, 0.5, 1.5),
        ("petrophysics.cementation_exponent", p.cementation_exponent, 1.3, 3.0),
        ("petrophysics.saturation_exponent", p.saturation_exponent, 1.5, 3.0),
    ] {
        if value < low || value > high {
            warnings.push(ValidationWarning::out_of_typical_range(field, value, low, high));
        }
    }

    if let Some(&years) = config.decline.snapshot_horizons_years.iter().find(|&&y| y > 100) {
        warnings.push(ValidationWarning {
            field: "decline.snapshot_horizons_years".to_string(),
            message: format!("snapshot horizon of {years} years is beyond any practical field life"),
            suggestion: None,
        });
    }

    (errors, warnings)
}
