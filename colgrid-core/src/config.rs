use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_tolerance_multiplier() -> f64 {
    0.6
}

fn default_min_tolerance() -> f64 {
    0.5
}

/// Tuning for one extraction run. Column boundaries and cutoffs live in the
/// layout, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub row_clustering: RowClusteringConfig,
    #[serde(default)]
    pub assignment: AssignmentConfig,
    /// Run page extractions on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Record and log per-stage timings
    #[serde(default)]
    pub profile: bool,
    #[serde(default)]
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowClusteringConfig {
    /// Row tolerance as a multiple of the page's median fragment height
    #[serde(default = "default_tolerance_multiplier")]
    pub tolerance_multiplier: f64,
    /// Floor for the computed tolerance in points, for pages of tiny glyphs
    #[serde(default = "default_min_tolerance")]
    pub min_tolerance: f64,
}

impl Default for RowClusteringConfig {
    fn default() -> Self {
        Self {
            tolerance_multiplier: default_tolerance_multiplier(),
            min_tolerance: default_min_tolerance(),
        }
    }
}

/// What happens to a fragment that overlaps no column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPolicy {
    /// Assign to the column with the smallest gap distance
    #[default]
    Nearest,
    /// Discard the fragment
    Drop,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssignmentConfig {
    #[serde(default)]
    pub gap_policy: GapPolicy,
    /// With `nearest`, fragments farther than this from every column are dropped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gap_distance: Option<f64>,
}

/// Fragment tracing through the pipeline stages
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Regex patterns (plain substrings if the regex does not compile)
    #[serde(default)]
    pub filter_patterns: Vec<String>,
}

impl DebugConfig {
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        Self {
            enabled,
            filter_patterns,
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            row_clustering: RowClusteringConfig::default(),
            assignment: AssignmentConfig::default(),
            parallel: true,
            profile: false,
            debug: DebugConfig::disabled(),
        }
    }
}

impl ExtractionConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ExtractionConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load an explicitly requested config, or the defaults when none is
    /// given. A requested file that is unreadable, malformed or invalid is
    /// an error.
    pub fn load_requested(path: Option<&str>) -> Result<Self> {
        let Some(p) = path else {
            return Ok(Self::default());
        };
        let config =
            Self::load_from_file(p).with_context(|| format!("Failed to load config from {p}"))?;
        config
            .validate()
            .map_err(|e| anyhow!("Invalid config in {p}: {e}"))?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        Self::load_requested(path).unwrap_or_else(|e| {
            log::warn!("⚠️  {e:#}, using defaults");
            Self::default()
        })
    }

    /// Reject values that would make clustering meaningless
    pub fn validate(&self) -> std::result::Result<(), String> {
        let rc = &self.row_clustering;
        if !rc.tolerance_multiplier.is_finite() || rc.tolerance_multiplier <= 0.0 {
            return Err(format!(
                "row_clustering.tolerance_multiplier must be a positive number, got {}",
                rc.tolerance_multiplier
            ));
        }
        if !rc.min_tolerance.is_finite() || rc.min_tolerance < 0.0 {
            return Err(format!(
                "row_clustering.min_tolerance must be zero or positive, got {}",
                rc.min_tolerance
            ));
        }
        if let Some(max_gap) = self.assignment.max_gap_distance {
            if !max_gap.is_finite() || max_gap < 0.0 {
                return Err(format!(
                    "assignment.max_gap_distance must be zero or positive, got {max_gap}"
                ));
            }
        }
        Ok(())
    }
}
