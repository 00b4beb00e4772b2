//! Configuration management for simulation parameters.
//!
//! Strongly-typed configuration structures that map to a `config.toml`
//! file. Every section has defaults, so a file only needs the keys it
//! overrides.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command-line flags (applied by the binary)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [grid]
//! size = 50
//! topology = "Bounded"
//!
//! [population]
//! empty_ratio = 0.2
//! remainder = "ExtraToTypeA"
//!
//! [happiness]
//! similarity_threshold = 0.44
//!
//! [run]
//! max_steps = 100
//! seed = 42
//! ```

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted grid side length.
pub const MAX_GRID_SIZE: usize = 4096;

macro_rules! ensure_config {
    ($cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err(SimError::invalid_config(format!($($msg)+)));
        }
    };
}

/// How the Moore neighbourhood treats the grid edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Topology {
    /// Neighbourhoods are clipped at the boundary.
    #[default]
    Bounded,
    /// Neighbourhoods wrap around to the opposite edge.
    Toroidal,
}

/// Who receives the odd agent when the agent count does not split evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RemainderPolicy {
    /// TypeA gets `ceil(agents / 2)`.
    #[default]
    ExtraToTypeA,
    /// TypeB gets `ceil(agents / 2)`.
    ExtraToTypeB,
    /// Both types get `floor(agents / 2)`; the leftover cell stays empty.
    ExtraToEmpty,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Side length N of the N x N grid.
    pub size: usize,
    pub topology: Topology,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 50,
            topology: Topology::Bounded,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PopulationConfig {
    /// Fraction of cells left empty, in `[0, 1)`.
    pub empty_ratio: f64,
    pub remainder: RemainderPolicy,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            empty_ratio: 0.2,
            remainder: RemainderPolicy::ExtraToTypeA,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HappinessConfig {
    /// Minimum same-type fraction among occupied neighbours, in `[0, 1]`.
    pub similarity_threshold: f64,
}

impl Default for HappinessConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.44,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub max_steps: u64,
    /// Fixed seed for reproducible runs. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Evaluate happiness across worker threads.
    pub parallel_evaluation: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            seed: None,
            parallel_evaluation: true,
        }
    }
}

/// Complete simulation configuration. Immutable once a run starts.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub population: PopulationConfig,
    pub happiness: HappinessConfig,
    pub run: RunConfig,
}

impl SimConfig {
    /// Shorthand for the three parameters the model is usually described by.
    #[must_use]
    pub fn new(size: usize, empty_ratio: f64, similarity_threshold: f64) -> Self {
        Self {
            grid: GridConfig {
                size,
                ..Default::default()
            },
            population: PopulationConfig {
                empty_ratio,
                ..Default::default()
            },
            happiness: HappinessConfig {
                similarity_threshold,
            },
            run: RunConfig::default(),
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.run.seed = Some(seed);
        self
    }

    /// Validates all configuration parameters.
    ///
    /// # Validation Rules
    /// - Grid size must be positive and at most [`MAX_GRID_SIZE`]
    /// - Empty ratio must be finite and in `[0, 1)`
    /// - Similarity threshold must be finite and in `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.grid.size > 0, "grid size must be positive");
        ensure_config!(
            self.grid.size <= MAX_GRID_SIZE,
            "grid size too large (max {MAX_GRID_SIZE})"
        );

        let ratio = self.population.empty_ratio;
        ensure_config!(
            ratio.is_finite() && (0.0..1.0).contains(&ratio),
            "empty ratio must be in [0.0, 1.0), got {ratio}"
        );

        let threshold = self.happiness.similarity_threshold;
        ensure_config!(
            threshold.is_finite() && (0.0..=1.0).contains(&threshold),
            "similarity threshold must be in [0.0, 1.0], got {threshold}"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)
            .map_err(|e| SimError::invalid_config(format!("malformed TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist. An unreadable or invalid file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            SimError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Stable digest of the parameters that determine a run's outcome.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.grid).as_bytes());
        hasher.update(format!("{:?}", self.population).as_bytes());
        hasher.update(format!("{:?}", self.happiness).as_bytes());
        hasher.update(format!("{:?}", self.run.seed).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.size, 50);
        assert_eq!(config.run.max_steps, 100);
    }

    #[test]
    fn test_zero_grid_size() {
        let config = SimConfig::new(0, 0.2, 0.5);
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_grid_size_too_large() {
        let config = SimConfig::new(MAX_GRID_SIZE + 1, 0.2, 0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_ratio_bounds() {
        assert!(SimConfig::new(10, 0.0, 0.5).validate().is_ok());
        assert!(SimConfig::new(10, 0.999, 0.5).validate().is_ok());
        assert!(SimConfig::new(10, 1.0, 0.5).validate().is_err());
        assert!(SimConfig::new(10, -0.1, 0.5).validate().is_err());
        assert!(SimConfig::new(10, f64::NAN, 0.5).validate().is_err());
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(SimConfig::new(10, 0.2, 0.0).validate().is_ok());
        assert!(SimConfig::new(10, 0.2, 1.0).validate().is_ok());
        assert!(SimConfig::new(10, 0.2, 1.01).validate().is_err());
        assert!(SimConfig::new(10, 0.2, -0.01).validate().is_err());
        assert!(SimConfig::new(10, 0.2, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimConfig::from_toml(
            r#"
            [grid]
            size = 12
            topology = "Toroidal"

            [run]
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.size, 12);
        assert_eq!(config.grid.topology, Topology::Toroidal);
        assert_eq!(config.run.seed, Some(7));
        assert_eq!(config.happiness.similarity_threshold, 0.44);
        assert_eq!(config.population.remainder, RemainderPolicy::ExtraToTypeA);
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        let result = SimConfig::from_toml("[happiness]\nsimilarity_threshold = 2.0\n");
        assert!(matches!(result, Err(SimError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = SimConfig::new(20, 0.3, 0.6).with_seed(99);
        let restored = SimConfig::from_toml(&config.to_toml()).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let config = SimConfig::load("definitely/not/here/config.toml").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let a = SimConfig::default().with_seed(1);
        let b = SimConfig::default().with_seed(1);
        let c = SimConfig::default().with_seed(2);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }
}
