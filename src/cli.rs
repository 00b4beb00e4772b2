use anyhow::{Context, Result};
use clap::Parser;
use segregation_core::{SimConfig, Topology};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Schelling segregation model", long_about = None)]
pub struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "tui")]
    pub mode: Mode,

    /// Config file path; missing file means built-in defaults
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Grid side length N
    #[arg(long)]
    pub size: Option<usize>,

    /// Fraction of cells left empty, in [0, 1)
    #[arg(long)]
    pub empty_ratio: Option<f64>,

    /// Minimum same-type share of occupied neighbours, in [0, 1]
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Random seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Upper bound on steps
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Wrap neighbourhoods around the grid edges
    #[arg(long)]
    pub toroidal: bool,

    /// Write recorded frames here (`.gz` for compressed); headless only
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Record every Nth step when exporting
    #[arg(long, default_value_t = 1)]
    pub stride: u64,

    /// Milliseconds between animation frames in tui mode
    #[arg(long, default_value_t = 200)]
    pub interval_ms: u64,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Tui,
    Headless,
}

impl Args {
    /// Loads the config file and applies command-line overrides.
    pub fn resolve_config(&self) -> Result<SimConfig> {
        let mut config = SimConfig::load(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;
        self.apply_overrides(&mut config);
        config.validate().context("invalid simulation parameters")?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut SimConfig) {
        if let Some(size) = self.size {
            config.grid.size = size;
        }
        if let Some(ratio) = self.empty_ratio {
            config.population.empty_ratio = ratio;
        }
        if let Some(threshold) = self.threshold {
            config.happiness.similarity_threshold = threshold;
        }
        if let Some(seed) = self.seed {
            config.run.seed = Some(seed);
        }
        if let Some(max_steps) = self.max_steps {
            config.run.max_steps = max_steps;
        }
        if self.toroidal {
            config.grid.topology = Topology::Toroidal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let args = Args::try_parse_from([
            "segregation",
            "--config",
            "no/such/config.toml",
            "--size",
            "30",
            "--threshold",
            "0.6",
            "--seed",
            "9",
            "--toroidal",
        ])
        .unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config.grid.size, 30);
        assert_eq!(config.happiness.similarity_threshold, 0.6);
        assert_eq!(config.run.seed, Some(9));
        assert_eq!(config.grid.topology, Topology::Toroidal);
        assert_eq!(config.population.empty_ratio, 0.2);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = Args::try_parse_from([
            "segregation",
            "--config",
            "no/such/config.toml",
            "--empty-ratio",
            "1.0",
        ])
        .unwrap();
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_mode_parsing() {
        let args = Args::try_parse_from(["segregation", "-m", "headless"]).unwrap();
        assert_eq!(args.mode, Mode::Headless);
        assert_eq!(args.stride, 1);
    }
}
