//! # Segregation Core
//!
//! Simulation engine for the Schelling model of residential segregation.
//! Agents of two types live on a square grid and move to a random empty
//! cell whenever too few of their occupied neighbours share their type.
//!
//! This crate contains:
//! - Grid state with bounds-checked access
//! - Population sizing and unbiased random placement
//! - The happiness predicate over the Moore neighbourhood
//! - Relocation of unhappy agents
//! - The step loop with convergence detection
//!
//! Rendering and export live in other crates; the core only hands out
//! immutable [`GridSnapshot`]s.
//!
//! ## Example
//!
//! ```
//! use segregation_core::{SimConfig, Simulation};
//!
//! let config = SimConfig::new(20, 0.2, 0.4).with_seed(42);
//! let mut sim = Simulation::new(config).unwrap();
//! let summary = sim.run(100);
//! assert!(summary.steps <= 100);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Step and run loop
pub mod controller;
/// Error types and result alias
pub mod error;
/// Square grid of cell occupancy
pub mod grid;
/// Happiness predicate and batch evaluation
pub mod happiness;
/// Step counters and logging setup
pub mod metrics;
/// Population sizing and initial placement
pub mod population;
/// Agent relocation policy
pub mod relocation;
/// Owned simulation state
pub mod simulation;
/// Immutable grid copies for visualizers
pub mod snapshot;

pub use config::{RemainderPolicy, SimConfig, Topology};
pub use controller::{run_grid, run_grid_with, step, step_with_report, RunSummary, StepReport};
pub use error::{Result, SimError};
pub use grid::Grid;
pub use happiness::{is_happy, EvaluationMode, HappinessRule};
pub use metrics::{init_logging, Metrics};
pub use population::{plan_population, populate};
pub use relocation::{relocate, RelocationOutcome};
pub use segregation_data::{Cell, PopulationCounts, Position};
pub use simulation::{run, Simulation};
pub use snapshot::GridSnapshot;
