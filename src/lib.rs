pub mod app;
pub mod cli;

pub use segregation_core as sim;
pub use segregation_core::{
    Cell, Grid, GridSnapshot, HappinessRule, Position, RunSummary, SimConfig, SimError,
    Simulation, StepReport,
};
pub use segregation_io as io;
