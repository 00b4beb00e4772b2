//! One evaluate-then-relocate pass, and the loop that repeats it until the
//! grid stops changing.
//!
//! Each step works in two phases. First a shuffled snapshot of every
//! occupied position is scored; nothing is moved while scoring, so no
//! agent's verdict depends on another agent's move in the same step. Then
//! the unhappy agents relocate one by one in that shuffled order, each
//! drawing from the empty cells that exist at the moment of its move.

use crate::grid::Grid;
use crate::happiness::{unhappy_among, EvaluationMode, HappinessRule};
use crate::relocation::{move_agent, EmptyPool, RelocationOutcome};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tally of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepReport {
    /// Agents found unhappy during evaluation.
    pub unhappy: usize,
    /// Agents that changed cell.
    pub moved: usize,
    /// Unhappy agents that had nowhere to go.
    pub stuck: usize,
}

impl StepReport {
    pub fn moved_any(&self) -> bool {
        self.moved > 0
    }
}

/// How a multi-step run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of `step` calls made, including the final one that moved nothing.
    pub steps: u64,
    /// A step produced zero relocations before the budget ran out.
    pub converged: bool,
    pub total_moves: u64,
}

/// Runs one full pass and reports what happened.
pub fn step_with_report<R: Rng + ?Sized>(
    grid: &mut Grid,
    rule: &HappinessRule,
    mode: EvaluationMode,
    rng: &mut R,
) -> StepReport {
    let mut agents = grid.occupied_positions();
    agents.shuffle(rng);

    let unhappy = unhappy_among(grid, &agents, rule, mode);

    let mut report = StepReport {
        unhappy: unhappy.len(),
        ..Default::default()
    };
    if unhappy.is_empty() {
        return report;
    }

    let mut pool = EmptyPool::from_grid(grid);
    for from in unhappy {
        match move_agent(grid, from, &mut pool, rng) {
            RelocationOutcome::Moved { .. } => report.moved += 1,
            RelocationOutcome::Stuck => report.stuck += 1,
        }
    }
    if report.stuck > 0 {
        tracing::debug!(stuck = report.stuck, "No empty cell for unhappy agents");
    }
    report
}

/// Runs one full pass with serial evaluation. Returns whether any agent moved.
pub fn step<R: Rng + ?Sized>(grid: &mut Grid, rule: &HappinessRule, rng: &mut R) -> bool {
    step_with_report(grid, rule, EvaluationMode::Serial, rng).moved_any()
}

/// Steps until a pass moves nobody or `max_steps` passes have run.
pub fn run_grid<R: Rng + ?Sized>(
    grid: &mut Grid,
    rule: &HappinessRule,
    mode: EvaluationMode,
    max_steps: u64,
    rng: &mut R,
) -> RunSummary {
    run_grid_with(grid, rule, mode, max_steps, rng, |_, _| {})
}

/// [`run_grid`] with a callback after every step, for callers collecting
/// per-step snapshots.
pub fn run_grid_with<R, F>(
    grid: &mut Grid,
    rule: &HappinessRule,
    mode: EvaluationMode,
    max_steps: u64,
    rng: &mut R,
    mut on_step: F,
) -> RunSummary
where
    R: Rng + ?Sized,
    F: FnMut(&Grid, &StepReport),
{
    drive(max_steps, || {
        let report = step_with_report(grid, rule, mode, rng);
        on_step(&*grid, &report);
        report
    })
}

/// Calls `step_once` until it reports no moves or `max_steps` calls are made.
pub(crate) fn drive<F>(max_steps: u64, mut step_once: F) -> RunSummary
where
    F: FnMut() -> StepReport,
{
    let mut summary = RunSummary::default();
    while summary.steps < max_steps {
        let report = step_once();
        summary.steps += 1;
        summary.total_moves += report.moved as u64;
        if !report.moved_any() {
            summary.converged = true;
            break;
        }
    }
    summary
}
