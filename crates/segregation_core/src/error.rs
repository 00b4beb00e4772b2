//! Error taxonomy for the simulation core.
//!
//! Configuration problems surface at construction and are never recovered
//! internally. Out-of-range coordinates are programming errors and abort the
//! current operation. A relocation with nowhere to go is reported here but the
//! step loop treats it as a per-agent no-op.

use segregation_data::Position;
use thiserror::Error;

/// Main error type for simulation core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Grid size, empty ratio or threshold outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Coordinate outside the grid
    #[error("Invalid position ({row}, {col}) for a {size}x{size} grid")]
    InvalidPosition { row: usize, col: usize, size: usize },

    /// Relocation requested for a cell with no agent in it
    #[error("Cell {0} is not occupied")]
    UnoccupiedCell(Position),

    /// Every cell is occupied
    #[error("No empty cell available")]
    NoEmptyCellAvailable,
}

/// Result type alias for simulation core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    #[must_use]
    pub fn invalid_position(pos: Position, size: usize) -> Self {
        Self::InvalidPosition {
            row: pos.row,
            col: pos.col,
            size,
        }
    }
}
