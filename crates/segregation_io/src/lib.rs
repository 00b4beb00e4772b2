//! # Segregation IO
//!
//! Export layer for simulation runs. The core hands out grid snapshots;
//! this crate collects them into frame sets and writes them to disk for
//! animators and offline analysis.

/// Error types and result aliases for I/O operations
pub mod error;
/// Frame recording and JSON / gzip frame files
pub mod frames;

pub use error::{IoError, Result};
pub use frames::{read_frames, write_frames, FrameRecorder, FrameSet};
