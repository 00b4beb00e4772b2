//! Recording a run as a sequence of grid snapshots and writing it out for
//! an external animator.
//!
//! Files are plain JSON, or gzip-compressed JSON when the path ends in
//! `.gz`. Reading accepts either.

use crate::error::{IoError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use segregation_core::{GridSnapshot, SimConfig};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Everything an animator needs to replay a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FrameSet {
    /// Digest of the config that produced the frames.
    pub fingerprint: String,
    pub config: SimConfig,
    pub frames: Vec<GridSnapshot>,
}

impl FrameSet {
    /// Checks that every frame has the configured size and a full cell list.
    pub fn validate(&self) -> Result<()> {
        let size = self.config.grid.size;
        for frame in &self.frames {
            if frame.size != size || frame.cells.len() != size * size {
                return Err(IoError::validation(format!(
                    "frame at step {} is {}x{} with {} cells, expected {size}x{size}",
                    frame.step,
                    frame.size,
                    frame.size,
                    frame.cells.len()
                )));
            }
        }
        Ok(())
    }
}

/// Collects snapshots as a run progresses.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    config: SimConfig,
    frames: Vec<GridSnapshot>,
    /// Keep every `stride`-th frame; the first frame is always kept.
    stride: u64,
}

impl FrameRecorder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            frames: Vec::new(),
            stride: 1,
        }
    }

    #[must_use]
    pub fn with_stride(mut self, stride: u64) -> Self {
        self.stride = stride.max(1);
        self
    }

    pub fn record(&mut self, snapshot: GridSnapshot) {
        if snapshot.step % self.stride == 0 || self.frames.is_empty() {
            self.frames.push(snapshot);
        }
    }

    /// Records `snapshot` unless it is the step already stored last.
    ///
    /// Used for the final state, which the stride may otherwise skip.
    pub fn record_final(&mut self, snapshot: GridSnapshot) {
        if self.frames.last().map(|f| f.step) != Some(snapshot.step) {
            self.frames.push(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[GridSnapshot] {
        &self.frames
    }

    pub fn finish(self) -> FrameSet {
        FrameSet {
            fingerprint: self.config.fingerprint(),
            config: self.config,
            frames: self.frames,
        }
    }
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Writes `frames` to `path`, gzip-compressed if the path ends in `.gz`.
pub fn write_frames<P: AsRef<Path>>(frames: &FrameSet, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("creating {path:?}")))?;

    if is_gzip_path(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, frames)
            .map_err(|e| IoError::serialization(format!("JSON serialization failed: {e}")))?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, frames)
            .map_err(|e| IoError::serialization(format!("JSON serialization failed: {e}")))?;
        writer.flush()?;
    }

    tracing::info!(
        path = %path.display(),
        frames = frames.frames.len(),
        "Frames written"
    );
    Ok(())
}

/// Reads a frame file written by [`write_frames`].
pub fn read_frames<P: AsRef<Path>>(path: P) -> Result<FrameSet> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("opening {path:?}")))?;

    let mut json = Vec::new();
    if is_gzip_path(path) {
        GzDecoder::new(BufReader::new(file)).read_to_end(&mut json)?;
    } else {
        BufReader::new(file).read_to_end(&mut json)?;
    }
    if json.iter().all(u8::is_ascii_whitespace) {
        return Err(IoError::validation("empty frame file"));
    }

    let frames: FrameSet = serde_json::from_slice(&json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {e}")))?;
    frames.validate()?;
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use segregation_core::Simulation;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("segregation_io_{}_{name}", std::process::id()))
    }

    fn recorded_run(stride: u64) -> FrameSet {
        let config = SimConfig::new(12, 0.2, 0.5).with_seed(77);
        let mut sim = Simulation::new(config.clone()).unwrap();
        let mut recorder = FrameRecorder::new(config).with_stride(stride);
        recorder.record(sim.snapshot());
        sim.run_with(10, |s| recorder.record(s.snapshot()));
        recorder.record_final(sim.snapshot());
        recorder.finish()
    }

    #[test]
    fn test_stride_keeps_first_and_final_frames() {
        let set = recorded_run(4);
        let steps: Vec<u64> = set.frames.iter().map(|f| f.step).collect();
        assert_eq!(steps[0], 0);
        assert!(steps.iter().skip(1).rev().skip(1).all(|s| s % 4 == 0));
        let mut deduped = steps.clone();
        deduped.dedup();
        assert_eq!(deduped, steps);
    }

    #[test]
    fn test_plain_json_file() {
        let set = recorded_run(1);
        let path = temp_path("frames.json");
        write_frames(&set, &path).unwrap();
        let restored = read_frames(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(restored, set);
    }

    #[test]
    fn test_gzip_file_is_compressed() {
        let set = recorded_run(1);
        let gz = temp_path("frames.json.gz");
        write_frames(&set, &gz).unwrap();
        let bytes = std::fs::read(&gz).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        let restored = read_frames(&gz).unwrap();
        std::fs::remove_file(&gz).ok();
        assert_eq!(restored.frames.len(), set.frames.len());
        assert_eq!(restored.fingerprint, set.fingerprint);
    }

    #[test]
    fn test_mismatched_frame_rejected() {
        let mut set = recorded_run(1);
        set.frames[0].cells.pop();
        let path = temp_path("bad_frames.json");
        write_frames(&set, &path).unwrap();
        let result = read_frames(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(IoError::Validation(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = read_frames(temp_path("does_not_exist.json"));
        assert!(matches!(result, Err(IoError::Context { .. })));
    }
}
