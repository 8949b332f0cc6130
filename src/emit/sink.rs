use std::io::Write;

use crate::emit::snapshot::SceneSnapshot;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{TimeweaveError, TimeweaveResult};

/// Configuration provided to a [`SnapshotSink`] at the start of a range render.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SinkConfig {
    /// Sampling rate.
    pub fps: Fps,
    /// Number of frames that will be pushed.
    pub frame_count: u64,
    /// Timeline duration in seconds.
    pub duration: f64,
}

/// Sink contract for consuming snapshots in timeline order.
///
/// Ordering contract: `push_snapshot` is called in strictly increasing `FrameIndex` order within
/// the requested range.
pub trait SnapshotSink: Send {
    /// Called once before the first snapshot.
    fn begin(&mut self, cfg: SinkConfig) -> TimeweaveResult<()>;
    /// Called once per frame.
    fn push_snapshot(&mut self, idx: FrameIndex, snapshot: &SceneSnapshot) -> TimeweaveResult<()>;
    /// Called once after the last snapshot.
    fn end(&mut self) -> TimeweaveResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Snapshots in timeline order.
    pub frames: Vec<(FrameIndex, SceneSnapshot)>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration seen by the last `begin`.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }
}

impl SnapshotSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TimeweaveResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_snapshot(&mut self, idx: FrameIndex, snapshot: &SceneSnapshot) -> TimeweaveResult<()> {
        self.frames.push((idx, snapshot.clone()));
        Ok(())
    }

    fn end(&mut self) -> TimeweaveResult<()> {
        Ok(())
    }
}

/// Writes one JSON object per frame: `{"frame": N, "snapshot": {...}}`.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
    written: u64,
}

#[derive(serde::Serialize)]
struct Line<'a> {
    frame: FrameIndex,
    snapshot: &'a SceneSnapshot,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Lines written since the last `begin`.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> SnapshotSink for JsonLinesSink<W> {
    fn begin(&mut self, _cfg: SinkConfig) -> TimeweaveResult<()> {
        self.written = 0;
        Ok(())
    }

    fn push_snapshot(&mut self, idx: FrameIndex, snapshot: &SceneSnapshot) -> TimeweaveResult<()> {
        serde_json::to_writer(
            &mut self.out,
            &Line {
                frame: idx,
                snapshot,
            },
        )?;
        self.out.write_all(b"\n").map_err(io_err)?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> TimeweaveResult<()> {
        self.out.flush().map_err(io_err)
    }
}

fn io_err(e: std::io::Error) -> TimeweaveError {
    TimeweaveError::Other(anyhow::Error::new(e).context("write snapshot line"))
}

#[cfg(test)]
#[path = "../../tests/unit/emit/sink.rs"]
mod tests;
