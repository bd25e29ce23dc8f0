//! Progress tracking for tiled composites.

use std::sync::Arc;
use std::time::Instant;

/// A progress update event.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Compositing has started.
    Started {
        total_tiles: usize,
    },
    /// One tile has been blended onto the canvas.
    TileCompleted {
        origin: (u32, u32),
        index: usize,
        total: usize,
    },
    /// Overall progress percentage.
    Progress {
        percent: f32,
        elapsed_ms: u64,
    },
    /// Compositing has completed.
    Completed {
        total_duration_ms: u64,
        tiles_processed: usize,
    },
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Counts finished tiles and forwards events to an optional callback.
pub struct ProgressTracker {
    /// Total number of tiles to process.
    total_tiles: usize,
    /// Number of tiles completed.
    completed_tiles: usize,
    /// Start time.
    start_time: Option<Instant>,
    /// Progress callback.
    callback: Option<Arc<ProgressCallback>>,
}

impl ProgressTracker {
    /// Create a new progress tracker.
    pub fn new(total_tiles: usize) -> Self {
        Self {
            total_tiles,
            completed_tiles: 0,
            start_time: None,
            callback: None,
        }
    }

    /// Set a callback for progress updates.
    pub fn with_callback(mut self, callback: Option<Arc<ProgressCallback>>) -> Self {
        self.callback = callback;
        self
    }

    /// Start tracking.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
        self.send_update(ProgressUpdate::Started {
            total_tiles: self.total_tiles,
        });
    }

    /// Report that the tile at `origin` has been applied.
    pub fn tile_completed(&mut self, origin: (u32, u32)) {
        self.completed_tiles += 1;
        log::debug!(
            "tile {}/{} at ({}, {}) done",
            self.completed_tiles,
            self.total_tiles,
            origin.0,
            origin.1
        );

        self.send_update(ProgressUpdate::TileCompleted {
            origin,
            index: self.completed_tiles,
            total: self.total_tiles,
        });
        self.send_update(ProgressUpdate::Progress {
            percent: self.progress_percent(),
            elapsed_ms: self.elapsed_ms(),
        });
    }

    /// Complete tracking.
    pub fn complete(&self) {
        self.send_update(ProgressUpdate::Completed {
            total_duration_ms: self.elapsed_ms(),
            tiles_processed: self.completed_tiles,
        });
    }

    /// Get current progress percentage.
    pub fn progress_percent(&self) -> f32 {
        if self.total_tiles == 0 {
            return 100.0;
        }
        (self.completed_tiles as f32 / self.total_tiles as f32) * 100.0
    }

    fn elapsed_ms(&self) -> u64 {
        self.start_time
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    fn send_update(&self, update: ProgressUpdate) {
        if let Some(ref callback) = self.callback {
            callback(update);
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(0)
    }
}
