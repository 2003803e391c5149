//! Batch and per-frame progress bars

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static TILE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} tiles ({{eta}})"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Frames: [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Coordinates a frame counter and one tile bar per frame in flight
///
/// Bars are updated through shared references so workers can advance the
/// tile bar concurrently.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: ProgressBar,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with an empty frame counter
    pub fn new() -> Self {
        let multi_progress = MultiProgress::new();
        let batch_bar = multi_progress.add(ProgressBar::new(0));
        batch_bar.set_style(BATCH_STYLE.clone());

        Self {
            multi_progress,
            batch_bar,
        }
    }

    /// Set the number of frames the batch will visit
    pub fn initialize(&self, frame_count: usize) {
        self.batch_bar.set_length(frame_count as u64);
        self.batch_bar.set_position(0);
    }

    /// Total frames announced by [`Self::initialize`]
    pub fn frame_count(&self) -> usize {
        self.batch_bar.length().unwrap_or(0) as usize
    }

    /// Create the tile bar for a frame about to be assembled
    pub fn start_frame(&self, name: &str, tile_count: usize) -> ProgressBar {
        let bar = self
            .multi_progress
            .add(ProgressBar::new(tile_count as u64));
        bar.set_style(TILE_STYLE.clone());
        bar.set_prefix(name.to_string());
        bar
    }

    /// Retire a frame's tile bar and advance the frame counter
    pub fn complete_frame(&self, bar: &ProgressBar) {
        bar.finish_and_clear();
        self.multi_progress.remove(bar);
        self.batch_bar.inc(1);
    }

    /// Advance the frame counter for a frame that was not processed
    pub fn skip_frame(&self) {
        self.batch_bar.inc(1);
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        self.batch_bar.finish_with_message("all frames processed");
        let _ = self.multi_progress.clear();
    }
}
