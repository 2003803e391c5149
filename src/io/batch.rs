//! Frame-by-frame mosaics for a directory of images
//!
//! Frames are every file in the input directory, in sorted path order. Frame
//! `n` writes `frame{n:04}.png` to the output directory and its identifiers to
//! `ids/frame{n:04}.<ext>`. A frame is skipped when any output entry already
//! starts with `frame{n:04}`, which lets an interrupted run resume.

use crate::io::configuration::{FRAME_PREFIX, IDS_DIR};
use crate::io::error::{Result, file_system};
use crate::io::image::{load_target, save_mosaic};
use crate::io::progress::ProgressManager;
use crate::mosaic::assembler::MosaicAssembler;
use crate::mosaic::grid::MosaicGrid;
use crate::mosaic::matrix::MatrixFormat;
use std::path::{Path, PathBuf};

/// Which frames a batch run leaves out by index
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameFilter {
    /// Frames with an index below this are skipped
    pub skip: usize,
    /// Skip frames with an even index
    pub skip_even: bool,
    /// Skip frames with an odd index
    pub skip_odd: bool,
}

/// Why a frame was not processed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Index lies in the skipped prefix
    Prefix,
    /// Even frames are skipped
    Even,
    /// Odd frames are skipped
    Odd,
    /// Output for the frame already exists
    Existing,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prefix => write!(f, "inside skipped prefix"),
            Self::Even => write!(f, "even frames skipped"),
            Self::Odd => write!(f, "odd frames skipped"),
            Self::Existing => write!(f, "output already exists"),
        }
    }
}

impl FrameFilter {
    /// Reason frame `index` is excluded by index alone, if any
    pub const fn skip_reason(&self, index: usize) -> Option<SkipReason> {
        if index < self.skip {
            Some(SkipReason::Prefix)
        } else if index % 2 == 0 && self.skip_even {
            Some(SkipReason::Even)
        } else if index % 2 != 0 && self.skip_odd {
            Some(SkipReason::Odd)
        } else {
            None
        }
    }
}

/// A directory-to-directory batch run
#[derive(Clone, Debug)]
pub struct BatchJob {
    /// Directory holding the input frames
    pub input_dir: PathBuf,
    /// Directory receiving mosaics and identifiers
    pub output_dir: PathBuf,
    /// Index-based frame exclusions
    pub filter: FrameFilter,
    /// Invert colours before fitting
    pub invert: bool,
    /// Identifier matrix format
    pub format: MatrixFormat,
}

/// Counts reported once a batch completes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Frames turned into mosaics
    pub processed: usize,
    /// Frames left out
    pub skipped: usize,
}

/// Sorted list of every file in `dir`
///
/// # Errors
///
/// Returns an error if the directory cannot be read
pub fn discover_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(file_system(dir, "list frames"))? {
        let path = entry.map_err(file_system(dir, "list frames"))?.path();
        if path.is_file() {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}

fn frame_stem(index: usize) -> String {
    format!("{FRAME_PREFIX}{index:04}")
}

/// Mosaic image path for frame `index`
pub fn frame_image_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("{}.png", frame_stem(index)))
}

/// Identifier matrix path for frame `index`
pub fn frame_ids_path(output_dir: &Path, index: usize, format: MatrixFormat) -> PathBuf {
    output_dir
        .join(IDS_DIR)
        .join(format!("{}.{}", frame_stem(index), format.extension()))
}

/// Whether any entry of `output_dir` already starts with frame `index`'s stem
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read
pub fn frame_output_exists(output_dir: &Path, index: usize) -> Result<bool> {
    if !output_dir.is_dir() {
        return Ok(false);
    }

    let stem = frame_stem(index);
    for entry in std::fs::read_dir(output_dir).map_err(file_system(output_dir, "list outputs"))? {
        let entry = entry.map_err(file_system(output_dir, "list outputs"))?;
        if entry.file_name().to_string_lossy().starts_with(&stem) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Runs batch jobs against a shared assembler
pub struct BatchRunner<'a, 'b> {
    assembler: &'b MosaicAssembler<'a>,
    progress: Option<&'b ProgressManager>,
}

impl<'a, 'b> BatchRunner<'a, 'b> {
    /// Runner reporting to `progress` when given
    pub const fn new(
        assembler: &'b MosaicAssembler<'a>,
        progress: Option<&'b ProgressManager>,
    ) -> Self {
        Self {
            assembler,
            progress,
        }
    }

    /// Process every selected frame of `job`
    ///
    /// A failing frame aborts the batch; frames already written stay on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input directory cannot be listed
    /// - The output directories cannot be created
    /// - A frame cannot be loaded, assembled or saved
    pub fn run(&self, job: &BatchJob) -> Result<BatchSummary> {
        let frames = discover_frames(&job.input_dir)?;
        let ids_dir = job.output_dir.join(IDS_DIR);
        std::fs::create_dir_all(&ids_dir).map_err(file_system(&ids_dir, "create directory"))?;

        if let Some(progress) = self.progress {
            progress.initialize(frames.len());
        }
        log::info!(
            "Found {} frames in {}",
            frames.len(),
            job.input_dir.display()
        );

        let mut summary = BatchSummary::default();
        for (index, frame) in frames.iter().enumerate() {
            let reason = match job.filter.skip_reason(index) {
                Some(reason) => Some(reason),
                None => frame_output_exists(&job.output_dir, index)?
                    .then_some(SkipReason::Existing),
            };

            if let Some(reason) = reason {
                log::warn!("Skipping frame {index:04} ({reason})");
                if let Some(progress) = self.progress {
                    progress.skip_frame();
                }
                summary.skipped += 1;
                continue;
            }

            self.process_frame(job, index, frames.len(), frame)?;
            summary.processed += 1;
        }

        if let Some(progress) = self.progress {
            progress.finish();
        }
        log::info!(
            "Batch complete: {} processed, {} skipped",
            summary.processed,
            summary.skipped
        );
        Ok(summary)
    }

    fn process_frame(&self, job: &BatchJob, index: usize, total: usize, frame: &Path) -> Result<()> {
        log::info!(
            "Starting frame {index:04} from {} ({:.1}%)",
            frame.display(),
            index as f64 / total as f64 * 100.0
        );

        let target = load_target(frame, job.invert)?;
        let grid = MosaicGrid::for_image(target.width(), target.height());
        let bar = self
            .progress
            .map(|progress| progress.start_frame(&frame_stem(index), grid.cell_count()));

        let mosaic = match &bar {
            Some(bar) => self.assembler.assemble_with_progress(&target, || bar.inc(1))?,
            None => self.assembler.assemble(&target)?,
        };

        save_mosaic(&mosaic.image, &frame_image_path(&job.output_dir, index))?;
        mosaic
            .ids
            .save(&frame_ids_path(&job.output_dir, index, job.format), job.format)?;

        if let (Some(progress), Some(bar)) = (self.progress, bar) {
            progress.complete_frame(&bar);
        }
        Ok(())
    }
}
