//! Command-line interface for single images and frame directories

use crate::io::batch::{BatchJob, BatchRunner, BatchSummary, FrameFilter};
use crate::io::configuration::DEFAULT_ASSET_DIR;
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{load_target, save_mosaic};
use crate::io::progress::ProgressManager;
use crate::mosaic::assembler::MosaicAssembler;
use crate::mosaic::grid::MosaicGrid;
use crate::mosaic::matrix::MatrixFormat;
use crate::pattern::assets::PatternAssets;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "spotmosaic")]
#[command(
    author,
    version,
    about = "Rebuild images as mosaics of spotted pattern tiles"
)]
/// Command-line arguments for the mosaic tool
pub struct Cli {
    /// Directory holding base.png, mask.png and spots/spot_1..4.png
    #[arg(short, long, global = true, default_value = DEFAULT_ASSET_DIR)]
    pub assets: PathBuf,

    /// Worker threads (defaults to one per core)
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// What to build
    #[command(subcommand)]
    pub command: Command,
}

/// Processing modes
#[derive(Subcommand)]
pub enum Command {
    /// Build the mosaic of a single image
    Image {
        /// Source image
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Mosaic PNG to write
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Identifier matrix path (defaults to OUTPUT with the format's extension)
        #[arg(long)]
        ids: Option<PathBuf>,

        /// Invert colours before fitting
        #[arg(short = 'I', long)]
        invert: bool,

        /// Identifier matrix format
        #[arg(short, long, value_enum, default_value_t = MatrixFormat::Json)]
        format: MatrixFormat,
    },

    /// Build one mosaic per file of a frame directory
    Frames {
        /// Directory of input frames, processed in sorted order
        #[arg(value_name = "INPUT_DIR")]
        input_dir: PathBuf,

        /// Directory receiving frameNNNN.png and ids/frameNNNN.*
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Number of leading frames to skip
        #[arg(default_value_t = 0)]
        skip: usize,

        /// Skip frames with an even index
        #[arg(long)]
        skip_even: bool,

        /// Skip frames with an odd index
        #[arg(long)]
        skip_odd: bool,

        /// Invert colours before fitting
        #[arg(short = 'I', long)]
        invert: bool,

        /// Identifier matrix format
        #[arg(short, long, value_enum, default_value_t = MatrixFormat::Json)]
        format: MatrixFormat,
    },
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Identifier path used by the image command
    pub fn ids_path(output: &Path, ids: Option<&Path>, format: MatrixFormat) -> PathBuf {
        ids.map_or_else(|| output.with_extension(format.extension()), Path::to_path_buf)
    }
}

/// Runs the selected command with progress tracking
pub struct MosaicProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl MosaicProcessor {
    /// Create a processor for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the command
    ///
    /// # Errors
    ///
    /// Returns an error if the assets are invalid, the worker pool cannot be
    /// built, or any image cannot be read, assembled or written
    pub fn process(&self) -> Result<()> {
        if self.cli.threads == Some(0) {
            return Err(invalid_parameter(
                "threads",
                &0,
                &"at least one worker is required",
            ));
        }

        let assets = PatternAssets::load(&self.cli.assets)?;
        let assembler = MosaicAssembler::new(&assets, self.cli.threads)?;

        match &self.cli.command {
            Command::Image {
                input,
                output,
                ids,
                invert,
                format,
            } => self.process_image(&assembler, input, output, ids.as_deref(), *invert, *format),
            Command::Frames {
                input_dir,
                output_dir,
                skip,
                skip_even,
                skip_odd,
                invert,
                format,
            } => {
                let job = BatchJob {
                    input_dir: input_dir.clone(),
                    output_dir: output_dir.clone(),
                    filter: FrameFilter {
                        skip: *skip,
                        skip_even: *skip_even,
                        skip_odd: *skip_odd,
                    },
                    invert: *invert,
                    format: *format,
                };
                let BatchSummary { processed, skipped } =
                    BatchRunner::new(&assembler, self.progress_manager.as_ref()).run(&job)?;
                log::info!("{processed} frames written, {skipped} skipped");
                Ok(())
            }
        }
    }

    fn process_image(
        &self,
        assembler: &MosaicAssembler<'_>,
        input: &Path,
        output: &Path,
        ids: Option<&Path>,
        invert: bool,
        format: MatrixFormat,
    ) -> Result<()> {
        let start_time = Instant::now();
        let target = load_target(input, invert)?;
        let grid = MosaicGrid::for_image(target.width(), target.height());

        let name = input
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let mosaic = if let Some(pm) = &self.progress_manager {
            pm.initialize(1);
            let bar = pm.start_frame(&name, grid.cell_count());
            let mosaic = assembler.assemble_with_progress(&target, || bar.inc(1))?;
            pm.complete_frame(&bar);
            pm.finish();
            mosaic
        } else {
            assembler.assemble(&target)?
        };

        save_mosaic(&mosaic.image, output)?;
        mosaic
            .ids
            .save(&Cli::ids_path(output, ids, format), format)?;

        log::info!(
            "Wrote {}x{} mosaic to {} in {:.2?}",
            grid.num_x,
            grid.num_y,
            output.display(),
            start_time.elapsed()
        );
        Ok(())
    }
}
