//! Parallel per-tile search and composition of the final mosaic
//!
//! Every grid cell is an independent unit of work: it reads its own sample of
//! the source and the shared assets, and produces one [`TileFit`]. Cells run on
//! a fixed-size worker pool and are joined before composition, which happens on
//! the calling thread because it writes one shared canvas and one matrix.

use crate::io::configuration::FALLBACK_WORKERS;
use crate::io::error::{MosaicError, Result};
use crate::mosaic::grid::{MosaicGrid, extract_region};
use crate::mosaic::matrix::IdentifierMatrix;
use crate::pattern::assets::PatternAssets;
use crate::pattern::render::{RenderMode, render};
use crate::search::optimizer::{FitMethod, TileFit, TileOptimizer};
use crate::search::solver::SolverOptions;
use image::{RgbImage, RgbaImage};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Output of a single assembly: composited image plus identifiers
#[derive(Clone, Debug)]
pub struct Mosaic {
    /// Composited tiles with transparency
    pub image: RgbaImage,
    /// Packed identifier of each cell, indexed `[x][y]`
    pub ids: IdentifierMatrix,
    /// Grid the mosaic was built on
    pub grid: MosaicGrid,
    /// Number of cells resolved by a fast path instead of the search
    pub fast_path_tiles: usize,
}

/// Worker count matching available hardware parallelism
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(FALLBACK_WORKERS, std::num::NonZeroUsize::get)
}

/// Builds mosaics from source images on a reusable worker pool
pub struct MosaicAssembler<'a> {
    optimizer: TileOptimizer<'a>,
    pool: ThreadPool,
}

impl<'a> MosaicAssembler<'a> {
    /// Assembler with `workers` threads, or one per core when `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the worker count is zero or the pool cannot start
    pub fn new(assets: &'a PatternAssets, workers: Option<usize>) -> Result<Self> {
        Self::with_options(assets, workers, SolverOptions::default())
    }

    /// Assembler with custom solver stopping criteria
    ///
    /// # Errors
    ///
    /// Returns an error if the worker count is zero or the pool cannot start
    pub fn with_options(
        assets: &'a PatternAssets,
        workers: Option<usize>,
        options: SolverOptions,
    ) -> Result<Self> {
        let workers = workers.unwrap_or_else(default_workers);
        if workers == 0 {
            return Err(crate::io::error::invalid_parameter(
                "threads",
                &workers,
                &"at least one worker is required",
            ));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("tile-worker-{index}"))
            .build()
            .map_err(|e| MosaicError::ThreadPool {
                reason: e.to_string(),
            })?;

        Ok(Self {
            optimizer: TileOptimizer::with_options(assets, options),
            pool,
        })
    }

    /// Number of worker threads
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Build the mosaic for `target`
    ///
    /// # Errors
    ///
    /// Returns an error if the image is too small for a single tile or any
    /// tile fails; no partial mosaic is produced
    pub fn assemble(&self, target: &RgbImage) -> Result<Mosaic> {
        self.assemble_with_progress(target, || {})
    }

    /// Build the mosaic, calling `on_tile` from the workers as each cell finishes
    ///
    /// # Errors
    ///
    /// Returns an error if the image is too small for a single tile or any
    /// tile fails; no partial mosaic is produced
    pub fn assemble_with_progress<P>(&self, target: &RgbImage, on_tile: P) -> Result<Mosaic>
    where
        P: Fn() + Sync,
    {
        let grid = MosaicGrid::for_image(target.width(), target.height());
        if grid.is_empty() {
            return Err(MosaicError::InvalidSourceData {
                reason: format!(
                    "{}x{} image is too small for a single tile",
                    target.width(),
                    target.height()
                ),
            });
        }

        log::info!(
            "Fitting {}x{} tiles on {} workers",
            grid.num_x,
            grid.num_y,
            self.workers()
        );

        let cells = grid.cells();
        let optimizer = &self.optimizer;
        let fits: Vec<((u32, u32), TileFit)> = self.pool.install(|| {
            cells
                .par_iter()
                .map(|&(x, y)| {
                    let region = extract_region(target, x, y);
                    let fit = optimizer.optimize(&region)?;
                    on_tile();
                    Ok(((x, y), fit))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Ok(self.compose(grid, &fits))
    }

    // Fits arrive in dispatch order, columns outermost
    fn compose(&self, grid: MosaicGrid, fits: &[((u32, u32), TileFit)]) -> Mosaic {
        let (width, height) = grid.canvas_size();
        let mut image = RgbaImage::new(width, height);
        let mut ids = IdentifierMatrix::zeros(grid.num_x as usize, grid.num_y as usize);
        let mut fast_path_tiles = 0;

        for ((x, y), fit) in fits.iter().map(|(cell, fit)| (*cell, fit)) {
            let tile = render(
                self.optimizer.assets(),
                &fit.parameters,
                RenderMode::FullColor,
                false,
            );
            let (left, top) = MosaicGrid::cell_origin(x, y);
            paste_with_alpha(&mut image, &tile, left, top);
            ids.set(x as usize, y as usize, fit.identifier());

            if matches!(fit.method, FitMethod::AllLight | FitMethod::AllDark) {
                fast_path_tiles += 1;
            }
        }

        log::debug!(
            "{fast_path_tiles} of {} tiles took a fast path",
            grid.cell_count()
        );

        Mosaic {
            image,
            ids,
            grid,
            fast_path_tiles,
        }
    }
}

// Rounded division by 255
const fn div255(value: u32) -> u32 {
    let tmp = value + 128;
    ((tmp >> 8) + tmp) >> 8
}

/// Paste `tile` onto `canvas` at (left, top), weighting by the tile's own alpha
///
/// Every channel, alpha included, becomes `(src * a + dst * (255 - a)) / 255`.
/// Pixels falling outside the canvas are dropped.
pub fn paste_with_alpha(canvas: &mut RgbaImage, tile: &RgbaImage, left: u32, top: u32) {
    for (tx, ty, src) in tile.enumerate_pixels() {
        let Some(dst) = canvas.get_pixel_mut_checked(left + tx, top + ty) else {
            continue;
        };
        let alpha = u32::from(src.0[3]);
        for (out, &incoming) in dst.0.iter_mut().zip(src.0.iter()) {
            let blended = div255(u32::from(incoming) * alpha + u32::from(*out) * (255 - alpha));
            *out = blended as u8;
        }
    }
}
