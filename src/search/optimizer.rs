//! Best-fit spot layout search for a single source region
//!
//! Uniformly light and uniformly dark regions map straight to reserved
//! layouts. Anything else runs the bounded solver over `[0, 15]^8`, always
//! seeded at the dark layout. The score only changes when a coordinate crosses
//! an integer, so the gradient is a centered difference with a step of one
//! whole unit rather than an infinitesimal one.

use crate::io::configuration::{
    DARK_THRESHOLD, LIGHT_THRESHOLD, MAX_COORDINATE, PARAMETER_COUNT,
};
use crate::io::error::Result;
use crate::pattern::assets::PatternAssets;
use crate::pattern::codec::{ALL_DARK, ALL_LIGHT, SpotParameters};
use crate::pattern::score::{check_region, score_unchecked};
use crate::search::solver::{SolverOptions, SolverReport, minimize};
use image::RgbImage;

/// How a tile's layout was obtained
#[derive(Clone, Debug, PartialEq)]
pub enum FitMethod {
    /// Region was light everywhere
    AllLight,
    /// Region was dark everywhere
    AllDark,
    /// Layout came from the bounded search
    Searched {
        /// Accepted solver steps
        iterations: usize,
        /// Objective evaluations, excluding the gradient's
        evaluations: usize,
    },
}

/// Chosen layout for one region with its score
#[derive(Clone, Debug, PartialEq)]
pub struct TileFit {
    /// Winning spot layout
    pub parameters: SpotParameters,
    /// Score of `parameters` against the region
    pub score: f64,
    /// Whether a fast path or the search produced the layout
    pub method: FitMethod,
}

impl TileFit {
    /// Packed identifier of the winning layout
    pub fn identifier(&self) -> u32 {
        self.parameters.encode()
    }
}

/// True when every channel of every pixel is at least the light threshold
pub fn is_all_light(region: &RgbImage) -> bool {
    region
        .pixels()
        .all(|pixel| pixel.0.iter().all(|&c| c >= LIGHT_THRESHOLD))
}

/// True when the colour channels of every pixel are at most the dark threshold
pub fn is_all_dark(region: &RgbImage) -> bool {
    region
        .pixels()
        .all(|pixel| pixel.0.iter().take(3).all(|&c| c <= DARK_THRESHOLD))
}

// Missing trailing coordinates read as 0
fn to_point(values: &[f64]) -> [f64; PARAMETER_COUNT] {
    let mut point = [0.0; PARAMETER_COUNT];
    for (slot, &value) in point.iter_mut().zip(values) {
        *slot = value;
    }
    point
}

/// Unit-step centered difference of the score at a continuous point
///
/// Probes may fall outside `[0, 15]`; each probe is clamped before rendering.
pub fn unit_step_gradient(
    assets: &PatternAssets,
    region: &RgbImage,
    point: &[f64],
) -> [f64; PARAMETER_COUNT] {
    let probe = to_point(point);

    let mut gradient = [0.0; PARAMETER_COUNT];
    for (index, slot) in gradient.iter_mut().enumerate() {
        let centre = probe.get(index).copied().unwrap_or_default();
        let mut above = probe;
        let mut below = probe;
        if let (Some(a), Some(b)) = (above.get_mut(index), below.get_mut(index)) {
            *a = centre + 1.0;
            *b = centre - 1.0;
        }
        let hi = score_unchecked(assets, &SpotParameters::from_continuous(&above), region);
        let lo = score_unchecked(assets, &SpotParameters::from_continuous(&below), region);
        *slot = (hi - lo) / 2.0;
    }
    gradient
}

/// Fits spot layouts to source regions against a shared asset set
#[derive(Clone, Copy, Debug)]
pub struct TileOptimizer<'a> {
    assets: &'a PatternAssets,
    options: SolverOptions,
}

impl<'a> TileOptimizer<'a> {
    /// Optimizer with the default stopping criteria
    pub fn new(assets: &'a PatternAssets) -> Self {
        Self::with_options(assets, SolverOptions::default())
    }

    /// Optimizer with custom stopping criteria
    pub const fn with_options(assets: &'a PatternAssets, options: SolverOptions) -> Self {
        Self { assets, options }
    }

    /// Asset set tiles are rendered from
    pub const fn assets(&self) -> &'a PatternAssets {
        self.assets
    }

    /// Find the layout that best matches `region`
    ///
    /// Non-convergence is never an error; the best layout evaluated is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if `region` does not match the comparison crop size
    pub fn optimize(&self, region: &RgbImage) -> Result<TileFit> {
        check_region(region)?;

        if is_all_light(region) {
            return Ok(self.fast_path(ALL_LIGHT, region, FitMethod::AllLight));
        }
        if is_all_dark(region) {
            return Ok(self.fast_path(ALL_DARK, region, FitMethod::AllDark));
        }

        let report = self.search(region);
        let parameters = SpotParameters::from_continuous(&to_point(&report.point));

        log::debug!(
            "Search finished after {} steps ({:?}): {parameters} scores {:.1}",
            report.iterations,
            report.termination,
            report.value
        );

        Ok(TileFit {
            parameters,
            score: score_unchecked(self.assets, &parameters, region),
            method: FitMethod::Searched {
                iterations: report.iterations,
                evaluations: report.evaluations,
            },
        })
    }

    fn fast_path(&self, parameters: SpotParameters, region: &RgbImage, method: FitMethod) -> TileFit {
        TileFit {
            parameters,
            score: score_unchecked(self.assets, &parameters, region),
            method,
        }
    }

    fn search(&self, region: &RgbImage) -> SolverReport {
        let assets = self.assets;
        let lower = [0.0; PARAMETER_COUNT];
        let upper = [f64::from(MAX_COORDINATE); PARAMETER_COUNT];

        let objective = |point: &[f64]| {
            score_unchecked(assets, &SpotParameters::from_continuous(&to_point(point)), region)
        };
        let gradient = |point: &[f64]| unit_step_gradient(assets, region, point).to_vec();

        minimize(
            objective,
            gradient,
            &ALL_DARK.to_continuous(),
            &lower,
            &upper,
            &self.options,
        )
    }
}
