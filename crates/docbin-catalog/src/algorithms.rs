//! Built-in algorithms
//!
//! Each type converts its resolved parameters into the option struct of
//! the matching `docbin-binarize` function and runs it on the luma of the
//! input buffer.

use crate::algorithm::Algorithm;
use crate::params::{ParameterMap, ParameterSpec, ResolvedParams, resolve};
use crate::{CatalogError, CatalogResult};
use docbin_binarize::{
    LocalMethod, LocalOtsuOptions, LocalThresholdOptions, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE,
    TwoDimensionalOtsuOptions, local_otsu, local_threshold, threshold_multilevel, threshold_otsu,
    two_dimensional_otsu,
};
use docbin_core::PixelBuffer;
use tracing::debug;

/// Niblack, Sauvola, Wolf-Jolion or NICK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalAlgorithm {
    method: LocalMethod,
}

impl LocalAlgorithm {
    pub fn new(method: LocalMethod) -> Self {
        Self { method }
    }

    fn options(&self, p: &ResolvedParams) -> CatalogResult<LocalThresholdOptions> {
        let mut opts = LocalThresholdOptions::for_method(self.method)
            .with_window_size(p.uint("window_size")?)
            .with_k(p.float("k")?);
        if self.method == LocalMethod::Sauvola {
            opts = opts.with_r(p.float("r")?);
        }
        Ok(opts)
    }
}

impl Algorithm for LocalAlgorithm {
    fn name(&self) -> &'static str {
        match self.method {
            LocalMethod::Niblack => "niblack",
            LocalMethod::Sauvola => "sauvola",
            LocalMethod::WolfJolion => "wolf_jolion",
            LocalMethod::Nick => "nick",
        }
    }

    fn description(&self) -> &'static str {
        match self.method {
            LocalMethod::Niblack => "Local mean plus k times local standard deviation",
            LocalMethod::Sauvola => "Local mean scaled by normalized local contrast",
            LocalMethod::WolfJolion => "Local mean corrected by contrast relative to the page mean",
            LocalMethod::Nick => "Niblack variant using the local root mean square",
        }
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        let (k_min, k_max) = self.method.k_range();
        let mut schema = vec![
            ParameterSpec::int(
                "window_size",
                MIN_WINDOW_SIZE as i64,
                MAX_WINDOW_SIZE as i64,
                15,
                "Side of the square window; even values are rounded up",
            ),
            ParameterSpec::float("k", k_min, k_max, self.method.default_k(), "Formula weight"),
        ];
        if self.method == LocalMethod::Sauvola {
            schema.push(ParameterSpec::float(
                "r",
                50.0,
                255.0,
                128.0,
                "Dynamic range of the standard deviation",
            ));
        }
        schema
    }

    fn apply(&self, image: &PixelBuffer, params: &ParameterMap) -> CatalogResult<PixelBuffer> {
        let opts = self.options(&self.validate(params)?)?;
        debug!(algorithm = self.name(), ?opts, "resolved parameters");
        Ok(local_threshold(&image.to_gray(), &opts)?.into())
    }
}

/// Global Otsu threshold
#[derive(Debug, Clone, Copy, Default)]
pub struct Otsu;

impl Algorithm for Otsu {
    fn name(&self) -> &'static str {
        "otsu"
    }

    fn description(&self) -> &'static str {
        "Single global threshold maximizing between-class variance"
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn apply(&self, image: &PixelBuffer, params: &ParameterMap) -> CatalogResult<PixelBuffer> {
        self.validate(params)?;
        Ok(threshold_otsu(&image.to_gray())?.into())
    }
}

/// Three-class Otsu producing levels 0, 127 and 255
#[derive(Debug, Clone, Copy, Default)]
pub struct MultilevelOtsu;

impl Algorithm for MultilevelOtsu {
    fn name(&self) -> &'static str {
        "otsu_multilevel"
    }

    fn description(&self) -> &'static str {
        "Two Otsu thresholds splitting the page into three gray levels"
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn apply(&self, image: &PixelBuffer, params: &ParameterMap) -> CatalogResult<PixelBuffer> {
        self.validate(params)?;
        Ok(threshold_multilevel(&image.to_gray())?.into())
    }
}

/// Otsu over overlapping windows
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOtsu;

impl Algorithm for LocalOtsu {
    fn name(&self) -> &'static str {
        "otsu_local"
    }

    fn description(&self) -> &'static str {
        "Per-window Otsu thresholds, optionally interpolated between windows"
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        let d = LocalOtsuOptions::default();
        vec![
            ParameterSpec::int(
                "window_size",
                2,
                1024,
                d.window_size as i64,
                "Side of each square window",
            ),
            ParameterSpec::float(
                "overlap",
                0.0,
                0.99,
                d.overlap,
                "Fraction of a window shared with its neighbour",
            ),
            ParameterSpec::bool(
                "interpolation",
                d.interpolation,
                "Bilinearly interpolate thresholds between window centres",
            ),
        ]
    }

    fn apply(&self, image: &PixelBuffer, params: &ParameterMap) -> CatalogResult<PixelBuffer> {
        let p = self.validate(params)?;
        let opts = LocalOtsuOptions {
            window_size: p.uint("window_size")?,
            overlap: p.float("overlap")?,
            interpolation: p.bool("interpolation")?,
        };
        debug!(algorithm = self.name(), ?opts, "resolved parameters");
        Ok(local_otsu(&image.to_gray(), &opts)?.into())
    }
}

/// 2D Otsu over intensity and guided-filter response
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoDimensionalOtsu;

impl TwoDimensionalOtsu {
    fn options(&self, p: &ResolvedParams) -> CatalogResult<TwoDimensionalOtsuOptions> {
        let morph_kernel = p.uint("morph_kernel")?;
        if morph_kernel > 1 && morph_kernel % 2 == 0 {
            return Err(CatalogError::validation(
                "morph_kernel",
                format!("must be odd (or 0/1 to disable), got {}", morph_kernel),
            ));
        }
        let opts = TwoDimensionalOtsuOptions {
            radius: p.uint("radius")?,
            epsilon: p.float("epsilon")? as f32,
            morph_kernel,
            preview_scale: p.float("preview_scale")? as f32,
        };
        opts.validate()?;
        Ok(opts)
    }
}

impl Algorithm for TwoDimensionalOtsu {
    fn name(&self) -> &'static str {
        "otsu_2d"
    }

    fn description(&self) -> &'static str {
        "Joint-histogram Otsu on intensity and its guided-filter smoothing"
    }

    fn parameter_schema(&self) -> Vec<ParameterSpec> {
        let d = TwoDimensionalOtsuOptions::default();
        vec![
            ParameterSpec::int("radius", 1, 50, d.radius as i64, "Guided filter radius"),
            ParameterSpec::float(
                "epsilon",
                0.0001,
                1.0,
                d.epsilon as f64,
                "Guided filter regularization",
            ),
            ParameterSpec::int(
                "morph_kernel",
                0,
                15,
                d.morph_kernel as i64,
                "Odd open/close kernel size; 0 or 1 disables cleanup",
            ),
            ParameterSpec::float(
                "preview_scale",
                0.01,
                1.0,
                d.preview_scale as f64,
                "Process a reduced copy scaled by this factor",
            ),
        ]
    }

    fn validate(&self, params: &ParameterMap) -> CatalogResult<ResolvedParams> {
        let p = resolve(&self.parameter_schema(), params)?;
        self.options(&p)?;
        Ok(p)
    }

    fn apply(&self, image: &PixelBuffer, params: &ParameterMap) -> CatalogResult<PixelBuffer> {
        let opts = self.options(&self.validate(params)?)?;
        debug!(algorithm = self.name(), ?opts, "resolved parameters");
        Ok(two_dimensional_otsu(&image.to_gray(), &opts)?.into())
    }
}

/// Every built-in algorithm
pub fn builtin_algorithms() -> Vec<Box<dyn Algorithm>> {
    vec![
        Box::new(LocalAlgorithm::new(LocalMethod::Niblack)),
        Box::new(LocalAlgorithm::new(LocalMethod::Sauvola)),
        Box::new(LocalAlgorithm::new(LocalMethod::WolfJolion)),
        Box::new(LocalAlgorithm::new(LocalMethod::Nick)),
        Box::new(Otsu),
        Box::new(MultilevelOtsu),
        Box::new(LocalOtsu),
        Box::new(TwoDimensionalOtsu),
    ]
}
