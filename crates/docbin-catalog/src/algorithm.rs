//! The algorithm interface exposed through the catalog

use crate::CatalogResult;
use crate::params::{ParameterMap, ParameterSpec, ResolvedParams, defaults, resolve};
use docbin_core::PixelBuffer;

/// A binarization algorithm with a self-describing parameter schema
///
/// Implementations hold only read-only metadata, so one instance can be
/// shared by any number of concurrent callers.
pub trait Algorithm: Send + Sync {
    /// Catalog key, e.g. `"sauvola"`
    fn name(&self) -> &'static str;

    /// One-line human readable description
    fn description(&self) -> &'static str;

    /// Every parameter the algorithm accepts
    fn parameter_schema(&self) -> Vec<ParameterSpec>;

    /// Default value of every parameter
    fn default_params(&self) -> ParameterMap {
        defaults(&self.parameter_schema())
    }

    /// Check `params` against the schema without touching any pixels
    fn validate(&self, params: &ParameterMap) -> CatalogResult<ResolvedParams> {
        resolve(&self.parameter_schema(), params)
    }

    /// Binarize `image`, returning a new single-channel buffer
    fn apply(&self, image: &PixelBuffer, params: &ParameterMap) -> CatalogResult<PixelBuffer>;
}
