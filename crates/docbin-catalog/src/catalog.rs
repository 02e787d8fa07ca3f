//! AlgorithmCatalog - name-keyed registry of algorithms

use crate::algorithm::Algorithm;
use crate::algorithms::builtin_algorithms;
use crate::params::{ParameterMap, ResolvedParams};
use crate::{CatalogError, CatalogResult};
use docbin_core::PixelBuffer;
use std::collections::BTreeMap;
use tracing::debug_span;

/// Registry of algorithms, looked up by name
///
/// Construct one with [`AlgorithmCatalog::new`] and share it by reference;
/// it holds no mutable state after registration.
///
/// # Examples
///
/// ```
/// use docbin_catalog::{AlgorithmCatalog, ParameterMap};
/// use docbin_core::{GrayImage, PixelBuffer};
///
/// let catalog = AlgorithmCatalog::new();
/// let page: PixelBuffer = GrayImage::new_with_value(16, 16, 200).unwrap().into();
/// let out = catalog.apply("sauvola", &page, &ParameterMap::new()).unwrap();
/// assert_eq!(out.channels(), 1);
/// ```
pub struct AlgorithmCatalog {
    algorithms: BTreeMap<&'static str, Box<dyn Algorithm>>,
}

impl AlgorithmCatalog {
    /// Catalog holding every built-in algorithm
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        for alg in builtin_algorithms() {
            catalog.register(alg);
        }
        catalog
    }

    /// Catalog with nothing registered
    pub fn empty() -> Self {
        Self {
            algorithms: BTreeMap::new(),
        }
    }

    /// Add an algorithm, returning the one it replaces under the same name
    pub fn register(&mut self, algorithm: Box<dyn Algorithm>) -> Option<Box<dyn Algorithm>> {
        self.algorithms.insert(algorithm.name(), algorithm)
    }

    /// Look up an algorithm
    pub fn get(&self, name: &str) -> CatalogResult<&dyn Algorithm> {
        self.algorithms
            .get(name)
            .map(|a| a.as_ref())
            .ok_or_else(|| CatalogError::UnknownAlgorithm(name.to_string()))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        self.algorithms.keys().copied().collect()
    }

    /// Number of registered algorithms
    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// Validate parameters for one algorithm
    pub fn validate(&self, name: &str, params: &ParameterMap) -> CatalogResult<ResolvedParams> {
        self.get(name)?.validate(params)
    }

    /// Default parameters of one algorithm
    pub fn default_params(&self, name: &str) -> CatalogResult<ParameterMap> {
        Ok(self.get(name)?.default_params())
    }

    /// Run an algorithm on `image`
    ///
    /// # Errors
    ///
    /// - [`CatalogError::UnknownAlgorithm`] if `name` is not registered
    /// - [`CatalogError::Validation`] if a parameter fails its schema, in
    ///   which case no pixel work is done
    /// - [`CatalogError::Binarize`] for failures inside the algorithm
    pub fn apply(
        &self,
        name: &str,
        image: &PixelBuffer,
        params: &ParameterMap,
    ) -> CatalogResult<PixelBuffer> {
        let algorithm = self.get(name)?;
        let _span = debug_span!(
            "apply",
            algorithm = name,
            width = image.width(),
            height = image.height()
        )
        .entered();
        algorithm.apply(image, params)
    }

    /// JSON array describing an algorithm's parameters
    pub fn schema_json(&self, name: &str) -> CatalogResult<String> {
        let schema = self.get(name)?.parameter_schema();
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}

impl Default for AlgorithmCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AlgorithmCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmCatalog")
            .field("algorithms", &self.names())
            .finish()
    }
}
