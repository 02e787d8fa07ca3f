//! docbin-catalog - Algorithm registry with parameter schemas
//!
//! Exposes every binarization algorithm behind one [`Algorithm`] trait:
//! a name, a description, a parameter schema with defaults, validation,
//! and `apply` on a [`PixelBuffer`]. Parameters arrive as a loosely typed
//! [`ParameterMap`] (usually JSON) and are validated against the schema
//! before any pixel work.
//!
//! # Examples
//!
//! ```
//! use docbin_catalog::{AlgorithmCatalog, parse_params_json};
//! use docbin_core::{GrayImage, PixelBuffer};
//!
//! let catalog = AlgorithmCatalog::new();
//! let params = parse_params_json(r#"{"window_size": 21.0, "k": -0.3}"#).unwrap();
//! let page: PixelBuffer = GrayImage::from_fn(40, 40, |x, _| if x < 20 { 40 } else { 210 })
//!     .unwrap()
//!     .into();
//! let out = catalog.apply("niblack", &page, &params).unwrap();
//! assert_eq!(out.data().len(), 40 * 40);
//! ```
//!
//! [`PixelBuffer`]: docbin_core::PixelBuffer

pub mod algorithm;
pub mod algorithms;
pub mod catalog;
mod error;
pub mod params;

pub use algorithm::Algorithm;
pub use algorithms::{
    LocalAlgorithm, LocalOtsu, MultilevelOtsu, Otsu, TwoDimensionalOtsu, builtin_algorithms,
};
pub use catalog::AlgorithmCatalog;
pub use error::{CatalogError, CatalogResult};
pub use params::{
    ParamType, ParamValue, ParameterMap, ParameterSpec, ResolvedParams, parse_params_json,
};
