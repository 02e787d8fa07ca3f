//! docbin-filter - Windowed statistics and smoothing filters
//!
//! This crate provides the filtering building blocks of the binarizers:
//!
//! - Integral images answering windowed mean / standard deviation in O(1)
//! - Box filtering of floating-point images
//! - Guided filtering (edge-preserving smoothing)

pub mod box_filter;
mod error;
pub mod guided;
pub mod integral;

pub use error::{FilterError, FilterResult};

pub use box_filter::box_mean;
pub use guided::{
    GuidedFilterOptions, guided_filter, guided_filter_float, guided_filter_with_guide,
};
pub use integral::{IntegralImage, WindowStats};
