//! docbin-binarize - Document image binarization
//!
//! Converts grayscale document scans into [`BinaryImage`]s separating ink
//! (0) from paper (255):
//!
//! - Local adaptive thresholds: Niblack, Sauvola, Wolf-Jolion and NICK,
//!   all driven by one integral-image statistics engine
//! - Otsu's method: global, three-level, and windowed with bilinear
//!   threshold interpolation
//! - 2D Otsu over the joint histogram of intensity and its guided-filtered
//!   version, with optional morphological cleanup
//!
//! Every function takes its input by shared reference and returns a newly
//! allocated image.
//!
//! [`BinaryImage`]: docbin_core::BinaryImage

mod error;
pub mod histogram;
pub mod joint;
pub mod local;
pub mod local_otsu;
pub mod multilevel;
pub mod otsu;

pub use error::{BinarizeError, BinarizeResult};
pub use histogram::Histogram;
pub use joint::{
    JointHistogram, JointThresholds, TwoDimensionalOtsuOptions, classify_joint,
    find_joint_thresholds, two_dimensional_otsu,
};
pub use local::{
    LocalMethod, LocalThresholdOptions, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE, local_threshold,
    local_threshold_map,
};
pub use local_otsu::{LocalOtsuOptions, local_otsu, local_otsu_threshold_map};
pub use multilevel::{MultilevelThresholds, compute_multilevel_thresholds, threshold_multilevel};
pub use otsu::{DEGENERATE_THRESHOLD, compute_otsu_threshold, otsu_threshold, threshold_otsu};
