//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::{golden_dir, regout_dir};
use docbin_core::{BinaryImage, GrayImage, PixelBuffer};
use docbin_io::ImageFormat;
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, a running check index, the mode and every
/// recorded failure. Checks never panic; call [`RegParams::cleanup`] at the
/// end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "otsu")
    pub test_name: String,
    /// Current test index (incremented before each check)
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters, mode taken from the environment
    pub fn new(test_name: &str) -> Self {
        Self::with_mode(test_name, RegTestMode::from_env())
    }

    /// Create new regression test parameters with an explicit mode
    pub fn with_mode(test_name: &str, mode: RegTestMode) -> Self {
        crate::init_logging();

        // Ensure directories exist
        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values within `delta`
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two grayscale images for exact equality
    pub fn compare_gray(&mut self, expected: &GrayImage, actual: &GrayImage) -> bool {
        self.index += 1;

        if expected.dimensions() != actual.dimensions() {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - dimension mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                expected.dimensions(),
                actual.dimensions()
            );
            return self.fail(msg);
        }

        let width = expected.width() as usize;
        if let Some(i) = expected
            .data()
            .iter()
            .zip(actual.data())
            .position(|(a, b)| a != b)
        {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - pixel mismatch at ({}, {})",
                self.test_name,
                self.index,
                i % width,
                i / width
            );
            return self.fail(msg);
        }

        true
    }

    /// Compare two binary images for exact equality
    pub fn compare_binary(&mut self, expected: &BinaryImage, actual: &BinaryImage) -> bool {
        self.compare_gray(expected.as_gray(), actual.as_gray())
    }

    /// Write an image to the regout directory and check it against its
    /// golden counterpart
    pub fn write_image_and_check(
        &mut self,
        buffer: &PixelBuffer,
        format: ImageFormat,
    ) -> TestResult<()> {
        self.index += 1;

        let local_path = format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            format.extension()
        );

        docbin_io::write_image(buffer, &local_path, format).map_err(|e| {
            TestError::ImageWrite {
                path: local_path.clone(),
                message: e.to_string(),
            }
        })?;

        self.check_file(&local_path)
    }

    /// Check a file against its golden counterpart
    ///
    /// In generate mode, copies the file to golden. In compare mode,
    /// compares decoded samples with the golden file; a missing golden file
    /// is reported but not counted as a failure, since goldens are only
    /// produced on demand. In display mode, does nothing.
    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let ext = Path::new(local_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    eprintln!(
                        "{}_reg index {}: no golden file {}, skipping",
                        self.test_name, self.index, golden_path
                    );
                    return Ok(());
                }

                let same = match (
                    docbin_io::read_image(local_path),
                    docbin_io::read_image(&golden_path),
                ) {
                    (Ok(a), Ok(b)) => a == b,
                    _ => false,
                };
                if !same {
                    let msg = format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    );
                    self.fail(msg);
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(RegTestMode::parse(""), RegTestMode::Compare);
        assert_eq!(RegTestMode::parse("GENERATE"), RegTestMode::Generate);
        assert_eq!(RegTestMode::parse("display"), RegTestMode::Display);
    }

    #[test]
    fn test_compare_values() {
        let mut rp = RegParams::with_mode("selftest_values", RegTestMode::Display);
        assert!(rp.compare_values(1.0, 1.05, 0.1));
        assert!(rp.is_success());
        assert!(!rp.compare_values(1.0, 2.0, 0.1));
        assert_eq!(rp.index(), 2);
        assert_eq!(rp.failures().len(), 1);
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_compare_gray_reports_position() {
        let mut rp = RegParams::with_mode("selftest_gray", RegTestMode::Display);
        let a = GrayImage::from_raw(3, 2, vec![0, 0, 0, 0, 0, 0]).unwrap();
        let mut b = a.clone();
        b.set_pixel(1, 1, 9).unwrap();
        assert!(rp.compare_gray(&a, &a));
        assert!(!rp.compare_gray(&a, &b));
        assert!(rp.failures()[0].contains("(1, 1)"));
    }
}
