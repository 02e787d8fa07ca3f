//! docbin-test - Regression test framework for docbin
//!
//! Tracks indexed checks within a named regression test and supports
//! three modes:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files (default)
//! - **Display**: Run tests without comparison (visual inspection)
//!
//! Also provides deterministic synthetic pages, so tests never depend on
//! image files being present.
//!
//! # Usage
//!
//! ```ignore
//! use docbin_test::RegParams;
//!
//! let mut rp = RegParams::new("otsu");
//! rp.compare_values(127.0, threshold as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"
//! - `RUST_LOG`: tracing filter used by [`init_logging`]

mod error;
mod params;
pub mod synthetic;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use std::sync::Once;

/// Install a tracing subscriber for tests
///
/// Honors `RUST_LOG` (default `warn`) and writes through the test harness
/// so output is captured per test. Safe to call from every test.
pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // docbin-test is at crates/docbin-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
