//! Geometry metrics validator CLI
//!
//! # Usage
//!
//! ```bash
//! geometry-validate --metrics work/metrics/metrics_001.json
//! ```
//!
//! # Exit Codes
//!
//! - 0: No geometry errors
//! - 1: Geometry errors found
//! - 2: Metrics file is not valid JSON
//! - 4: Metrics file not found

use clap::Parser;
use spec_validation::{run_geometry_cli, GeometryValidateCli};

fn main() {
    let cli = GeometryValidateCli::parse();
    let exit_code = run_geometry_cli(cli);
    std::process::exit(exit_code.into());
}
