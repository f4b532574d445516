//! Building spec validator CLI
//!
//! # Usage
//!
//! ```bash
//! spec-validate work/spec/building_v002.yaml
//! ```
//!
//! # Exit Codes
//!
//! - 0: Validation completed (PASS, PASS_WITH_WARNINGS or FAIL; see the report)
//! - 2: Spec file is not valid YAML
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 10: Internal error

use clap::Parser;
use spec_validation::{run_cli, SpecValidateCli};

fn main() {
    let cli = SpecValidateCli::parse();
    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
