//! Validate command implementation.
//!
//! Runs the full parse without writing the index, so documentation
//! errors surface in CI before anything consumes the output.

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::parser::parse_docs;

use super::SourceArgs;

/// Parse documentation without writing output
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let printer = Printer::new();
    let options = args.source.to_parse_options();

    printer.status("Validating", &display_path(&options.base_directory));
    let containers = parse_docs(&options)?;

    printer.success(
        "Finished",
        &plural(containers.len(), "container", "containers"),
    );
    Ok(())
}
