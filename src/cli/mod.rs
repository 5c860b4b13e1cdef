pub mod build;
pub mod completions;
pub mod validate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::parser::{PackageMode, ParseOptions, Strictness};
use crate::parser::{DEFAULT_API_DIR, DEFAULT_REPO_BASE_URL, DEFAULT_WEBSITE_BASE_URL};

/// mdex - Markdown API documentation extractor
#[derive(Parser, Debug)]
#[command(name = "mdex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a machine-readable API index from markdown docs
    Build(build::BuildArgs),

    /// Parse documentation without writing output
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Arguments shared by every command that parses a documentation tree.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Root directory of the documented project
    #[arg(long)]
    pub dir: PathBuf,

    /// API docs directory, relative to --dir
    #[arg(long, default_value = DEFAULT_API_DIR)]
    pub api_dir: String,

    /// Parse the project README.md as the single API file
    #[arg(long)]
    pub use_readme: bool,

    /// Version recorded in every container
    #[arg(long, default_value = "0.0.0")]
    pub module_version: String,

    /// How classes documented next to a module are attached
    #[arg(long, value_enum, default_value_t = PackageMode::Single)]
    pub package_mode: PackageMode,

    /// Base URL for generated website links
    #[arg(long, default_value = DEFAULT_WEBSITE_BASE_URL)]
    pub website_url: String,

    /// Base URL for generated repository links
    #[arg(long, default_value = DEFAULT_REPO_BASE_URL)]
    pub repo_url: String,

    /// Enable strict lint rules
    #[arg(long)]
    pub strict: bool,
}

impl SourceArgs {
    pub fn to_parse_options(&self) -> ParseOptions {
        ParseOptions {
            base_directory: self.dir.clone(),
            api_dir: self.api_dir.clone(),
            use_readme: self.use_readme,
            module_version: self.module_version.clone(),
            package_mode: self.package_mode,
            website_base_url: self.website_url.clone(),
            repo_base_url: self.repo_url.clone(),
            strictness: if self.strict {
                Strictness::strict()
            } else {
                Strictness::default()
            },
        }
    }
}
