use clap::Parser;
use mdex::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => mdex::cli::build::run(args)?,
        Commands::Validate(args) => mdex::cli::validate::run(args)?,
        Commands::Completions(args) => mdex::cli::completions::run(args)?,
    }

    Ok(())
}
