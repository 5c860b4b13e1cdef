//! Build command implementation.
//!
//! Parses the documentation tree and writes the JSON API index.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{MdexError, Result};
use crate::output::{display_path, plural, Printer};
use crate::parser::parse_docs;

use super::SourceArgs;

/// Build a machine-readable API index from markdown docs
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file; stdout when omitted
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let printer = Printer::new();
    let options = args.source.to_parse_options();

    printer.status("Parsing", &display_path(&options.base_directory));
    let containers = parse_docs(&options)?;

    let json = serde_json::to_string_pretty(&containers).map_err(|err| MdexError::Parse {
        message: format!("Failed to serialize the API index: {err}"),
        help: None,
    })?;

    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    fs::create_dir_all(parent).map_err(|err| MdexError::Io {
                        path: parent.to_path_buf(),
                        message: format!("Failed to create output directory: {err}"),
                    })?;
                }
            }
            fs::write(out, json).map_err(|err| MdexError::Io {
                path: out.clone(),
                message: format!("Failed to write output: {err}"),
            })?;
            printer.success(
                "Finished",
                &format!(
                    "{} -> {}",
                    plural(containers.len(), "container", "containers"),
                    display_path(out)
                ),
            );
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::PackageMode;
    use tempfile::tempdir;

    fn source_args(dir: PathBuf) -> SourceArgs {
        SourceArgs {
            dir,
            api_dir: "docs/api".to_string(),
            use_readme: false,
            module_version: "1.0.0".to_string(),
            package_mode: PackageMode::Single,
            website_url: "https://site.dev/docs".to_string(),
            repo_url: "https://github.com/acme/acme/blob".to_string(),
            strict: false,
        }
    }

    #[test]
    fn test_build_writes_json_index() {
        let dir = tempdir().unwrap();
        let api = dir.path().join("docs/api");
        fs::create_dir_all(&api).unwrap();
        fs::write(
            api.join("app.md"),
            "# app\n\n## Methods\n\n### `app.quit()`\n\nQuits the application.\n",
        )
        .unwrap();
        let out = dir.path().join("out/api.json");

        run(BuildArgs {
            source: source_args(dir.path().to_path_buf()),
            out: Some(out.clone()),
        })
        .unwrap();

        let written = fs::read_to_string(&out).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value[0]["name"], "app");
        assert_eq!(value[0]["type"], "Module");
        assert_eq!(value[0]["methods"][0]["name"], "quit");
    }

    #[test]
    fn test_build_fails_on_broken_docs() {
        let dir = tempdir().unwrap();
        let api = dir.path().join("docs/api");
        fs::create_dir_all(&api).unwrap();
        fs::write(
            api.join("broken.md"),
            "# broken\n\n## Methods\n\n### `broken.go(speed)`\n\nMissing the list.\n",
        )
        .unwrap();
        let out = dir.path().join("api.json");

        let err = run(BuildArgs {
            source: source_args(dir.path().to_path_buf()),
            out: Some(out.clone()),
        })
        .unwrap_err();

        assert!(err.to_string().contains("broken.md"));
        // No partial output on failure.
        assert!(!out.exists());
    }
}
