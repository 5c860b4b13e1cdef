use miette::Diagnostic;
use thiserror::Error;

/// Main error type for mdex operations
#[derive(Error, Diagnostic, Debug)]
pub enum MdexError {
    #[error("IO error: {0}")]
    #[diagnostic(code(mdex::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {}: {message}", path.display())]
    #[diagnostic(code(mdex::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(mdex::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(mdex::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Error while parsing {}: {source}", path.display())]
    #[diagnostic(code(mdex::file))]
    File {
        path: std::path::PathBuf,
        #[source]
        source: Box<MdexError>,
    },
}

impl MdexError {
    /// Wrap an error with the file it occurred in.
    pub fn in_file(self, path: impl Into<std::path::PathBuf>) -> Self {
        MdexError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MdexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_wraps_and_displays_path() {
        let err = MdexError::Parse {
            message: "bad heading".to_string(),
            help: None,
        }
        .in_file("docs/api/app.md");

        assert_eq!(
            err.to_string(),
            "Error while parsing docs/api/app.md: Parse error: bad heading"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
