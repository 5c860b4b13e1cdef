//! Heading tag parsing.
//!
//! Trailing italic words on headings and typed-key descriptions, e.g.
//! `` `app.dock()` _macOS_ _Deprecated_ ``, annotate platform and
//! stability. Only the closed set in [`DocumentationTag`] is accepted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MdexError, Result};
use crate::types::DocumentationTag;

static TAG_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"_([^_]+)_").expect("valid regex"));
static TRAILING_TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)((?: _(?:[^_]+?)_)+)$").expect("valid regex"));

/// Parse a run of italic tags such as `" _macOS_ _Deprecated_"`.
pub fn parse_heading_tags(tags: &str) -> Result<Vec<DocumentationTag>> {
    let mut out = Vec::new();
    for caps in TAG_TOKEN.captures_iter(tags) {
        let name = &caps[1];
        let tag = DocumentationTag::from_name(name).ok_or_else(|| MdexError::Parse {
            message: format!("Unknown heading tag \"{name}\""),
            help: Some(format!(
                "expected one of {}",
                DocumentationTag::ALLOWED.join(", ")
            )),
        })?;
        out.push(tag);
    }
    Ok(out)
}

/// Split trailing italic tags off a text.
///
/// Returns the cleaned text and the parsed tags; text without trailing
/// italics passes through unchanged.
pub fn split_trailing_tags(text: &str) -> Result<(String, Vec<DocumentationTag>)> {
    match TRAILING_TAGS.captures(text.trim_end()) {
        Some(caps) => {
            let cleaned = caps[1].trim_end().to_string();
            let tags = parse_heading_tags(&caps[2])?;
            Ok((cleaned, tags))
        }
        None => Ok((text.to_string(), Vec::new())),
    }
}
