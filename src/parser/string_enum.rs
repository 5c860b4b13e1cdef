//! String enum extraction.
//!
//! Prose like ``Can be `left`, `right` or `center`.`` enumerates the
//! legal values of a string-typed key. Extraction runs a character
//! level state machine over the text after a locator phrase, so errors
//! can point at the exact offending character.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MdexError, Result};
use crate::types::PossibleStringValue;

static LOCATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:can be|values? includes?)\s+").expect("valid regex"));

const QUOTES: [char; 3] = ['`', '\'', '"'];
/// Longest match first so `", and "` wins over `", "` and `","`.
const SEPARATORS: [&str; 6] = [", and ", ", or ", " and ", " or ", ", ", ","];
const DEPRECATED_SUFFIX: &str = " (Deprecated)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectValue,
    InValue,
    ExpectSeparator,
}

/// Extract enumerated string values from a description.
///
/// Returns `Ok(None)` when the description carries no locator phrase or
/// no quoted values; malformed enumerations after the locator are
/// errors.
pub fn extract_string_enum(description: &str) -> Result<Option<Vec<PossibleStringValue>>> {
    let Some(located) = LOCATOR.find(description) else {
        return Ok(None);
    };
    let target: Vec<char> = description[located.end()..].chars().collect();

    let mut state = State::ExpectValue;
    let mut values: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut quote = '\0';
    let mut wraps = 0usize;
    let mut could_be_done = false;
    let mut i = 0usize;

    while i < target.len() {
        let c = target[i];
        match state {
            State::ExpectValue => {
                if c == ' ' {
                    i += 1;
                    continue;
                }
                if c == '~' {
                    wraps += 1;
                    i += 1;
                    continue;
                }
                if QUOTES.contains(&c) {
                    quote = c;
                    current.clear();
                    state = State::InValue;
                    i += 1;
                    continue;
                }
                if rest_starts_with(&target, i, "an Object") {
                    break;
                }
                if could_be_done || values.is_empty() {
                    // A comma separator permits trailing prose, and a
                    // description with no quoted values is not an
                    // enumeration at all.
                    break;
                }
                return Err(MdexError::Parse {
                    message: format!(
                        "Unexpected token while extracting string enum, expected a quote character but found \"{c}\""
                    ),
                    help: Some(context_snippet(&target, i)),
                });
            }
            State::InValue => {
                if c == quote {
                    i += 1;
                    while wraps > 0 {
                        match target.get(i) {
                            Some('~') => {
                                wraps -= 1;
                                i += 1;
                            }
                            other => {
                                let found = other
                                    .map(|c| c.to_string())
                                    .unwrap_or_else(|| "end of input".to_string());
                                return Err(MdexError::Parse {
                                    message: format!(
                                        "Expected an unwrapping token that matched \"~\" but found \"{found}\""
                                    ),
                                    help: Some(context_snippet(&target, i)),
                                });
                            }
                        }
                    }
                    if rest_starts_with(&target, i, DEPRECATED_SUFFIX) {
                        i += DEPRECATED_SUFFIX.chars().count();
                    }
                    values.push(std::mem::take(&mut current));
                    could_be_done = false;
                    state = State::ExpectSeparator;
                    continue;
                }
                current.push(c);
                i += 1;
            }
            State::ExpectSeparator => {
                if let Some(sep) = SEPARATORS
                    .iter()
                    .find(|sep| rest_starts_with(&target, i, sep))
                {
                    could_be_done = matches!(*sep, ", " | ",");
                    i += sep.chars().count();
                    state = State::ExpectValue;
                    continue;
                }
                if c == '.' || c == ';' {
                    break;
                }
                if rest_starts_with(&target, i, " - ") {
                    break;
                }
                if c == ' ' {
                    i += 1;
                    continue;
                }
                return Err(MdexError::Parse {
                    message: format!(
                        "Unexpected separator token while extracting string enum, expected a comma or \"and\" or \"or\" but found \"{c}\""
                    ),
                    help: Some(context_snippet(&target, i)),
                });
            }
        }
    }

    if state == State::InValue {
        return Err(MdexError::Parse {
            message: "Unexpected early termination of token sequence while extracting string enum, did you forget to close a quote?"
                .to_string(),
            help: Some(context_snippet(&target, target.len())),
        });
    }

    if values.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        values
            .into_iter()
            .map(|value| PossibleStringValue {
                value,
                description: String::new(),
            })
            .collect(),
    ))
}

fn rest_starts_with(target: &[char], i: usize, prefix: &str) -> bool {
    let mut chars = prefix.chars();
    let mut j = i;
    for expected in chars.by_ref() {
        match target.get(j) {
            Some(&c) if c == expected => j += 1,
            _ => return false,
        }
    }
    true
}

/// Caret-annotated snippet pointing at the offending character.
fn context_snippet(target: &[char], i: usize) -> String {
    let line: String = target.iter().collect();
    let caret = i.min(target.len());
    format!("Context:\n{line}\n{}^", " ".repeat(caret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(description: &str) -> Vec<String> {
        extract_string_enum(description)
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|v| v.value)
            .collect()
    }

    #[test]
    fn test_extract_comma_separated() {
        assert_eq!(
            values("Can be `left`, `right` or `center`."),
            vec!["left", "right", "center"]
        );
    }

    #[test]
    fn test_extract_oxford_comma() {
        assert_eq!(
            values("Can be `a`, `b`, and `c`."),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_extract_values_include_phrase() {
        assert_eq!(
            values("Possible values include `x` and `y`."),
            vec!["x", "y"]
        );
    }

    #[test]
    fn test_extract_mixed_quote_characters() {
        assert_eq!(
            values("Can be `a` or 'b' or \"c\"."),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_extract_strikethrough_wrapped_value() {
        assert_eq!(values("Can be ~~`old`~~ or `new`."), vec!["old", "new"]);
    }

    #[test]
    fn test_extract_skips_deprecated_suffix() {
        assert_eq!(
            values("Can be `legacy` (Deprecated) or `modern`."),
            vec!["legacy", "modern"]
        );
    }

    #[test]
    fn test_extract_terminates_on_semicolon() {
        assert_eq!(values("Can be `a` or `b`; other prose."), vec!["a", "b"]);
    }

    #[test]
    fn test_extract_terminates_on_hyphen() {
        assert_eq!(
            values("Can be `a` or `b` - which controls the mode."),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_extract_terminates_on_an_object() {
        assert_eq!(
            values("Can be `a`, `b` or an Object."),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_extract_graceful_stop_after_comma() {
        // A comma may continue into prose rather than another value.
        assert_eq!(
            values("Can be `a`, `b`, which is the default."),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_extract_none_without_locator() {
        assert_eq!(extract_string_enum("A plain description.").unwrap(), None);
    }

    #[test]
    fn test_extract_none_without_quoted_values() {
        assert_eq!(
            extract_string_enum("The value can be anything you want.").unwrap(),
            None
        );
    }

    #[test]
    fn test_extract_unexpected_separator_error() {
        let err = extract_string_enum("Can be `x` sometimes").unwrap_err();
        let message = err.to_string();
        assert!(message.contains(
            "Unexpected separator token while extracting string enum, expected a comma or \"and\" or \"or\" but found \"s\""
        ));
    }

    #[test]
    fn test_extract_unterminated_quote_error() {
        let err = extract_string_enum("Can be `x").unwrap_err();
        assert!(err.to_string().contains(
            "Unexpected early termination of token sequence while extracting string enum"
        ));
    }

    #[test]
    fn test_extract_mismatched_unwrap_error() {
        let err = extract_string_enum("Can be ~~`old` or `new`.").unwrap_err();
        assert!(err
            .to_string()
            .contains("Expected an unwrapping token that matched"));
    }
}
