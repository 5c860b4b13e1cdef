//! Return type extraction.
//!
//! A method's return type (and a property's type) is declared inline in
//! prose, e.g. ``Returns `Promise<Buffer>` - Resolves with the data.``
//! The declared type must be fully backtick wrapped; a trailing typed-key
//! list, when present, documents the returned object's shape.

use crate::error::{MdexError, Result};
use crate::markdown::Token;

use super::join::{safely_join_tokens_with, JoinOptions};
use super::ranges::find_next_list;
use super::type_string::raw_type_to_type_information;
use super::typed_keys::convert_list_to_typed_keys;
use super::Strictness;
use crate::types::TypeInformation;

/// Whether the matched declaration phrase is removed from the
/// surrounding description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripBehavior {
    Strip,
    DoNotStrip,
}

/// The outcome of scanning a token range for a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedReturn {
    pub description: String,
    pub return_type: Option<TypeInformation>,
}

/// Scan a token range for a `{prefix} `Type`` declaration.
///
/// `prefix` is a regex fragment, e.g. `"Returns"` for methods or
/// `"An?"` for properties.
pub fn extract_return_type(
    tokens: &[Token],
    strip: StripBehavior,
    prefix: &str,
    strict: &Strictness,
) -> Result<ExtractedReturn> {
    let description = safely_join_tokens_with(
        tokens,
        JoinOptions {
            parse_code_fences: true,
        },
    )?;

    // Most to least specific: a sentence-terminated declaration, a
    // hyphen-described one, then any backtick-wrapped phrase.
    let patterns = [
        format!(r"{prefix} `([^`]+?)`:?(?:\. |\n|$)"),
        format!(r"{prefix} `([^`]+?)` - "),
        format!(r"{prefix} `([^`]+?)` "),
    ];

    let mut matched: Option<(regex::Match<'_>, String)> = None;
    for pattern in &patterns {
        let re = regex::Regex::new(pattern).map_err(|err| MdexError::Parse {
            message: format!("Invalid return type pattern: {err}"),
            help: None,
        })?;
        if let Some(caps) = re.captures(&description) {
            let whole = caps.get(0).ok_or_else(|| MdexError::Parse {
                message: "Return type pattern matched without a capture".to_string(),
                help: None,
            })?;
            let raw_type = caps[1].to_string();
            matched = Some((whole, raw_type));
            break;
        }
    }

    let Some((whole, raw_type)) = matched else {
        return Ok(ExtractedReturn {
            description,
            return_type: None,
        });
    };

    if description[whole.end()..].trim_start().starts_with('|') {
        return Err(MdexError::Parse {
            message: format!(
                "Found a type declaration that continues with \"|\" outside the backticks: \"{raw_type}\""
            ),
            help: Some("wrap the entire union in a single pair of backticks".to_string()),
        });
    }

    // A trailing typed-key list describes the returned object; lists
    // that do not parse as typed keys are regular content.
    let mut sub_list = find_next_list(tokens)
        .and_then(|list| convert_list_to_typed_keys(list, strict).ok());

    let return_type = raw_type_to_type_information(
        &raw_type,
        &description,
        sub_list.as_mut(),
        strict,
    )?;

    let description = match strip {
        StripBehavior::Strip => description
            .replacen(whole.as_str(), "", 1)
            .trim()
            .to_string(),
        StripBehavior::DoNotStrip => description,
    };

    Ok(ExtractedReturn {
        description,
        return_type: Some(return_type),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::tokenize;
    use pretty_assertions::assert_eq;

    fn extract(source: &str, strip: StripBehavior, prefix: &str) -> ExtractedReturn {
        let tokens = tokenize(source);
        extract_return_type(&tokens, strip, prefix, &Strictness::default()).unwrap()
    }

    #[test]
    fn test_extract_sentence_terminated_declaration() {
        let out = extract(
            "Returns `String` - The copied text.",
            StripBehavior::Strip,
            "Returns",
        );
        assert_eq!(out.description, "The copied text.");
        assert!(matches!(
            out.return_type,
            Some(TypeInformation::StringEnum { .. })
        ));
    }

    #[test]
    fn test_extract_declaration_at_end_of_text() {
        let out = extract("Returns `Integer`", StripBehavior::Strip, "Returns");
        assert_eq!(out.description, "");
        assert_eq!(out.return_type, Some(TypeInformation::simple("Integer")));
    }

    #[test]
    fn test_extract_mid_sentence_declaration() {
        let out = extract(
            "Returns `Boolean` whether the window is focused.",
            StripBehavior::Strip,
            "Returns",
        );
        assert_eq!(out.description, "whether the window is focused.");
        assert_eq!(out.return_type, Some(TypeInformation::simple("Boolean")));
    }

    #[test]
    fn test_extract_without_declaration() {
        let out = extract("Emitted when ready.", StripBehavior::Strip, "Returns");
        assert_eq!(out.description, "Emitted when ready.");
        assert!(out.return_type.is_none());
    }

    #[test]
    fn test_extract_do_not_strip_keeps_phrase() {
        let out = extract(
            "An `Integer` property representing the count.",
            StripBehavior::DoNotStrip,
            "An?",
        );
        assert_eq!(
            out.description,
            "An `Integer` property representing the count."
        );
        assert_eq!(out.return_type, Some(TypeInformation::simple("Integer")));
    }

    #[test]
    fn test_extract_a_prefix_variant() {
        let out = extract(
            "A `Boolean` property that toggles the dock.",
            StripBehavior::DoNotStrip,
            "An?",
        );
        assert_eq!(out.return_type, Some(TypeInformation::simple("Boolean")));
    }

    #[test]
    fn test_extract_rejects_union_outside_backticks() {
        let tokens = tokenize("Returns `String` | `null` - The result.");
        let err = extract_return_type(&tokens, StripBehavior::Strip, "Returns", &Strictness::default())
            .unwrap_err();
        assert!(err.to_string().contains("backticks"));
    }

    #[test]
    fn test_extract_object_shape_from_list() {
        let out = extract(
            "Returns `Object` - The bounds:\n\n* `x` Integer - x\n* `y` Integer - y",
            StripBehavior::Strip,
            "Returns",
        );
        match out.return_type {
            Some(TypeInformation::Object { properties, .. }) => {
                assert_eq!(properties.len(), 2);
                assert_eq!(properties[0].name, "x");
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_promise_object_shape_from_list() {
        let out = extract(
            "Returns `Promise<Object>` - Resolves with:\n\n* `code` Integer - exit code",
            StripBehavior::Strip,
            "Returns",
        );
        match out.return_type {
            Some(TypeInformation::Generic { inner_types, .. }) => match &inner_types[0] {
                TypeInformation::Object { properties, .. } => {
                    assert_eq!(properties[0].name, "code")
                }
                other => panic!("expected object, got {other:?}"),
            },
            other => panic!("expected generic, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_ignores_unparseable_list() {
        // A regular content list is not a typed-key list; the type
        // still parses, with no object shape attached.
        let out = extract(
            "Returns `Object` - See:\n\n* plain prose item",
            StripBehavior::Strip,
            "Returns",
        );
        match out.return_type {
            Some(TypeInformation::Object { properties, .. }) => assert!(properties.is_empty()),
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_string_enum_from_surrounding_text() {
        let out = extract(
            "Returns `String` - Can be `visible` or `hidden`.",
            StripBehavior::Strip,
            "Returns",
        );
        match out.return_type {
            Some(TypeInformation::StringEnum {
                possible_values: Some(values),
                ..
            }) => {
                assert_eq!(values[0].value, "visible");
                assert_eq!(values[1].value, "hidden");
            }
            other => panic!("expected string enum, got {other:?}"),
        }
    }
}
