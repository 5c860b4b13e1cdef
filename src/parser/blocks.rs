//! Block assemblers.
//!
//! A block is one documented API surface: a method heading plus its
//! parameter list and return declaration, a property heading plus its
//! type sentence, or an `Event: 'name'` heading plus its payload list.
//! Assembly cross-checks the heading's signature against the documented
//! parameter list, so the two can never drift apart silently.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MdexError, Result};
use crate::markdown::{Token, TokenKind};
use crate::types::{ConstructorMethod, EventBlock, MethodBlock, MethodParameter, PropertyBlock};

use super::join::safely_join_tokens;
use super::ranges::{
    find_constructor_header, find_content_after_heading_close, find_content_after_list,
    find_next_list, headings_and_content, slugify_heading, HeadingGroup,
};
use super::returns::{extract_return_type, StripBehavior};
use super::tags::parse_heading_tags;
use super::typed_keys::convert_list_to_typed_keys;
use super::Strictness;

static METHOD_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^`(?:.+\.)?(.+?)(<.+>)?(\(.*\))`((?: _[^_]+?_)*)$").expect("valid regex")
});
static PROPERTY_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^`(.+?)`((?: _[^_]+?_)*)$").expect("valid regex"));
static EVENT_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Event: '([^']+)'((?: _[^_]+?_)*)$").expect("valid regex"));
static SIGNATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\((.+)\)$").expect("valid regex"));

/// One parameter name as declared in a method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParameter {
    pub name: String,
    pub optional: bool,
}

/// Read the parameter names out of a signature like `(a[, b])`.
///
/// A parameter is optional when it sits inside square brackets.
pub fn guess_parameters_from_signature(signature: &str) -> Result<Vec<SignatureParameter>> {
    let caps = SIGNATURE.captures(signature).ok_or_else(|| MdexError::Parse {
        message: format!(
            "The method signature should be a bracket wrapped group of parameters, found \"{signature}\""
        ),
        help: None,
    })?;

    let mut depth = 0i32;
    let mut params = Vec::new();
    let mut current = String::new();
    let mut current_optional = false;
    let mut finalize = |current: &mut String, current_optional: bool| {
        let name = current.trim().to_string();
        current.clear();
        if !name.is_empty() {
            params.push(SignatureParameter {
                name,
                optional: current_optional,
            });
        }
    };
    for c in caps[1].chars() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            ',' => finalize(&mut current, current_optional),
            c => {
                if current.trim().is_empty() && !c.is_whitespace() {
                    current_optional = depth > 0;
                }
                current.push(c);
            }
        }
    }
    finalize(&mut current, current_optional);
    Ok(params)
}

/// A method heading split into its pieces.
struct MethodHeading {
    name: String,
    raw_generics: Option<String>,
    signature: String,
    tags: String,
}

fn match_method_heading(heading: &str) -> Option<MethodHeading> {
    METHOD_HEADING.captures(heading).map(|caps| MethodHeading {
        name: caps[1].to_string(),
        raw_generics: caps.get(2).map(|m| m.as_str().to_string()),
        signature: caps[3].to_string(),
        tags: caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default(),
    })
}

fn parse_method_group(
    group: &HeadingGroup<'_>,
    heading: MethodHeading,
    strict: &Strictness,
) -> Result<MethodBlock> {
    let additional_tags = parse_heading_tags(&heading.tags)?;
    let url_fragment = format!("#{}", slugify_heading(&group.heading));

    let parameters = if heading.signature == "()" {
        Vec::new()
    } else {
        let guesses = guess_parameters_from_signature(&heading.signature)?;
        let content = find_content_after_heading_close(group.content);
        let list = find_next_list(content).ok_or_else(|| MdexError::Parse {
            message: format!(
                "Expected a parameter list for method \"{}\" since its signature declares parameters",
                heading.name
            ),
            help: None,
        })?;
        let documented = convert_list_to_typed_keys(list, strict)?.consume()?;
        if documented.len() != guesses.len() {
            return Err(MdexError::Validation {
                message: format!(
                    "Method \"{}\" documents {} parameters but its signature declares {}",
                    heading.name,
                    documented.len(),
                    guesses.len()
                ),
                help: None,
            });
        }
        let mut documented: Vec<Option<MethodParameter>> = documented
            .into_iter()
            .map(|key| Some(key.into_method_parameter()))
            .collect();
        let mut parameters = Vec::new();
        for guess in &guesses {
            let slot = documented
                .iter_mut()
                .find(|p| p.as_ref().is_some_and(|p| p.name == guess.name))
                .ok_or_else(|| MdexError::Validation {
                    message: format!(
                        "Signature parameter \"{}\" of method \"{}\" is not documented in its parameter list",
                        guess.name, heading.name
                    ),
                    help: None,
                })?;
            let mut param = slot.take().ok_or_else(|| MdexError::Validation {
                message: format!(
                    "Signature parameter \"{}\" of method \"{}\" is documented twice",
                    guess.name, heading.name
                ),
                help: None,
            })?;
            if param.required == guess.optional {
                return Err(MdexError::Validation {
                    message: format!(
                        "Parameter \"{}\" of method \"{}\" disagrees with the signature about optionality",
                        guess.name, heading.name
                    ),
                    help: Some(
                        "mark it \"(optional)\" in the parameter list exactly when the signature wraps it in square brackets"
                            .to_string(),
                    ),
                });
            }
            parameters.push(param);
        }
        parameters
    };

    let after = find_content_after_list(group.content, true);
    let extracted = extract_return_type(after, StripBehavior::Strip, "Returns", strict)?;

    Ok(MethodBlock {
        name: heading.name,
        signature: heading.signature,
        description: extracted.description,
        additional_tags,
        raw_generics: heading.raw_generics,
        url_fragment,
        parameters,
        returns: extracted.return_type,
    })
}

/// Assemble every method block under the given token range.
pub fn parse_method_blocks(
    tokens: Option<&[Token]>,
    strict: &Strictness,
) -> Result<Vec<MethodBlock>> {
    let Some(tokens) = tokens else {
        return Ok(Vec::new());
    };
    let mut methods = Vec::new();
    for group in headings_and_content(tokens)? {
        if let Some(heading) = match_method_heading(&group.heading) {
            methods.push(parse_method_group(&group, heading, strict)?);
        }
    }
    Ok(methods)
}

/// Assemble every property block under the given token range.
pub fn parse_property_blocks(
    tokens: Option<&[Token]>,
    strict: &Strictness,
) -> Result<Vec<PropertyBlock>> {
    let Some(tokens) = tokens else {
        return Ok(Vec::new());
    };
    let mut properties = Vec::new();
    for group in headings_and_content(tokens)? {
        let Some(caps) = PROPERTY_HEADING.captures(&group.heading) else {
            continue;
        };
        let full_name = caps[1].to_string();
        let name = full_name
            .rsplit('.')
            .next()
            .unwrap_or(&full_name)
            .to_string();
        let additional_tags =
            parse_heading_tags(caps.get(2).map(|m| m.as_str()).unwrap_or_default())?;

        let content = find_content_after_heading_close(group.content);
        let extracted = extract_return_type(content, StripBehavior::DoNotStrip, "An?", strict)?;
        let type_info = extracted.return_type.ok_or_else(|| MdexError::Parse {
            message: format!("Expected a type declaration for property \"{name}\""),
            help: Some(
                "property descriptions start with e.g. \"A `String` property that ...\""
                    .to_string(),
            ),
        })?;
        let required = !extracted.description.to_lowercase().contains("(optional)");

        properties.push(PropertyBlock {
            name,
            description: extracted.description,
            required,
            additional_tags,
            type_info,
        });
    }
    Ok(properties)
}

/// Assemble every event block under the given token range.
pub fn parse_event_blocks(
    tokens: Option<&[Token]>,
    strict: &Strictness,
) -> Result<Vec<EventBlock>> {
    let Some(tokens) = tokens else {
        return Ok(Vec::new());
    };
    let mut events = Vec::new();
    for group in headings_and_content(tokens)? {
        let Some(caps) = EVENT_HEADING.captures(&group.heading) else {
            continue;
        };
        let name = caps[1].to_string();
        let additional_tags =
            parse_heading_tags(caps.get(2).map(|m| m.as_str()).unwrap_or_default())?;

        let content = find_content_after_heading_close(group.content);
        let leads_with_returns = content
            .iter()
            .find(|t| t.kind == TokenKind::Inline)
            .is_some_and(|t| t.content.starts_with("Returns:"));

        let (parameters, description) = if leads_with_returns {
            let list = find_next_list(content).ok_or_else(|| MdexError::Parse {
                message: format!(
                    "Event \"{name}\" declares \"Returns:\" without a parameter list"
                ),
                help: None,
            })?;
            let parameters = convert_list_to_typed_keys(list, strict)?
                .consume()?
                .into_iter()
                .map(|key| key.into_method_parameter())
                .collect();
            let description = safely_join_tokens(find_content_after_list(content, false))?;
            (parameters, description)
        } else {
            (Vec::new(), safely_join_tokens(content)?)
        };

        events.push(EventBlock {
            name,
            description,
            additional_tags,
            parameters,
        });
    }
    Ok(events)
}

/// Assemble the constructor of a class section, when declared.
pub fn parse_constructor_method(
    tokens: &[Token],
    strict: &Strictness,
) -> Result<Option<ConstructorMethod>> {
    let Some(group) = find_constructor_header(tokens)? else {
        return Ok(None);
    };
    let heading = match_method_heading(&group.heading).ok_or_else(|| MdexError::Parse {
        message: format!("Could not parse constructor heading \"{}\"", group.heading),
        help: None,
    })?;
    let method = parse_method_group(&group, heading, strict)?;
    Ok(Some(ConstructorMethod {
        signature: method.signature,
        parameters: method.parameters,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::tokenize;
    use crate::types::{DocumentationTag, TypeInformation};
    use pretty_assertions::assert_eq;

    fn methods(source: &str) -> Vec<MethodBlock> {
        let tokens = tokenize(source);
        parse_method_blocks(Some(&tokens), &Strictness::default()).unwrap()
    }

    fn properties(source: &str) -> Vec<PropertyBlock> {
        let tokens = tokenize(source);
        parse_property_blocks(Some(&tokens), &Strictness::default()).unwrap()
    }

    fn events(source: &str) -> Vec<EventBlock> {
        let tokens = tokenize(source);
        parse_event_blocks(Some(&tokens), &Strictness::default()).unwrap()
    }

    #[test]
    fn test_parse_method_with_parameters() {
        let parsed = methods(
            "### `test.foo(x)`\n\n* `x` Integer - The number to square.\n\nReturns `Integer` - The square of `x`.",
        );

        assert_eq!(parsed.len(), 1);
        let method = &parsed[0];
        assert_eq!(method.name, "foo");
        assert_eq!(method.signature, "(x)");
        assert_eq!(method.url_fragment, "#testfoox");
        assert_eq!(method.parameters.len(), 1);
        assert_eq!(method.parameters[0].name, "x");
        assert!(method.parameters[0].required);
        assert_eq!(method.description, "The square of `x`.");
        assert_eq!(method.returns, Some(TypeInformation::simple("Integer")));
    }

    #[test]
    fn test_parse_method_without_parameters() {
        let parsed = methods("### `app.quit()`\n\nQuits the application.");

        assert_eq!(parsed[0].name, "quit");
        assert_eq!(parsed[0].signature, "()");
        assert!(parsed[0].parameters.is_empty());
        assert_eq!(parsed[0].description, "Quits the application.");
        assert!(parsed[0].returns.is_none());
    }

    #[test]
    fn test_parse_method_optional_parameter() {
        let parsed = methods(
            "### `win.show([options])`\n\n* `options` Object (optional)\n  * `focus` boolean - Focus the window.",
        );

        let param = &parsed[0].parameters[0];
        assert_eq!(param.name, "options");
        assert!(!param.required);
        assert!(matches!(param.type_info, TypeInformation::Object { .. }));
    }

    #[test]
    fn test_parse_method_optionality_mismatch_is_fatal() {
        // Bracketed in the signature but not marked "(optional)" in
        // the list.
        let tokens = tokenize("### `win.show([flag])`\n\n* `flag` boolean - Whether to focus.");
        let err = parse_method_blocks(Some(&tokens), &Strictness::default()).unwrap_err();
        assert!(err
            .to_string()
            .contains("disagrees with the signature about optionality"));

        // Marked "(optional)" in the list but required in the signature.
        let tokens =
            tokenize("### `win.show(flag)`\n\n* `flag` boolean (optional) - Whether to focus.");
        let err = parse_method_blocks(Some(&tokens), &Strictness::default()).unwrap_err();
        assert!(err
            .to_string()
            .contains("disagrees with the signature about optionality"));
    }

    #[test]
    fn test_parse_method_union_parameter_consumes_list_once() {
        let parsed = methods(
            "### `test.resize(options)`\n\n* `options` Object | Integer - Options or a width.\n  * `width` Integer - The width.",
        );

        match &parsed[0].parameters[0].type_info {
            TypeInformation::Union { members, .. } => {
                match &members[0] {
                    TypeInformation::Object { properties, .. } => {
                        assert_eq!(properties[0].name, "width")
                    }
                    other => panic!("expected object, got {other:?}"),
                }
                assert_eq!(members[1], TypeInformation::simple("Integer"));
            }
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_method_raw_generics() {
        let parsed = methods("### `test.getItems<T>(count)`\n\n* `count` Integer - How many.");
        assert_eq!(parsed[0].name, "getItems");
        assert_eq!(parsed[0].raw_generics.as_deref(), Some("<T>"));
        assert_eq!(parsed[0].signature, "(count)");
    }

    #[test]
    fn test_parse_method_platform_tags() {
        let parsed = methods("### `app.dock.bounce()` _macOS_\n\nBounces the dock icon.");
        assert_eq!(parsed[0].additional_tags, vec![DocumentationTag::OsMacos]);
        assert_eq!(
            parsed[0].url_fragment,
            "#appdockbounce-macos"
        );
    }

    #[test]
    fn test_parse_method_missing_parameter_list_is_fatal() {
        let tokens = tokenize("### `test.foo(x)`\n\nNo list here.");
        let err = parse_method_blocks(Some(&tokens), &Strictness::default()).unwrap_err();
        assert!(err.to_string().contains("Expected a parameter list"));
    }

    #[test]
    fn test_parse_method_undocumented_parameter_is_fatal() {
        let tokens = tokenize("### `test.foo(x, y)`\n\n* `x` Integer - x\n* `z` Integer - z");
        let err = parse_method_blocks(Some(&tokens), &Strictness::default()).unwrap_err();
        assert!(err.to_string().contains("\"y\""));
    }

    #[test]
    fn test_parse_method_parameter_count_mismatch_is_fatal() {
        let tokens = tokenize("### `test.foo(x)`\n\n* `x` Integer - x\n* `y` Integer - y");
        let err = parse_method_blocks(Some(&tokens), &Strictness::default()).unwrap_err();
        assert!(err.to_string().contains("documents 2 parameters"));
    }

    #[test]
    fn test_parse_methods_skips_non_method_headings() {
        let parsed = methods("### Notes\n\nProse only.\n\n### `app.quit()`\n\nQuits.");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "quit");
    }

    #[test]
    fn test_parse_methods_none_input() {
        assert!(parse_method_blocks(None, &Strictness::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_guess_parameters_simple() {
        let params = guess_parameters_from_signature("(a, b)").unwrap();
        assert_eq!(
            params,
            vec![
                SignatureParameter {
                    name: "a".to_string(),
                    optional: false
                },
                SignatureParameter {
                    name: "b".to_string(),
                    optional: false
                },
            ]
        );
    }

    #[test]
    fn test_guess_parameters_optional_tail() {
        let params = guess_parameters_from_signature("(a[, b])").unwrap();
        assert!(!params[0].optional);
        assert!(params[1].optional);
    }

    #[test]
    fn test_guess_parameters_all_optional() {
        let params = guess_parameters_from_signature("([a, b])").unwrap();
        assert!(params[0].optional && params[1].optional);
    }

    #[test]
    fn test_guess_parameters_nested_brackets() {
        let params = guess_parameters_from_signature("(a[, b[, c]])").unwrap();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(!params[0].optional);
        assert!(params[1].optional && params[2].optional);
    }

    #[test]
    fn test_guess_parameters_rest_parameter() {
        let params = guess_parameters_from_signature("(...args)").unwrap();
        assert_eq!(params[0].name, "...args");
    }

    #[test]
    fn test_guess_parameters_rejects_empty_signature() {
        let err = guess_parameters_from_signature("()").unwrap_err();
        assert!(err
            .to_string()
            .contains("signature should be a bracket wrapped group of parameters"));
    }

    #[test]
    fn test_parse_property_block() {
        let parsed = properties(
            "### `app.badgeCount`\n\nAn `Integer` property that sets the badge count.",
        );

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "badgeCount");
        assert!(parsed[0].required);
        assert_eq!(parsed[0].type_info, TypeInformation::simple("Integer"));
        assert_eq!(
            parsed[0].description,
            "An `Integer` property that sets the badge count."
        );
    }

    #[test]
    fn test_parse_property_optional() {
        let parsed = properties(
            "### `win.icon`\n\nA `NativeImage` (optional) property for the window icon.",
        );
        assert!(!parsed[0].required);
    }

    #[test]
    fn test_parse_property_readonly_tag() {
        let parsed = properties(
            "### `process.isMainFrame` _Readonly_\n\nA `boolean` property, `true` when the current frame is the main one.",
        );
        assert_eq!(
            parsed[0].additional_tags,
            vec![DocumentationTag::AvailabilityReadonly]
        );
    }

    #[test]
    fn test_parse_property_missing_type_is_fatal() {
        let tokens = tokenize("### `app.thing`\n\nThis property has no declared type.");
        let err = parse_property_blocks(Some(&tokens), &Strictness::default()).unwrap_err();
        assert!(err
            .to_string()
            .contains("Expected a type declaration for property \"thing\""));
    }

    #[test]
    fn test_parse_event_block() {
        let parsed = events("### Event: 'ready'\n\nEmitted when the application is ready.");

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "ready");
        assert_eq!(
            parsed[0].description,
            "Emitted when the application is ready."
        );
        assert!(parsed[0].parameters.is_empty());
    }

    #[test]
    fn test_parse_event_with_payload() {
        let parsed = events(
            "### Event: 'resize'\n\nReturns:\n\n* `event` Event - The event.\n* `width` Integer - New width.\n\nEmitted when the window resizes.",
        );

        assert_eq!(parsed[0].parameters.len(), 2);
        assert_eq!(parsed[0].parameters[0].name, "event");
        assert_eq!(parsed[0].parameters[1].name, "width");
        assert_eq!(parsed[0].description, "Emitted when the window resizes.");
    }

    #[test]
    fn test_parse_event_with_tags() {
        let parsed = events("### Event: 'new-window-for-tab' _macOS_\n\nEmitted on tab request.");
        assert_eq!(parsed[0].additional_tags, vec![DocumentationTag::OsMacos]);
    }

    #[test]
    fn test_parse_constructor() {
        let tokens = tokenize(
            "### `new BrowserWindow([options])`\n\n* `options` Object (optional)\n  * `width` Integer - Window width.",
        );
        let constructor = parse_constructor_method(&tokens, &Strictness::default())
            .unwrap()
            .unwrap();

        assert_eq!(constructor.signature, "([options])");
        assert_eq!(constructor.parameters.len(), 1);
        assert_eq!(constructor.parameters[0].name, "options");
        assert!(!constructor.parameters[0].required);
    }

    #[test]
    fn test_parse_constructor_absent() {
        let tokens = tokenize("## Instance Methods\n\n### `win.close()`\n\nCloses the window.");
        assert!(parse_constructor_method(&tokens, &Strictness::default())
            .unwrap()
            .is_none());
    }
}
