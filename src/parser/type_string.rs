//! The recursive type-string parser.
//!
//! Turns a raw type declaration like `(String | Object)[]` or
//! `Promise<Rectangle>` into structured [`TypeInformation`]. Splitting
//! is depth-aware across `<>` and `{}` so generic arguments and object
//! literals never leak across a union or argument boundary. An attached
//! typed-key list is offered to each candidate carrier and consumed at
//! most once across the whole parse.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MdexError, Result};
use crate::types::{MethodParameter, TypeInformation};

use super::string_enum::extract_string_enum;
use super::typed_keys::{TypedKey, TypedKeyList};
use super::Strictness;

static BRACKET_WRAPPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((.+)\)$").expect("valid regex"));

/// Split a type string on a separator, ignoring separators nested
/// inside `<>` or `{}`.
fn split_type_string_on(type_string: &str, separator: char) -> Vec<String> {
    let mut depth = 0i32;
    let mut current = String::new();
    let mut parts = Vec::new();
    for c in type_string.chars() {
        match c {
            '<' | '{' => {
                depth += 1;
                current.push(c);
            }
            '>' | '}' => {
                depth -= 1;
                current.push(c);
            }
            c if c == separator && depth == 0 => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
        .into_iter()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Top-level union members (`A | B`).
fn top_level_multi_types(type_string: &str) -> Vec<String> {
    split_type_string_on(type_string, '|')
}

/// Top-level ordered members (`A, B`), e.g. generic arguments.
fn top_level_ordered_types(type_string: &str) -> Vec<String> {
    split_type_string_on(type_string, ',')
}

/// The outer and inner part of a generic declaration, e.g.
/// `Promise<T>` -> `("Promise", "T")`.
fn top_level_generic_type(type_string: &str) -> Option<(&str, &str)> {
    if !type_string.ends_with('>') {
        return None;
    }
    let start = type_string.find('<')?;
    Some((
        &type_string[..start],
        &type_string[start + 1..type_string.len() - 1],
    ))
}

fn consume_sub_list(sub_list: &mut Option<&mut TypedKeyList>) -> Result<Option<Vec<TypedKey>>> {
    match sub_list.as_deref_mut() {
        Some(list) if !list.is_consumed() => Ok(Some(list.consume()?)),
        _ => Ok(None),
    }
}

/// Parse a raw type string into structured type information.
///
/// `related_description` feeds string enum extraction; `sub_list` is
/// the typed-key list attached to the declaration, if any.
pub fn raw_type_to_type_information(
    raw: &str,
    related_description: &str,
    mut sub_list: Option<&mut TypedKeyList>,
    strict: &Strictness,
) -> Result<TypeInformation> {
    let mut type_string = raw.trim().to_string();
    if type_string.is_empty() {
        return Err(MdexError::Parse {
            message: "Found an empty type declaration".to_string(),
            help: None,
        });
    }

    let mut collection = false;
    if let Some(stripped) = type_string.strip_suffix("[]") {
        collection = true;
        type_string = stripped.trim().to_string();
    }

    let mut was_bracket_wrapped = false;
    if let Some(caps) = BRACKET_WRAPPED.captures(&type_string) {
        was_bracket_wrapped = true;
        type_string = caps[1].trim().to_string();
    }

    let multi_types = top_level_multi_types(&type_string);
    if multi_types.len() > 1 {
        let mut member_strings = multi_types;
        if collection && !was_bracket_wrapped {
            // An unwrapped `A | B[]` scopes the collection suffix to
            // the final member only.
            if let Some(last) = member_strings.last_mut() {
                last.push_str("[]");
            }
        }
        let mut members = Vec::new();
        for member in &member_strings {
            members.push(raw_type_to_type_information(
                member,
                related_description,
                sub_list.as_deref_mut(),
                strict,
            )?);
        }
        return Ok(TypeInformation::Union {
            members,
            collection: collection && was_bracket_wrapped,
        });
    }

    if let Some((outer, inner)) = top_level_generic_type(&type_string) {
        let inner_strings = top_level_ordered_types(inner);
        match outer {
            "Function" => {
                let mut inner_strings = inner_strings;
                if inner_strings.is_empty() {
                    return Err(MdexError::Parse {
                        message: "Generic type Function<> should have at least one inner type"
                            .to_string(),
                        help: Some(
                            "declare at least a return type, e.g. Function<void>".to_string(),
                        ),
                    });
                }
                let returns_raw = inner_strings
                    .pop()
                    .unwrap_or_default();
                let returns =
                    raw_type_to_type_information(&returns_raw, related_description, None, strict)?;
                let parameters: Vec<MethodParameter> = if inner_strings.is_empty() {
                    consume_sub_list(&mut sub_list)?
                        .map(|keys| {
                            keys.into_iter()
                                .map(TypedKey::into_method_parameter)
                                .collect()
                        })
                        .unwrap_or_default()
                } else {
                    let mut parameters = Vec::new();
                    for param in &inner_strings {
                        parameters.push(MethodParameter {
                            name: String::new(),
                            description: String::new(),
                            required: true,
                            type_info: raw_type_to_type_information(param, "", None, strict)?,
                        });
                    }
                    parameters
                };
                return Ok(TypeInformation::Function {
                    parameters,
                    returns: Some(Box::new(returns)),
                    collection,
                });
            }
            "Event" => match inner_strings.len() {
                0 => {
                    return match consume_sub_list(&mut sub_list)? {
                        Some(keys) => Ok(TypeInformation::EventInline {
                            event_properties: keys
                                .into_iter()
                                .map(TypedKey::into_property_block)
                                .collect(),
                            collection,
                        }),
                        None => Err(MdexError::Parse {
                            message: "Event<> declaration without a parameter list".to_string(),
                            help: None,
                        }),
                    };
                }
                1 => {
                    let has_list = sub_list
                        .as_deref()
                        .map(|list| !list.is_consumed())
                        .unwrap_or(false);
                    if has_list {
                        return Err(MdexError::Parse {
                            message:
                                "Event<> should not have declared inner types AND a parameter list"
                                    .to_string(),
                            help: None,
                        });
                    }
                    let reference =
                        raw_type_to_type_information(&inner_strings[0], "", None, strict)?;
                    return Ok(TypeInformation::EventReference {
                        reference: Box::new(reference),
                        collection,
                    });
                }
                _ => {
                    return Err(MdexError::Parse {
                        message: "Event<> should have at most one inner type".to_string(),
                        help: None,
                    })
                }
            },
            _ => {
                if inner_strings.is_empty() {
                    return Err(MdexError::Parse {
                        message: format!(
                            "Generic type {outer}<> should have at least one inner type"
                        ),
                        help: None,
                    });
                }
                let mut inner_types = Vec::new();
                for inner_string in &inner_strings {
                    inner_types.push(raw_type_to_type_information(inner_string, "", None, strict)?);
                }
                // A bare Object argument adopts the attached key list,
                // e.g. `Promise<Object>` with a property list below.
                if let Some(keys) = {
                    let wants_object = inner_types.iter().any(
                        |t| matches!(t, TypeInformation::Object { properties, .. } if properties.is_empty()),
                    );
                    if wants_object {
                        consume_sub_list(&mut sub_list)?
                    } else {
                        None
                    }
                } {
                    if let Some(slot) = inner_types.iter_mut().find(
                        |t| matches!(t, TypeInformation::Object { properties, .. } if properties.is_empty()),
                    ) {
                        if let TypeInformation::Object { properties, .. } = slot {
                            *properties =
                                keys.into_iter().map(TypedKey::into_property_block).collect();
                        }
                    }
                }
                return Ok(TypeInformation::Generic {
                    name: outer.to_string(),
                    inner_types,
                    collection,
                });
            }
        }
    }

    match type_string.as_str() {
        "Function" => {
            let parameters = consume_sub_list(&mut sub_list)?
                .map(|keys| {
                    keys.into_iter()
                        .map(TypedKey::into_method_parameter)
                        .collect()
                })
                .unwrap_or_default();
            return Ok(TypeInformation::Function {
                parameters,
                returns: None,
                collection,
            });
        }
        "Object" => {
            let properties = consume_sub_list(&mut sub_list)?
                .map(|keys| {
                    keys.into_iter()
                        .map(TypedKey::into_property_block)
                        .collect()
                })
                .unwrap_or_default();
            return Ok(TypeInformation::Object {
                properties,
                collection,
            });
        }
        "String" | "string" => {
            let possible_values = match consume_sub_list(&mut sub_list)? {
                Some(keys) => Some(
                    keys.into_iter()
                        .map(TypedKey::into_possible_value)
                        .collect(),
                ),
                None => extract_string_enum(related_description)?,
            };
            return Ok(TypeInformation::StringEnum {
                possible_values,
                collection,
            });
        }
        "null" | "`null`" => {
            return Ok(TypeInformation::Simple {
                name: "null".to_string(),
                collection,
            })
        }
        _ => {}
    }

    if strict.capitalized_primitives && matches!(type_string.as_str(), "Boolean" | "Number") {
        return Err(MdexError::Validation {
            message: format!("Unexpected capitalized primitive type \"{type_string}\""),
            help: Some(format!(
                "write it lowercase as \"{}\"",
                type_string.to_lowercase()
            )),
        });
    }

    Ok(TypeInformation::Simple {
        name: type_string,
        collection,
    })
}
