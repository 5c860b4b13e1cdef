//! The typed-key list grammar.
//!
//! A typed-key list is a bullet list whose items each document one key:
//!
//! ```markdown
//! * `width` Integer (optional) - The width of the window. _macOS_
//!   * `min` Integer - Lower bound.
//! ```
//!
//! Items nest to describe object shapes. A converted list is wrapped in
//! a single-use [`TypedKeyList`] so one attached list can never document
//! two different carriers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MdexError, Result};
use crate::markdown::{Token, TokenKind};
use crate::types::{DocumentationTag, MethodParameter, PossibleStringValue, PropertyBlock, TypeInformation};

use super::join::safely_join_tokens;
use super::ranges::list_bounds;
use super::tags::split_trailing_tags;
use super::type_string::raw_type_to_type_information;
use super::Strictness;

static OPTIONAL_LOWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ?\(optional\) ?").expect("valid regex"));
static OPTIONAL_ANY_CASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) ?\(optional\) ?").expect("valid regex"));

/// One documented key of a typed-key list.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedKey {
    pub key: String,
    pub type_info: TypeInformation,
    pub description: String,
    pub required: bool,
    pub additional_tags: Vec<DocumentationTag>,
}

impl TypedKey {
    pub fn into_method_parameter(self) -> MethodParameter {
        MethodParameter {
            name: self.key,
            description: self.description,
            required: self.required,
            type_info: self.type_info,
        }
    }

    pub fn into_property_block(self) -> PropertyBlock {
        PropertyBlock {
            name: self.key,
            description: self.description,
            required: self.required,
            additional_tags: self.additional_tags,
            type_info: self.type_info,
        }
    }

    pub fn into_possible_value(self) -> PossibleStringValue {
        PossibleStringValue {
            value: self.key,
            description: self.description,
        }
    }
}

/// A converted typed-key list that can be consumed exactly once.
#[derive(Debug)]
pub struct TypedKeyList {
    keys: Option<Vec<TypedKey>>,
}

impl TypedKeyList {
    pub fn new(keys: Vec<TypedKey>) -> Self {
        TypedKeyList { keys: Some(keys) }
    }

    /// Take the keys out of the list. Consuming twice is a structural
    /// error: it means two carriers claimed the same list.
    pub fn consume(&mut self) -> Result<Vec<TypedKey>> {
        self.keys.take().ok_or_else(|| MdexError::Parse {
            message: "Attempted to consume a typed keys list that has already been consumed"
                .to_string(),
            help: None,
        })
    }

    pub fn is_consumed(&self) -> bool {
        self.keys.is_none()
    }
}

/// An item of a nested bullet list, with its immediately nested child
/// list attached.
#[derive(Debug, Clone)]
struct NestedListItem {
    own: Vec<Token>,
    nested: Vec<NestedListItem>,
}

/// Build the nested item tree of one bullet list slice. The slice must
/// include the list's own open and close tokens.
fn build_nested_list(tokens: &[Token]) -> Vec<NestedListItem> {
    let mut items = Vec::new();
    if tokens.len() < 2 {
        return items;
    }
    let inner = &tokens[1..tokens.len() - 1];

    let mut i = 0;
    while i < inner.len() {
        if inner[i].kind != TokenKind::ListItemOpen {
            i += 1;
            continue;
        }
        let mut depth = 0i32;
        let mut end = inner.len();
        for (j, token) in inner.iter().enumerate().skip(i) {
            match token.kind {
                TokenKind::ListItemOpen => depth += 1,
                TokenKind::ListItemClose => {
                    depth -= 1;
                    if depth == 0 {
                        end = j;
                        break;
                    }
                }
                _ => {}
            }
        }

        let body = &inner[i + 1..end];
        let item = match list_bounds(body) {
            Some((start, stop)) => NestedListItem {
                own: body[..start].to_vec(),
                nested: build_nested_list(&body[start..=stop]),
            },
            None => NestedListItem {
                own: body.to_vec(),
                nested: Vec::new(),
            },
        };
        items.push(item);
        i = end + 1;
    }
    items
}

/// Convert one bullet list into a single-use typed-key list.
pub fn convert_list_to_typed_keys(
    list_tokens: &[Token],
    strict: &Strictness,
) -> Result<TypedKeyList> {
    let items = build_nested_list(list_tokens);
    let keys = convert_items(&items, strict)?;
    Ok(TypedKeyList::new(keys))
}

/// The inline code token that opens a conforming `` `key` Type - desc ``
/// item, or `None` when the item has a different shape.
fn item_key_token(item: &NestedListItem) -> Option<&Token> {
    if item.own.len() != 3 {
        return None;
    }
    let inline = &item.own[1];
    if inline.kind != TokenKind::Inline {
        return None;
    }
    inline
        .inline_children()
        .first()
        .filter(|first| first.kind == TokenKind::CodeInline)
}

fn convert_items(items: &[NestedListItem], strict: &Strictness) -> Result<Vec<TypedKey>> {
    let mut keys = Vec::new();
    for item in items {
        let Some(key_token) = item_key_token(item) else {
            // A prose lead-in like `Returns:` owns no key itself,
            // whatever its paragraph shape; its nested items join the
            // parent sequence.
            if !item.nested.is_empty() {
                keys.extend(convert_items(&item.nested, strict)?);
                continue;
            }
            return Err(MdexError::Parse {
                message: "Expected a typed key list item to start with an inline code key"
                    .to_string(),
                help: None,
            });
        };
        let key = key_token.content.clone();
        let children = item.own[1].inline_children();

        let (type_part, desc_part) = if children.len() == 1 {
            // A bare key declares no type at all and reads as a String.
            ("String".to_string(), String::new())
        } else {
            let rest = safely_join_tokens(&children[1..])?;
            match rest.find('-') {
                Some(idx) => (rest[..idx].to_string(), rest[idx + 1..].to_string()),
                None => (rest.clone(), String::new()),
            }
        };

        let mut required = true;
        let mut cleaned_type = type_part.trim().to_string();
        if OPTIONAL_ANY_CASE.is_match(&type_part) {
            if !OPTIONAL_LOWER.is_match(&type_part) {
                return Err(MdexError::Parse {
                    message: format!(
                        "Found an optional marker for key \"{key}\" that is not lowercase"
                    ),
                    help: Some("write it exactly as \"(optional)\"".to_string()),
                });
            }
            required = false;
            cleaned_type = OPTIONAL_LOWER
                .replace_all(&type_part, " ")
                .trim()
                .to_string();
        }
        if OPTIONAL_ANY_CASE.is_match(&desc_part) {
            return Err(MdexError::Parse {
                message: format!(
                    "Optional marker for key \"{key}\" must appear before the \"-\" separator"
                ),
                help: None,
            });
        }

        let (cleaned_type, additional_tags) = split_trailing_tags(&cleaned_type)?;

        let mut description = desc_part.trim().to_string();
        if let Some(stripped) = description.strip_prefix("- ") {
            description = stripped.to_string();
        }

        let type_info = if item.nested.is_empty() {
            raw_type_to_type_information(&cleaned_type, &description, None, strict)?
        } else {
            let mut sub = TypedKeyList::new(convert_items(&item.nested, strict)?);
            raw_type_to_type_information(&cleaned_type, &description, Some(&mut sub), strict)?
        };

        keys.push(TypedKey {
            key,
            type_info,
            description,
            required,
            additional_tags,
        });
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::tokenize;
    use crate::parser::ranges::find_next_list;
    use pretty_assertions::assert_eq;

    fn keys_of(source: &str) -> Vec<TypedKey> {
        let tokens = tokenize(source);
        let list = find_next_list(&tokens).expect("list");
        convert_list_to_typed_keys(list, &Strictness::default())
            .unwrap()
            .consume()
            .unwrap()
    }

    #[test]
    fn test_convert_basic_key() {
        let keys = keys_of("* `x` Integer - The x coordinate.");

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].key, "x");
        assert_eq!(keys[0].description, "The x coordinate.");
        assert!(keys[0].required);
        assert_eq!(keys[0].type_info, TypeInformation::simple("Integer"));
    }

    #[test]
    fn test_convert_preserves_order() {
        let keys = keys_of("* `b` Integer - b\n* `a` Integer - a\n* `c` Integer - c");
        let names: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_convert_optional_key() {
        let keys = keys_of("* `x` Integer (optional) - x");
        assert!(!keys[0].required);
        assert_eq!(keys[0].type_info, TypeInformation::simple("Integer"));
    }

    #[test]
    fn test_convert_key_without_description() {
        let keys = keys_of("* `width` Integer");
        assert_eq!(keys[0].key, "width");
        assert_eq!(keys[0].description, "");
    }

    #[test]
    fn test_convert_rejects_capitalized_optional() {
        let tokens = tokenize("* `x` Integer (Optional) - x");
        let list = find_next_list(&tokens).unwrap();
        let err = convert_list_to_typed_keys(list, &Strictness::default()).unwrap_err();
        assert!(err.to_string().contains("not lowercase"));
    }

    #[test]
    fn test_convert_rejects_optional_after_hyphen() {
        let tokens = tokenize("* `x` Integer - x (optional)");
        let list = find_next_list(&tokens).unwrap();
        let err = convert_list_to_typed_keys(list, &Strictness::default()).unwrap_err();
        assert!(err.to_string().contains("before the \"-\""));
    }

    #[test]
    fn test_convert_nested_object() {
        let keys = keys_of("* `bounds` Object - The bounds.\n  * `x` Integer - x\n  * `y` Integer - y");

        assert_eq!(keys.len(), 1);
        match &keys[0].type_info {
            TypeInformation::Object { properties, .. } => {
                assert_eq!(properties.len(), 2);
                assert_eq!(properties[0].name, "x");
                assert_eq!(properties[1].name, "y");
            }
            other => panic!("expected object type, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_flattens_prose_lead_in() {
        let keys = keys_of("* Returns:\n  * `x` Integer - x\n  * `y` Integer - y");
        let names: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_convert_flattens_loose_lead_in() {
        let keys = keys_of("* Lead in.\n\n  More prose.\n\n  * `x` Integer - x");
        let names: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn test_convert_bare_key_defaults_to_string() {
        let keys = keys_of("* `paneid`");
        assert_eq!(keys[0].key, "paneid");
        assert!(keys[0].required);
        assert!(matches!(
            keys[0].type_info,
            TypeInformation::StringEnum {
                possible_values: None,
                ..
            }
        ));
    }

    #[test]
    fn test_convert_tags_in_type_part() {
        let keys = keys_of("* `appIcon` NativeImage _macOS_ - The icon.");
        assert_eq!(keys[0].additional_tags, vec![DocumentationTag::OsMacos]);
        assert_eq!(keys[0].type_info, TypeInformation::simple("NativeImage"));
        assert_eq!(keys[0].description, "The icon.");
    }

    #[test]
    fn test_typed_key_list_single_consumption() {
        let tokens = tokenize("* `x` Integer - x");
        let list = find_next_list(&tokens).unwrap();
        let mut typed = convert_list_to_typed_keys(list, &Strictness::default()).unwrap();

        assert!(!typed.is_consumed());
        assert!(typed.consume().is_ok());
        assert!(typed.is_consumed());

        let err = typed.consume().unwrap_err();
        assert!(err
            .to_string()
            .contains("Attempted to consume a typed keys list that has already been consumed"));
    }

    #[test]
    fn test_convert_string_enum_from_description() {
        let keys = keys_of("* `mode` String - Can be `dark` or `light`.");
        match &keys[0].type_info {
            TypeInformation::StringEnum {
                possible_values: Some(values),
                ..
            } => {
                let names: Vec<&str> = values.iter().map(|v| v.value.as_str()).collect();
                assert_eq!(names, vec!["dark", "light"]);
            }
            other => panic!("expected string enum, got {other:?}"),
        }
    }
}
