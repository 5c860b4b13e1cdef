//! Token-range utilities.
//!
//! Everything here operates on borrowed slices of the token stream and
//! never mutates: finding lists and their matching close, grouping a
//! document by headings, and locating well-known annotations such as
//! the process availability line.

use crate::error::{MdexError, Result};
use crate::markdown::{Token, TokenKind};
use crate::types::ProcessAvailability;

use super::join::safely_join_tokens;

/// A heading and the token range it governs.
///
/// `content` starts at the heading's own inline token and runs up to
/// (excluding) the next heading of the same or a shallower level.
#[derive(Debug, Clone)]
pub struct HeadingGroup<'a> {
    pub heading: String,
    pub level: u32,
    pub content: &'a [Token],
}

/// Group a token stream by its headings.
pub fn headings_and_content(tokens: &[Token]) -> Result<Vec<HeadingGroup<'_>>> {
    let mut groups = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::HeadingOpen {
            continue;
        }
        let Some(level) = token.heading_level() else {
            continue;
        };
        let inline = match tokens.get(i + 1) {
            Some(t) if t.kind == TokenKind::Inline => t,
            _ => continue,
        };
        let heading = safely_join_tokens(std::slice::from_ref(inline))?;

        let mut end = tokens.len();
        for (j, t) in tokens.iter().enumerate().skip(i + 2) {
            if t.kind == TokenKind::HeadingOpen {
                if let Some(l) = t.heading_level() {
                    if l <= level {
                        end = j;
                        break;
                    }
                }
            }
        }
        groups.push(HeadingGroup {
            heading,
            level,
            content: &tokens[i + 1..end],
        });
    }
    Ok(groups)
}

/// The first heading of a document; every parseable file must have one.
pub fn find_first_heading(tokens: &[Token]) -> Result<HeadingGroup<'_>> {
    headings_and_content(tokens)?
        .into_iter()
        .next()
        .ok_or_else(|| MdexError::Parse {
            message: "Expected at least one heading in the document".to_string(),
            help: None,
        })
}

/// The level-3 constructor heading of a class section, e.g.
/// `` ### `new BrowserWindow([options])` ``.
pub fn find_constructor_header<'a>(tokens: &'a [Token]) -> Result<Option<HeadingGroup<'a>>> {
    Ok(headings_and_content(tokens)?
        .into_iter()
        .find(|group| group.level == 3 && group.heading.starts_with("`new ")))
}

/// Content governed by a heading with an exact title and level.
pub fn find_content_inside_header<'a>(
    tokens: &'a [Token],
    title: &str,
    level: u32,
) -> Result<Option<&'a [Token]>> {
    Ok(headings_and_content(tokens)?
        .into_iter()
        .find(|group| group.level == level && group.heading == title)
        .map(|group| find_content_after_heading_close(group.content)))
}

/// Everything after the first `heading_close` token.
pub fn find_content_after_heading_close(tokens: &[Token]) -> &[Token] {
    match tokens
        .iter()
        .position(|t| t.kind == TokenKind::HeadingClose)
    {
        Some(i) => &tokens[i + 1..],
        None => &[],
    }
}

/// Bounds of the first bullet list, matched by nesting depth.
pub(crate) fn list_bounds(tokens: &[Token]) -> Option<(usize, usize)> {
    let start = tokens
        .iter()
        .position(|t| t.kind == TokenKind::BulletListOpen)?;
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        match token.kind {
            TokenKind::BulletListOpen => depth += 1,
            TokenKind::BulletListClose => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, i));
                }
            }
            _ => {}
        }
    }
    None
}

/// The first bullet list in the range, including its open and close
/// tokens. `None` when absent or unterminated.
pub fn find_next_list(tokens: &[Token]) -> Option<&[Token]> {
    list_bounds(tokens).map(|(start, end)| &tokens[start..=end])
}

/// Content after the first bullet list. When no list exists, either
/// fall back to everything after the heading close or to nothing.
pub fn find_content_after_list(tokens: &[Token], return_all_on_no_list: bool) -> &[Token] {
    match list_bounds(tokens) {
        Some((_, end)) => &tokens[end + 1..],
        None if return_all_on_no_list => find_content_after_heading_close(tokens),
        None => &[],
    }
}

/// Locate the process availability annotation.
///
/// The annotation is an inline line of the form
/// `Process: [Main](...), [Renderer](...)` or `Exported in ...`.
/// Absence means the API is available in every process.
pub fn find_process(tokens: &[Token]) -> ProcessAvailability {
    for token in tokens {
        if token.kind != TokenKind::Inline {
            continue;
        }
        let is_process = token.content.starts_with("Process");
        let is_exported = token.content.starts_with("Exported in");
        if !is_process && !is_exported {
            continue;
        }
        let mut process = ProcessAvailability {
            main: false,
            renderer: false,
            utility: false,
            exported: is_exported,
        };
        for child in token.inline_children() {
            if child.kind != TokenKind::Text {
                continue;
            }
            match child.content.trim() {
                "Main" => process.main = true,
                "Renderer" => process.renderer = true,
                "Utility" => process.utility = true,
                _ => {}
            }
        }
        return process;
    }
    ProcessAvailability::default()
}

/// GitHub-style anchor slug for a heading.
pub fn slugify_heading(heading: &str) -> String {
    heading
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .replace(' ', "-")
}

/// Convert a phrase to camelCase, splitting on non-alphanumeric
/// characters and case transitions.
pub fn to_camel_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            let prev = chars[i - 1];
            let hump = (prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if hump || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut rest = lower.chars();
            if let Some(first) = rest.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(rest.as_str());
            }
        }
    }
    out
}
