//! Text reconstruction from token ranges.
//!
//! `safely_join_tokens` renders an arbitrary slice of tokens back into
//! normalized markdown-ish text. Only a fixed allowlist of token kinds
//! is supported; anything else in the range is a structural error, which
//! keeps descriptions from silently swallowing content the grammar does
//! not understand.

use crate::error::{MdexError, Result};
use crate::markdown::{Token, TokenKind};

/// Options for [`safely_join_tokens_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinOptions {
    /// Re-emit fenced code blocks as literal fences instead of
    /// dropping them.
    pub parse_code_fences: bool,
}

/// Join tokens with default options (code fences dropped).
pub fn safely_join_tokens(tokens: &[Token]) -> Result<String> {
    safely_join_tokens_with(tokens, JoinOptions::default())
}

/// Join tokens into a single normalized string.
pub fn safely_join_tokens_with(tokens: &[Token], opts: JoinOptions) -> Result<String> {
    let mut out = String::new();
    let mut list_level: i32 = -1;
    join_into(&mut out, &mut list_level, tokens, opts)?;
    Ok(out.trim().to_string())
}

fn join_into(
    out: &mut String,
    list_level: &mut i32,
    tokens: &[Token],
    opts: JoinOptions,
) -> Result<()> {
    for token in tokens {
        match token.kind {
            TokenKind::Inline => {
                join_into(out, list_level, token.inline_children(), opts)?;
            }
            TokenKind::Text => out.push_str(&token.content),
            TokenKind::Softbreak => out.push(' '),
            TokenKind::Hardbreak => out.push('\n'),
            TokenKind::CodeInline => {
                out.push_str(&token.markup);
                out.push_str(&token.content);
                out.push_str(&token.markup);
            }
            TokenKind::EmOpen
            | TokenKind::EmClose
            | TokenKind::StrongOpen
            | TokenKind::StrongClose
            | TokenKind::SOpen
            | TokenKind::SClose => out.push_str(&token.markup),
            TokenKind::LinkOpen | TokenKind::LinkClose | TokenKind::ParagraphOpen => {}
            TokenKind::ParagraphClose => out.push_str("\n\n"),
            TokenKind::HtmlInline => out.push_str(&token.content),
            TokenKind::BulletListOpen | TokenKind::OrderedListOpen => {
                *list_level += 1;
                // A nested list sits directly under its parent item line.
                if *list_level > 0 {
                    truncate_newlines(out);
                    out.push('\n');
                }
            }
            TokenKind::BulletListClose | TokenKind::OrderedListClose => {
                *list_level -= 1;
                truncate_newlines(out);
                out.push_str("\n\n");
            }
            TokenKind::ListItemOpen => {
                let indent = (*list_level).max(0) as usize;
                out.push_str(&"  ".repeat(indent));
                out.push_str(&token.markup);
                out.push(' ');
            }
            TokenKind::ListItemClose => {
                if out.ends_with('\n') {
                    truncate_newlines(out);
                    out.push('\n');
                }
            }
            TokenKind::BlockquoteOpen => {
                out.push_str(&token.markup);
                out.push(' ');
            }
            TokenKind::BlockquoteClose => {}
            TokenKind::Fence => {
                if opts.parse_code_fences {
                    out.push_str("```");
                    out.push_str(&token.info);
                    out.push('\n');
                    out.push_str(&token.content);
                    out.push_str("```\n\n");
                }
            }
            TokenKind::HeadingOpen
            | TokenKind::HeadingClose
            | TokenKind::CodeBlock
            | TokenKind::HtmlBlock
            | TokenKind::Rule
            | TokenKind::Other => {
                return Err(MdexError::Parse {
                    message: format!(
                        "Unexpected token kind while joining tokens: {}",
                        token.kind.name()
                    ),
                    help: None,
                });
            }
        }
    }
    Ok(())
}

/// Drop every trailing newline so the caller can append an exact count.
fn truncate_newlines(out: &mut String) {
    while out.ends_with('\n') {
        out.pop();
    }
}
