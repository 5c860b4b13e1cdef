//! Adapter from `pulldown-cmark` events to the flat token stream.
//!
//! Two normalizations happen here so the extraction core sees a uniform
//! shape:
//!
//! - inline content of a block is collected into a single `Inline` token
//!   carrying its children, with the block's raw-ish text in `content`;
//! - tight list items, which pulldown-cmark emits without paragraph
//!   events, get an implicit paragraph synthesized around their inline
//!   run so every list item body is paragraph-shaped.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use super::token::{Token, TokenKind};

/// Tokenize a markdown source into a flat token stream.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(source, options);

    let mut builder = Builder::new();
    for event in parser {
        builder.event(event);
    }
    builder.finish()
}

struct InlineRun {
    children: Vec<Token>,
    synthetic: bool,
}

struct CodeRun {
    content: String,
    info: String,
    fenced: bool,
}

struct Builder {
    out: Vec<Token>,
    level: u32,
    inline: Option<InlineRun>,
    code: Option<CodeRun>,
}

impl Builder {
    fn new() -> Self {
        Builder {
            out: Vec::new(),
            level: 0,
            inline: None,
            code: None,
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_inline();
        self.out
    }

    fn event(&mut self, event: Event<'_>) {
        if let Some(code) = &mut self.code {
            match event {
                Event::Text(text) => {
                    code.content.push_str(&text);
                    return;
                }
                Event::End(TagEnd::CodeBlock) => {
                    let run = match self.code.take() {
                        Some(run) => run,
                        None => return,
                    };
                    let kind = if run.fenced {
                        TokenKind::Fence
                    } else {
                        TokenKind::CodeBlock
                    };
                    let mut token = Token::new(kind, "code");
                    token.content = run.content;
                    token.info = run.info;
                    token.markup = if run.fenced { "```" } else { "" }.to_string();
                    token.level = self.level;
                    self.out.push(token);
                    return;
                }
                _ => return,
            }
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                let mut token = Token::new(TokenKind::Text, "");
                token.content = text.to_string();
                self.push_inline(token);
            }
            Event::Code(code) => {
                let mut token = Token::new(TokenKind::CodeInline, "code");
                token.content = code.to_string();
                token.markup = "`".to_string();
                self.push_inline(token);
            }
            Event::SoftBreak => self.push_inline(Token::new(TokenKind::Softbreak, "")),
            Event::HardBreak => self.push_inline(Token::new(TokenKind::Hardbreak, "br")),
            Event::InlineHtml(html) => {
                let mut token = Token::new(TokenKind::HtmlInline, "");
                token.content = html.to_string();
                self.push_inline(token);
            }
            Event::Html(html) => {
                self.flush_inline();
                let mut token = Token::new(TokenKind::HtmlBlock, "");
                token.content = html.to_string();
                token.level = self.level;
                self.out.push(token);
            }
            Event::Rule => {
                self.flush_inline();
                let mut token = Token::new(TokenKind::Rule, "hr");
                token.markup = "---".to_string();
                token.level = self.level;
                self.out.push(token);
            }
            Event::FootnoteReference(_)
            | Event::TaskListMarker(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {
                self.push_inline(Token::new(TokenKind::Other, ""));
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_inline();
                self.open_block(TokenKind::ParagraphOpen, "p", "");
                self.inline = Some(InlineRun {
                    children: Vec::new(),
                    synthetic: false,
                });
            }
            Tag::Heading { level, .. } => {
                self.flush_inline();
                let depth = level as u32;
                let tag_name = format!("h{depth}");
                let markup = "#".repeat(depth as usize);
                self.open_block(TokenKind::HeadingOpen, &tag_name, &markup);
                self.inline = Some(InlineRun {
                    children: Vec::new(),
                    synthetic: false,
                });
            }
            Tag::List(start) => {
                self.flush_inline();
                if start.is_some() {
                    self.open_block(TokenKind::OrderedListOpen, "ol", ".");
                } else {
                    self.open_block(TokenKind::BulletListOpen, "ul", "*");
                }
            }
            Tag::Item => {
                self.flush_inline();
                self.open_block(TokenKind::ListItemOpen, "li", "*");
            }
            Tag::BlockQuote(_) => {
                self.flush_inline();
                self.open_block(TokenKind::BlockquoteOpen, "blockquote", ">");
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let (info, fenced) = match kind {
                    CodeBlockKind::Fenced(info) => (info.to_string(), true),
                    CodeBlockKind::Indented => (String::new(), false),
                };
                self.code = Some(CodeRun {
                    content: String::new(),
                    info,
                    fenced,
                });
            }
            Tag::Emphasis => self.push_inline(inline_marker(TokenKind::EmOpen, "em", "_")),
            Tag::Strong => self.push_inline(inline_marker(TokenKind::StrongOpen, "strong", "**")),
            Tag::Strikethrough => self.push_inline(inline_marker(TokenKind::SOpen, "s", "~~")),
            Tag::Link { dest_url, .. } => {
                let mut token = Token::new(TokenKind::LinkOpen, "a");
                token.info = dest_url.to_string();
                self.push_inline(token);
            }
            Tag::Image { .. } => self.push_inline(Token::new(TokenKind::Other, "img")),
            _ => {
                self.flush_inline();
                let mut token = Token::new(TokenKind::Other, "");
                token.level = self.level;
                self.out.push(token);
            }
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.emit_inline();
                self.close_block(TokenKind::ParagraphClose, "p", "");
            }
            TagEnd::Heading(level) => {
                self.emit_inline();
                let depth = level as u32;
                let tag_name = format!("h{depth}");
                let markup = "#".repeat(depth as usize);
                self.close_block(TokenKind::HeadingClose, &tag_name, &markup);
            }
            TagEnd::List(ordered) => {
                self.flush_inline();
                if ordered {
                    self.close_block(TokenKind::OrderedListClose, "ol", ".");
                } else {
                    self.close_block(TokenKind::BulletListClose, "ul", "*");
                }
            }
            TagEnd::Item => {
                self.flush_inline();
                self.close_block(TokenKind::ListItemClose, "li", "*");
            }
            TagEnd::BlockQuote(_) => {
                self.flush_inline();
                self.close_block(TokenKind::BlockquoteClose, "blockquote", ">");
            }
            TagEnd::CodeBlock => {
                // Handled in `event` while a code run is active.
            }
            TagEnd::Emphasis => self.push_inline(inline_marker(TokenKind::EmClose, "em", "_")),
            TagEnd::Strong => self.push_inline(inline_marker(TokenKind::StrongClose, "strong", "**")),
            TagEnd::Strikethrough => self.push_inline(inline_marker(TokenKind::SClose, "s", "~~")),
            TagEnd::Link => self.push_inline(Token::new(TokenKind::LinkClose, "a")),
            TagEnd::Image => self.push_inline(Token::new(TokenKind::Other, "img")),
            _ => {}
        }
    }

    /// Append to the active inline run, synthesizing an implicit
    /// paragraph when inline content appears directly inside a tight
    /// list item.
    fn push_inline(&mut self, token: Token) {
        if self.inline.is_none() {
            self.open_block(TokenKind::ParagraphOpen, "p", "");
            self.inline = Some(InlineRun {
                children: Vec::new(),
                synthetic: true,
            });
        }
        if let Some(run) = &mut self.inline {
            run.children.push(token);
        }
    }

    /// Close an explicit inline run (paragraph/heading end).
    fn emit_inline(&mut self) {
        if let Some(run) = self.inline.take() {
            self.out.push(self.make_inline(run.children));
        }
    }

    /// Close a synthetic inline run, emitting its implicit paragraph
    /// close as well. No-op when no run is active.
    fn flush_inline(&mut self) {
        if let Some(run) = self.inline.take() {
            let synthetic = run.synthetic;
            self.out.push(self.make_inline(run.children));
            if synthetic {
                self.close_block(TokenKind::ParagraphClose, "p", "");
            }
        }
    }

    fn make_inline(&self, children: Vec<Token>) -> Token {
        let mut token = Token::new(TokenKind::Inline, "");
        token.content = render_raw(&children);
        token.level = self.level;
        token.children = Some(children);
        token
    }

    fn open_block(&mut self, kind: TokenKind, tag: &str, markup: &str) {
        let mut token = Token::new(kind, tag);
        token.markup = markup.to_string();
        token.level = self.level;
        self.out.push(token);
        self.level += 1;
    }

    fn close_block(&mut self, kind: TokenKind, tag: &str, markup: &str) {
        self.level = self.level.saturating_sub(1);
        let mut token = Token::new(kind, tag);
        token.markup = markup.to_string();
        token.level = self.level;
        self.out.push(token);
    }
}

fn inline_marker(kind: TokenKind, tag: &str, markup: &str) -> Token {
    let mut token = Token::new(kind, tag);
    token.markup = markup.to_string();
    token
}

/// Reconstruct a raw-ish source string for an inline run. Used for the
/// `content` field of inline tokens, which the extraction core only
/// inspects with prefix checks.
fn render_raw(children: &[Token]) -> String {
    let mut out = String::new();
    for token in children {
        match token.kind {
            TokenKind::Text => out.push_str(&token.content),
            TokenKind::CodeInline => {
                out.push('`');
                out.push_str(&token.content);
                out.push('`');
            }
            TokenKind::Softbreak | TokenKind::Hardbreak => out.push('\n'),
            TokenKind::EmOpen
            | TokenKind::EmClose
            | TokenKind::StrongOpen
            | TokenKind::StrongClose
            | TokenKind::SOpen
            | TokenKind::SClose => out.push_str(&token.markup),
            TokenKind::LinkOpen => out.push('['),
            TokenKind::LinkClose => {
                out.push_str("](");
                out.push_str(&token.info);
                out.push(')');
            }
            TokenKind::HtmlInline => out.push_str(&token.content),
            _ => {}
        }
    }
    out
}
