//! Flat token model for parsed Markdown.
//!
//! Block structure is represented by paired open/close tokens and inline
//! content by a single `Inline` token carrying its children, so ranges of
//! a document can be sliced and rejoined without re-parsing.

/// Kind of a markdown token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    HeadingOpen,
    HeadingClose,
    ParagraphOpen,
    ParagraphClose,
    BulletListOpen,
    BulletListClose,
    OrderedListOpen,
    OrderedListClose,
    ListItemOpen,
    ListItemClose,
    BlockquoteOpen,
    BlockquoteClose,
    Inline,
    Text,
    Softbreak,
    Hardbreak,
    CodeInline,
    EmOpen,
    EmClose,
    StrongOpen,
    StrongClose,
    SOpen,
    SClose,
    LinkOpen,
    LinkClose,
    Fence,
    CodeBlock,
    HtmlBlock,
    HtmlInline,
    Rule,
    Other,
}

impl TokenKind {
    /// Stable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::HeadingOpen => "heading_open",
            TokenKind::HeadingClose => "heading_close",
            TokenKind::ParagraphOpen => "paragraph_open",
            TokenKind::ParagraphClose => "paragraph_close",
            TokenKind::BulletListOpen => "bullet_list_open",
            TokenKind::BulletListClose => "bullet_list_close",
            TokenKind::OrderedListOpen => "ordered_list_open",
            TokenKind::OrderedListClose => "ordered_list_close",
            TokenKind::ListItemOpen => "list_item_open",
            TokenKind::ListItemClose => "list_item_close",
            TokenKind::BlockquoteOpen => "blockquote_open",
            TokenKind::BlockquoteClose => "blockquote_close",
            TokenKind::Inline => "inline",
            TokenKind::Text => "text",
            TokenKind::Softbreak => "softbreak",
            TokenKind::Hardbreak => "hardbreak",
            TokenKind::CodeInline => "code_inline",
            TokenKind::EmOpen => "em_open",
            TokenKind::EmClose => "em_close",
            TokenKind::StrongOpen => "strong_open",
            TokenKind::StrongClose => "strong_close",
            TokenKind::SOpen => "s_open",
            TokenKind::SClose => "s_close",
            TokenKind::LinkOpen => "link_open",
            TokenKind::LinkClose => "link_close",
            TokenKind::Fence => "fence",
            TokenKind::CodeBlock => "code_block",
            TokenKind::HtmlBlock => "html_block",
            TokenKind::HtmlInline => "html_inline",
            TokenKind::Rule => "rule",
            TokenKind::Other => "other",
        }
    }
}

/// A single markdown token.
///
/// `tag` holds the HTML-ish element name (`h2`, `p`, `ul`, ...), `markup`
/// the source punctuation that produced the token (`` ` ``, `_`, `**`,
/// `*`, `>`), and `info` the fence info string or link destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub tag: String,
    pub level: u32,
    pub content: String,
    pub markup: String,
    pub info: String,
    pub children: Option<Vec<Token>>,
}

impl Token {
    pub fn new(kind: TokenKind, tag: &str) -> Self {
        Token {
            kind,
            tag: tag.to_string(),
            level: 0,
            content: String::new(),
            markup: String::new(),
            info: String::new(),
            children: None,
        }
    }

    /// Heading level for `heading_open`/`heading_close` tokens (`h3` -> 3).
    pub fn heading_level(&self) -> Option<u32> {
        if self.kind != TokenKind::HeadingOpen && self.kind != TokenKind::HeadingClose {
            return None;
        }
        self.tag.strip_prefix('h').and_then(|n| n.parse().ok())
    }

    /// Children of an inline token, empty for everything else.
    pub fn inline_children(&self) -> &[Token] {
        match &self.children {
            Some(children) => children,
            None => &[],
        }
    }
}
