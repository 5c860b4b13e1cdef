//! Markdown tokenization for documentation files.
//!
//! Wraps `pulldown-cmark` behind a flat token stream so the extraction
//! core can slice, scan, and rejoin documentation ranges without caring
//! about the underlying event model.

mod adapter;
mod token;

pub use adapter::tokenize;
pub use token::{Token, TokenKind};
