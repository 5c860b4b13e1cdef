//! mdex - Markdown API documentation extractor
//!
//! A library for turning conventionally written markdown API docs into
//! a machine-readable JSON index: modules, classes, structures and
//! custom elements, with fully structured type information.

pub mod cli;
pub mod discovery;
pub mod error;
pub mod markdown;
pub mod output;
pub mod parser;
pub mod types;

pub use discovery::{discover, DiscoveryResult};
pub use error::{MdexError, Result};
pub use markdown::{tokenize, Token, TokenKind};
pub use parser::{parse_docs, DocsParser, PackageMode, ParseOptions, Strictness};
pub use types::{
    ClassDoc, ConstructorMethod, ContainerBase, DocumentationContainer, DocumentationTag,
    ElementDoc, EventBlock, MethodBlock, MethodParameter, ModuleDoc, PossibleStringValue,
    ProcessAvailability, PropertyBlock, StructureDoc, TypeInformation,
};
