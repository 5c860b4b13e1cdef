//! The extraction core.
//!
//! Turns the flat markdown token stream into the typed documentation
//! model: token-range utilities, text reconstruction, the typed-key
//! list grammar, the type-string parser, string enum extraction, and
//! the block/container assemblers that tie them together.

mod blocks;
mod docs;
mod join;
mod ranges;
mod returns;
mod string_enum;
mod tags;
mod type_string;
mod typed_keys;

pub use blocks::{
    guess_parameters_from_signature, parse_constructor_method, parse_event_blocks,
    parse_method_blocks, parse_property_blocks, SignatureParameter,
};
pub use docs::{
    parse_docs, DocsParser, PackageMode, ParseOptions, DEFAULT_API_DIR, DEFAULT_REPO_BASE_URL,
    DEFAULT_WEBSITE_BASE_URL,
};
pub use join::{safely_join_tokens, safely_join_tokens_with, JoinOptions};
pub use ranges::{
    find_constructor_header, find_content_after_heading_close, find_content_after_list,
    find_content_inside_header, find_first_heading, find_next_list, find_process,
    headings_and_content, slugify_heading, to_camel_case, HeadingGroup,
};
pub use returns::{extract_return_type, ExtractedReturn, StripBehavior};
pub use string_enum::extract_string_enum;
pub use tags::{parse_heading_tags, split_trailing_tags};
pub use type_string::raw_type_to_type_information;
pub use typed_keys::{convert_list_to_typed_keys, TypedKey, TypedKeyList};

/// Optional lint rules applied while parsing.
///
/// The defaults are lenient; `mdex build --strict` enables everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strictness {
    /// Reject capitalized `Boolean`/`Number` primitive names in type
    /// strings, which should be written lowercase.
    pub capitalized_primitives: bool,
}

impl Strictness {
    pub fn strict() -> Self {
        Strictness {
            capitalized_primitives: true,
        }
    }
}
