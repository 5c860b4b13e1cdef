//! Assembled documentation blocks for methods and events.

use serde::Serialize;

use super::tags::DocumentationTag;
use super::type_info::{MethodParameter, TypeInformation};

/// A documented method, e.g. `` `app.quit()` ``.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodBlock {
    pub name: String,
    pub signature: String,
    pub description: String,
    pub additional_tags: Vec<DocumentationTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_generics: Option<String>,
    pub url_fragment: String,
    pub parameters: Vec<MethodParameter>,
    pub returns: Option<TypeInformation>,
}

/// A documented event, e.g. `Event: 'ready'`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventBlock {
    pub name: String,
    pub description: String,
    pub additional_tags: Vec<DocumentationTag>,
    pub parameters: Vec<MethodParameter>,
}

/// The callable part of a class constructor. Only the signature and its
/// parameters are retained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorMethod {
    pub signature: String,
    pub parameters: Vec<MethodParameter>,
}
