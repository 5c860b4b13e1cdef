//! Top-level documentation containers.
//!
//! Each parsed markdown file produces one or more containers: a module,
//! the classes it documents, a structure, or a custom element. The
//! wire format discriminates on a `type` field.

use serde::Serialize;

use super::blocks::{ConstructorMethod, EventBlock, MethodBlock};
use super::type_info::PropertyBlock;

/// Which process kinds an API is available in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessAvailability {
    pub main: bool,
    pub renderer: bool,
    pub utility: bool,
    pub exported: bool,
}

impl Default for ProcessAvailability {
    /// Absence of a process annotation means available everywhere.
    fn default() -> Self {
        ProcessAvailability {
            main: true,
            renderer: true,
            utility: true,
            exported: false,
        }
    }
}

/// Metadata shared by every container kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerBase {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub description: String,
    pub version: String,
    pub slug: String,
    pub website_url: String,
    pub repo_url: String,
}

/// A documented module, e.g. `app`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDoc {
    #[serde(flatten)]
    pub base: ContainerBase,
    pub process: ProcessAvailability,
    pub methods: Vec<MethodBlock>,
    pub events: Vec<EventBlock>,
    pub properties: Vec<PropertyBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_classes: Option<Vec<ClassDoc>>,
}

impl ModuleDoc {
    /// A module with no surface at all carries no information and is
    /// dropped from the output.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
            && self.events.is_empty()
            && self.properties.is_empty()
            && self
                .exported_classes
                .as_ref()
                .map(|classes| classes.is_empty())
                .unwrap_or(true)
    }
}

/// A documented class, e.g. `Class: BrowserWindow`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDoc {
    #[serde(flatten)]
    pub base: ContainerBase,
    pub process: ProcessAvailability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor_method: Option<ConstructorMethod>,
    pub instance_name: String,
    pub static_methods: Vec<MethodBlock>,
    pub static_properties: Vec<PropertyBlock>,
    pub instance_methods: Vec<MethodBlock>,
    pub instance_properties: Vec<PropertyBlock>,
    pub instance_events: Vec<EventBlock>,
}

/// A documented plain-object structure, e.g. `Rectangle Object`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureDoc {
    #[serde(flatten)]
    pub base: ContainerBase,
    pub properties: Vec<PropertyBlock>,
}

/// A documented custom element, e.g. `` `<webview>` Tag ``.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDoc {
    #[serde(flatten)]
    pub base: ContainerBase,
    pub process: ProcessAvailability,
    pub methods: Vec<MethodBlock>,
    pub properties: Vec<PropertyBlock>,
    pub events: Vec<EventBlock>,
}

/// Any top-level container, discriminated by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DocumentationContainer {
    Module(ModuleDoc),
    Class(ClassDoc),
    Structure(StructureDoc),
    Element(ElementDoc),
}

impl DocumentationContainer {
    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn base(&self) -> &ContainerBase {
        match self {
            DocumentationContainer::Module(doc) => &doc.base,
            DocumentationContainer::Class(doc) => &doc.base,
            DocumentationContainer::Structure(doc) => &doc.base,
            DocumentationContainer::Element(doc) => &doc.base,
        }
    }
}
