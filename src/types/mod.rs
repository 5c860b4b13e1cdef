//! Data model for extracted documentation.
//!
//! These types serialize to the JSON emitted by `mdex build`. Field
//! names follow the camelCase wire format; type unions are flattened
//! into their carrier objects on serialization.

mod blocks;
mod containers;
mod tags;
mod type_info;

pub use blocks::{ConstructorMethod, EventBlock, MethodBlock};
pub use containers::{
    ClassDoc, ContainerBase, DocumentationContainer, ElementDoc, ModuleDoc, ProcessAvailability,
    StructureDoc,
};
pub use tags::DocumentationTag;
pub use type_info::{MethodParameter, PossibleStringValue, PropertyBlock, TypeInformation};
