//! Parsed type information and its flattened wire format.
//!
//! A `TypeInformation` value is a small tree: unions, generics, and
//! function signatures all nest further type information. On the wire
//! the variant data is flattened into the carrier object next to a
//! `type` discriminator, matching the consumers of the emitted JSON,
//! so serialization is hand-written rather than derived.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::tags::DocumentationTag;

/// A parsed type string.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeInformation {
    /// A plain named type, e.g. `Integer` or `WebContents`.
    Simple { name: String, collection: bool },
    /// A type union, e.g. `Object | Integer`.
    Union {
        members: Vec<TypeInformation>,
        collection: bool,
    },
    /// A `Function` type, with parameters from an attached key list.
    Function {
        parameters: Vec<MethodParameter>,
        returns: Option<Box<TypeInformation>>,
        collection: bool,
    },
    /// An `Object` type with documented properties.
    Object {
        properties: Vec<PropertyBlock>,
        collection: bool,
    },
    /// A `String` type with optionally enumerated values.
    StringEnum {
        possible_values: Option<Vec<PossibleStringValue>>,
        collection: bool,
    },
    /// `Event<X>`: the payload is documented on the referenced structure.
    EventReference {
        reference: Box<TypeInformation>,
        collection: bool,
    },
    /// `Event<>`: the payload properties are documented inline.
    EventInline {
        event_properties: Vec<PropertyBlock>,
        collection: bool,
    },
    /// Any other generic type, e.g. `Promise<void>`.
    Generic {
        name: String,
        inner_types: Vec<TypeInformation>,
        collection: bool,
    },
}

impl TypeInformation {
    pub fn simple(name: &str) -> Self {
        TypeInformation::Simple {
            name: name.to_string(),
            collection: false,
        }
    }

    pub fn collection(&self) -> bool {
        match self {
            TypeInformation::Simple { collection, .. }
            | TypeInformation::Union { collection, .. }
            | TypeInformation::Function { collection, .. }
            | TypeInformation::Object { collection, .. }
            | TypeInformation::StringEnum { collection, .. }
            | TypeInformation::EventReference { collection, .. }
            | TypeInformation::EventInline { collection, .. }
            | TypeInformation::Generic { collection, .. } => *collection,
        }
    }

    /// Emit the flattened `type`/`collection`/payload entries into an
    /// in-progress map. Shared by the carrier types below.
    pub(crate) fn serialize_fields<M>(&self, map: &mut M) -> Result<(), M::Error>
    where
        M: SerializeMap,
    {
        match self {
            TypeInformation::Simple { name, collection } => {
                map.serialize_entry("type", name)?;
                map.serialize_entry("collection", collection)?;
            }
            TypeInformation::Union {
                members,
                collection,
            } => {
                map.serialize_entry("type", members)?;
                map.serialize_entry("collection", collection)?;
            }
            TypeInformation::Function {
                parameters,
                returns,
                collection,
            } => {
                map.serialize_entry("type", "Function")?;
                map.serialize_entry("parameters", parameters)?;
                map.serialize_entry("returns", returns)?;
                map.serialize_entry("collection", collection)?;
            }
            TypeInformation::Object {
                properties,
                collection,
            } => {
                map.serialize_entry("type", "Object")?;
                map.serialize_entry("properties", properties)?;
                map.serialize_entry("collection", collection)?;
            }
            TypeInformation::StringEnum {
                possible_values,
                collection,
            } => {
                map.serialize_entry("type", "String")?;
                map.serialize_entry("possibleValues", possible_values)?;
                map.serialize_entry("collection", collection)?;
            }
            TypeInformation::EventReference {
                reference,
                collection,
            } => {
                map.serialize_entry("type", "Event")?;
                map.serialize_entry("eventPropertiesReference", reference)?;
                map.serialize_entry("collection", collection)?;
            }
            TypeInformation::EventInline {
                event_properties,
                collection,
            } => {
                map.serialize_entry("type", "Event")?;
                map.serialize_entry("eventProperties", event_properties)?;
                map.serialize_entry("collection", collection)?;
            }
            TypeInformation::Generic {
                name,
                inner_types,
                collection,
            } => {
                map.serialize_entry("type", name)?;
                map.serialize_entry("innerTypes", inner_types)?;
                map.serialize_entry("collection", collection)?;
            }
        }
        Ok(())
    }
}

impl Serialize for TypeInformation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.serialize_fields(&mut map)?;
        map.end()
    }
}

/// A documented method or function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub type_info: TypeInformation,
}

impl Serialize for MethodParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("description", &self.description)?;
        map.serialize_entry("required", &self.required)?;
        self.type_info.serialize_fields(&mut map)?;
        map.end()
    }
}

/// A documented property of an object, structure, or module.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBlock {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub additional_tags: Vec<DocumentationTag>,
    pub type_info: TypeInformation,
}

impl Serialize for PropertyBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("description", &self.description)?;
        map.serialize_entry("required", &self.required)?;
        map.serialize_entry("additionalTags", &self.additional_tags)?;
        self.type_info.serialize_fields(&mut map)?;
        map.end()
    }
}

/// One enumerated value of a string-typed key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PossibleStringValue {
    pub value: String,
    pub description: String,
}
