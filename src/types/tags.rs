//! Heading tag annotations.
//!
//! Documentation headings can carry trailing italic tags such as
//! `` `app.dock()` _macOS_ _Deprecated_ ``. Only a closed set of tags is
//! recognized; anything else is a parse error at the call site.

use serde::Serialize;

/// A recognized heading tag, serialized in its namespaced wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentationTag {
    #[serde(rename = "os_macos")]
    OsMacos,
    #[serde(rename = "os_mas")]
    OsMas,
    #[serde(rename = "os_windows")]
    OsWindows,
    #[serde(rename = "os_linux")]
    OsLinux,
    #[serde(rename = "stability_experimental")]
    StabilityExperimental,
    #[serde(rename = "stability_deprecated")]
    StabilityDeprecated,
    #[serde(rename = "availability_readonly")]
    AvailabilityReadonly,
}

impl DocumentationTag {
    /// All tag names as they appear in markdown headings.
    pub const ALLOWED: &'static [&'static str] = &[
        "macOS",
        "mas",
        "Windows",
        "Linux",
        "Experimental",
        "Deprecated",
        "Readonly",
    ];

    /// Look up a tag by its markdown name. Names are case sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "macOS" => Some(DocumentationTag::OsMacos),
            "mas" => Some(DocumentationTag::OsMas),
            "Windows" => Some(DocumentationTag::OsWindows),
            "Linux" => Some(DocumentationTag::OsLinux),
            "Experimental" => Some(DocumentationTag::StabilityExperimental),
            "Deprecated" => Some(DocumentationTag::StabilityDeprecated),
            "Readonly" => Some(DocumentationTag::AvailabilityReadonly),
            _ => None,
        }
    }
}
