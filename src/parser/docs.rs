//! Per-file orchestration.
//!
//! `DocsParser` walks the discovered markdown files, classifies each
//! top-level heading into a container (module, class, structure or
//! element) and delegates the heavy lifting to the block assemblers.
//! Parsing is all-or-nothing per file: a structural violation anywhere
//! in a file aborts the run with a file-qualified error.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::discovery::discover;
use crate::error::{MdexError, Result};
use crate::markdown::{tokenize, Token, TokenKind};
use crate::types::{
    ClassDoc, ContainerBase, DocumentationContainer, ElementDoc, ModuleDoc, StructureDoc,
};

use super::blocks::{
    parse_constructor_method, parse_event_blocks, parse_method_blocks, parse_property_blocks,
};
use super::join::safely_join_tokens;
use super::ranges::{
    find_content_after_heading_close, find_content_after_list, find_content_inside_header,
    find_next_list, find_process, headings_and_content, to_camel_case,
};
use super::typed_keys::convert_list_to_typed_keys;
use super::Strictness;

static CLASS_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Class: (.+?)(?: extends `(.+?)`)?$").expect("valid regex"));
static STRUCTURE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?) Object(?: extends `(.+?)`)?$").expect("valid regex"));
static ELEMENT_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^`<(.+?)>` Tag$").expect("valid regex"));

pub const DEFAULT_API_DIR: &str = "docs/api";
pub const DEFAULT_WEBSITE_BASE_URL: &str = "https://example.org/docs";
pub const DEFAULT_REPO_BASE_URL: &str = "https://example.org/repo/blob";

/// How classes documented next to a module are attached to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PackageMode {
    /// Classes become top-level containers alongside their module.
    #[default]
    Single,
    /// Classes nest under their module's `exportedClasses`.
    Multi,
}

/// Everything `parse_docs` needs to know about one documentation tree.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub base_directory: PathBuf,
    pub api_dir: String,
    pub use_readme: bool,
    pub module_version: String,
    pub package_mode: PackageMode,
    pub website_base_url: String,
    pub repo_base_url: String,
    pub strictness: Strictness,
}

impl ParseOptions {
    pub fn new(base_directory: impl Into<PathBuf>, module_version: impl Into<String>) -> Self {
        ParseOptions {
            base_directory: base_directory.into(),
            api_dir: DEFAULT_API_DIR.to_string(),
            use_readme: false,
            module_version: module_version.into(),
            package_mode: PackageMode::default(),
            website_base_url: DEFAULT_WEBSITE_BASE_URL.to_string(),
            repo_base_url: DEFAULT_REPO_BASE_URL.to_string(),
            strictness: Strictness::default(),
        }
    }
}

/// Parse a documentation tree into its containers.
pub fn parse_docs(options: &ParseOptions) -> Result<Vec<DocumentationContainer>> {
    DocsParser::new(options).parse()
}

enum BaseKind {
    Module,
    Class,
    Element,
    Structure,
}

struct BaseContainer<'a> {
    base: ContainerBase,
    kind: BaseKind,
    tokens: &'a [Token],
}

pub struct DocsParser<'a> {
    options: &'a ParseOptions,
}

impl<'a> DocsParser<'a> {
    pub fn new(options: &'a ParseOptions) -> Self {
        DocsParser { options }
    }

    pub fn parse(&self) -> Result<Vec<DocumentationContainer>> {
        let files = discover(
            &self.options.base_directory,
            &self.options.api_dir,
            self.options.use_readme,
        )?;

        let mut containers = Vec::new();
        for api_file in &files.api_files {
            containers.extend(
                self.parse_api_file(api_file)
                    .map_err(|err| err.in_file(api_file))?,
            );
        }
        for structure_file in &files.structure_files {
            if let Some(container) = self
                .parse_structure_file(structure_file)
                .map_err(|err| err.in_file(structure_file))?
            {
                containers.push(container);
            }
        }

        containers.retain(|container| match container {
            DocumentationContainer::Module(module) => !module.is_empty(),
            _ => true,
        });
        Ok(containers)
    }

    fn read(&self, file: &Path) -> Result<String> {
        fs::read_to_string(file).map_err(|err| MdexError::Io {
            path: file.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// `docs/api/app.md` -> `docs/api/app`, forward slashes on every
    /// platform.
    fn relative_doc_path(&self, file: &Path) -> String {
        let relative = file
            .strip_prefix(&self.options.base_directory)
            .unwrap_or(file)
            .with_extension("");
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn container_base(&self, file: &Path, name: String, extends: Option<String>) -> ContainerBase {
        let relative = self.relative_doc_path(file);
        let slug = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        ContainerBase {
            name,
            extends,
            description: String::new(),
            version: self.options.module_version.clone(),
            slug,
            website_url: format!("{}/{relative}", self.options.website_base_url),
            repo_url: format!(
                "{}/v{}/{relative}.md",
                self.options.repo_base_url, self.options.module_version
            ),
        }
    }

    /// Classify the container headings of one file.
    ///
    /// A first heading ending in `(Draft)` suppresses the whole file.
    fn parse_base_containers<'t>(
        &self,
        file: &Path,
        tokens: &'t [Token],
        is_structure: bool,
    ) -> Result<Vec<BaseContainer<'t>>> {
        let headings = headings_and_content(tokens)?;
        if headings.is_empty() {
            return Err(MdexError::Parse {
                message: "Expected the file to have a top level heading".to_string(),
                help: None,
            });
        }
        if headings[0].heading.ends_with("(Draft)") {
            return Ok(Vec::new());
        }

        let mut containers = Vec::new();
        for group in headings {
            let is_top_level = group.level == 1 && containers.is_empty();
            let is_class_heading = group.level == 2 && group.heading.starts_with("Class: ");
            if !is_top_level && !is_class_heading {
                continue;
            }

            let (kind, name, extends) = if is_structure {
                let caps =
                    STRUCTURE_HEADING
                        .captures(&group.heading)
                        .ok_or_else(|| MdexError::Parse {
                            message: format!(
                                "Structure doc heading \"{}\" should end with \" Object\"",
                                group.heading
                            ),
                            help: None,
                        })?;
                (
                    BaseKind::Structure,
                    caps[1].to_string(),
                    caps.get(2).map(|m| m.as_str().to_string()),
                )
            } else if is_class_heading {
                let caps = CLASS_HEADING
                    .captures(&group.heading)
                    .ok_or_else(|| MdexError::Parse {
                        message: format!("Could not parse class heading \"{}\"", group.heading),
                        help: None,
                    })?;
                (
                    BaseKind::Class,
                    caps[1].to_string(),
                    caps.get(2).map(|m| m.as_str().to_string()),
                )
            } else if let Some(caps) = ELEMENT_HEADING.captures(&group.heading) {
                (
                    BaseKind::Element,
                    to_camel_case(&format!("{} tag", &caps[1])),
                    Some("HTMLElement".to_string()),
                )
            } else {
                (BaseKind::Module, group.heading.clone(), None)
            };

            let mut base = self.container_base(file, name, extends);
            if !is_structure {
                base.description = container_description(group.content)?;
            }
            containers.push(BaseContainer {
                base,
                kind,
                tokens: group.content,
            });
        }
        Ok(containers)
    }

    fn parse_api_file(&self, file: &Path) -> Result<Vec<DocumentationContainer>> {
        let contents = self.read(file)?;
        let tokens = tokenize(&contents);
        let strict = &self.options.strictness;

        let mut modules: Vec<ModuleDoc> = Vec::new();
        let mut classes: Vec<ClassDoc> = Vec::new();
        let mut elements: Vec<ElementDoc> = Vec::new();

        for container in self.parse_base_containers(file, &tokens, false)? {
            let process = find_process(container.tokens);
            match container.kind {
                BaseKind::Module => modules.push(ModuleDoc {
                    base: container.base,
                    process,
                    methods: parse_method_blocks(
                        find_content_inside_header(container.tokens, "Methods", 2)?,
                        strict,
                    )?,
                    events: parse_event_blocks(
                        find_content_inside_header(container.tokens, "Events", 2)?,
                        strict,
                    )?,
                    properties: parse_property_blocks(
                        find_content_inside_header(container.tokens, "Properties", 2)?,
                        strict,
                    )?,
                    exported_classes: None,
                }),
                BaseKind::Class => classes.push(ClassDoc {
                    instance_name: instance_name(container.tokens, &container.base.name)?,
                    constructor_method: parse_constructor_method(container.tokens, strict)?,
                    static_methods: parse_method_blocks(
                        find_content_inside_header(container.tokens, "Static Methods", 3)?,
                        strict,
                    )?,
                    static_properties: parse_property_blocks(
                        find_content_inside_header(container.tokens, "Static Properties", 3)?,
                        strict,
                    )?,
                    instance_methods: parse_method_blocks(
                        find_content_inside_header(container.tokens, "Instance Methods", 3)?,
                        strict,
                    )?,
                    instance_properties: parse_property_blocks(
                        find_content_inside_header(container.tokens, "Instance Properties", 3)?,
                        strict,
                    )?,
                    instance_events: parse_event_blocks(
                        find_content_inside_header(container.tokens, "Instance Events", 3)?,
                        strict,
                    )?,
                    base: container.base,
                    process,
                }),
                BaseKind::Element => elements.push(ElementDoc {
                    base: container.base,
                    process,
                    methods: parse_method_blocks(
                        find_content_inside_header(container.tokens, "Methods", 2)?,
                        strict,
                    )?,
                    properties: parse_property_blocks(
                        find_content_inside_header(container.tokens, "Tag Attributes", 2)?,
                        strict,
                    )?,
                    events: parse_event_blocks(
                        find_content_inside_header(container.tokens, "DOM Events", 2)?,
                        strict,
                    )?,
                }),
                BaseKind::Structure => {
                    return Err(MdexError::Parse {
                        message: "Found a structure heading outside the structures directory"
                            .to_string(),
                        help: None,
                    })
                }
            }
        }

        let mut containers = Vec::new();
        match self.options.package_mode {
            PackageMode::Single => {
                containers.extend(modules.into_iter().map(DocumentationContainer::Module));
                containers.extend(classes.into_iter().map(DocumentationContainer::Class));
            }
            PackageMode::Multi => {
                if !classes.is_empty() {
                    if let Some(module) = modules.first_mut() {
                        module.exported_classes = Some(std::mem::take(&mut classes));
                    }
                }
                containers.extend(modules.into_iter().map(DocumentationContainer::Module));
                containers.extend(classes.into_iter().map(DocumentationContainer::Class));
            }
        }
        containers.extend(elements.into_iter().map(DocumentationContainer::Element));
        Ok(containers)
    }

    fn parse_structure_file(&self, file: &Path) -> Result<Option<DocumentationContainer>> {
        let contents = self.read(file)?;
        let tokens = tokenize(&contents);

        let mut bases = self.parse_base_containers(file, &tokens, true)?;
        if bases.is_empty() {
            return Ok(None);
        }
        if bases.len() != 1 {
            return Err(MdexError::Parse {
                message: "Structure doc files should contain exactly one structure".to_string(),
                help: None,
            });
        }
        let container = bases.remove(0);

        let list = find_next_list(container.tokens).ok_or_else(|| MdexError::Parse {
            message: format!(
                "Structure \"{}\" is missing its property list",
                container.base.name
            ),
            help: None,
        })?;
        let properties = convert_list_to_typed_keys(list, &self.options.strictness)?
            .consume()?
            .into_iter()
            .map(|key| key.into_property_block())
            .collect();

        let mut base = container.base;
        base.description = safely_join_tokens(find_content_after_list(container.tokens, false))?;

        Ok(Some(DocumentationContainer::Structure(StructureDoc {
            base,
            properties,
        })))
    }
}

/// Content between a container heading and its first sub-heading,
/// minus the process availability line.
fn container_description(tokens: &[Token]) -> Result<String> {
    let content = find_content_after_heading_close(tokens);
    let end = content
        .iter()
        .position(|t| t.kind == TokenKind::HeadingOpen)
        .unwrap_or(content.len());
    let content = &content[..end];

    let mut kept: Vec<Token> = Vec::new();
    let mut skipping = false;
    for (i, token) in content.iter().enumerate() {
        if token.kind == TokenKind::ParagraphOpen {
            let annotation = content.get(i + 1).is_some_and(|t| {
                t.kind == TokenKind::Inline
                    && (t.content.starts_with("Process:") || t.content.starts_with("Exported in"))
            });
            if annotation {
                skipping = true;
            }
        }
        if !skipping {
            kept.push(token.clone());
        }
        if token.kind == TokenKind::ParagraphClose {
            skipping = false;
        }
    }
    safely_join_tokens(&kept)
}

/// The conventional variable name of a class instance, read from the
/// first level-4 method heading, e.g. `win` in `` `win.close()` ``.
fn instance_name(tokens: &[Token], class_name: &str) -> Result<String> {
    let level_four = headings_and_content(tokens)?
        .into_iter()
        .find(|group| group.level == 4);
    let guessed = level_four.and_then(|group| {
        group
            .heading
            .split('`')
            .nth(1)
            .and_then(|code| code.split('.').next())
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
    });
    Ok(guessed.unwrap_or_else(|| to_camel_case(class_name)))
}
