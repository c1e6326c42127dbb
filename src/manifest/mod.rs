// src/manifest/mod.rs

//! Package manifest model
//!
//! `PackageSpec` is the read-only view validation rules query. It can be
//! built directly from a `ManifestElement` tree or read from a `.nuspec`
//! style XML document. Element and attribute names are stored by local
//! name, so namespaced manifests compare the same as plain ones.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;
use tracing::debug;

/// Name of the node holding package metadata
pub const METADATA_ELEMENT: &str = "metadata";

/// One element of a manifest tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestElement {
    /// Local name (namespace prefix stripped)
    pub name: String,

    /// Attributes in document order, by local name
    pub attributes: Vec<(String, String)>,

    /// Concatenated text content, trimmed
    pub text: String,

    /// Child elements in document order
    pub children: Vec<ManifestElement>,
}

impl ManifestElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder-style: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Builder-style: append a child element
    pub fn with_child(mut self, child: ManifestElement) -> Self {
        self.children.push(child);
        self
    }

    /// Direct children with the given name (ordinal comparison)
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ManifestElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&ManifestElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Attribute value by local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Read-only view of a package manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    root: ManifestElement,
}

impl PackageSpec {
    /// Wrap an already built manifest tree
    pub fn new(root: ManifestElement) -> Self {
        Self { root }
    }

    /// Parse a manifest from XML text
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = parse_document(xml)?;
        Ok(Self::new(root))
    }

    /// Read and parse a manifest file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading manifest: {}", path.display());
        let xml = std::fs::read_to_string(path)?;
        Self::from_xml(&xml).map_err(|e| match e {
            Error::ParseError(msg) => Error::ParseError(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// The document root (`<package>` for nuspec files)
    pub fn root(&self) -> &ManifestElement {
        &self.root
    }

    /// The top-level metadata node, if present
    pub fn metadata(&self) -> Option<&ManifestElement> {
        self.root.child(METADATA_ELEMENT)
    }

    /// Trimmed text of a direct metadata child; `None` if absent
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata()?.child(name).map(|e| e.text.trim())
    }

    /// Package identifier
    pub fn id(&self) -> Option<&str> {
        self.metadata_value("id").filter(|s| !s.is_empty())
    }

    /// Package version as written in the manifest
    pub fn version(&self) -> Option<&str> {
        self.metadata_value("version").filter(|s| !s.is_empty())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<ManifestElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = ManifestElement::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::ParseError(format!("Invalid attribute: {}", e)))?;
        // xmlns declarations are not data
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::ParseError(format!("Invalid attribute value: {}", e)))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

/// Attach a finished element to its parent, or make it the root
fn attach(
    stack: &mut [ManifestElement],
    root: &mut Option<ManifestElement>,
    element: ManifestElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(Error::ParseError(format!(
                "Unexpected second root element <{}>",
                element.name
            )))
        }
    }
    Ok(())
}

fn parse_document(xml: &str) -> Result<ManifestElement> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<ManifestElement> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => stack.push(element_from_start(&e)?),
            Ok(Event::Empty(e)) => {
                let element = element_from_start(&e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| Error::ParseError("Unbalanced closing tag".to_string()))?;
                element.text = element.text.trim().to_string();
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(current) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::ParseError(format!("Invalid text: {}", e)))?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::ParseError(format!(
                    "Failed to parse manifest at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::ParseError(format!("Unclosed element <{}>", open.name)));
    }

    root.ok_or_else(|| Error::ParseError("Manifest has no root element".to_string()))
}
