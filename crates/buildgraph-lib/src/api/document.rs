//! Hypermedia document tree and link navigation
//!
//! The CI server answers every request with an XML document whose links to
//! related resources are embedded as `href` attributes. This module parses
//! a response body into an owned element tree and resolves hard-coded link
//! paths against the server's base address.
//!
//! Namespace prefixes are stripped during parsing, so the package feed's
//! `m:properties` / `d:Dependencies` elements are addressed by their local
//! names.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use reqwest::Url;
use std::collections::HashMap;
use thiserror::Error;

/// Document parsing and navigation errors
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to parse XML document: {reason}")]
    Parse { reason: String },

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Expected element '{name}' not found")]
    MissingElement { name: String },

    #[error("Expected attribute '{name}' on element '{element}' not found")]
    MissingAttribute { name: String, element: String },

    #[error("Link '{path}' not found in document")]
    LinkNotFound { path: String },

    #[error("Failed to resolve href '{href}': {reason}")]
    InvalidHref { href: String, reason: String },
}

/// One element of a parsed hypermedia document
#[derive(Debug, Clone, Default)]
pub struct Element {
    name: String,
    attributes: HashMap<String, String>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Attribute lookup where the API schema guarantees presence; absence
    /// is a contract violation, not a transient condition.
    pub fn require_attr(&self, name: &str) -> Result<&str, DocumentError> {
        self.attr(name).ok_or_else(|| DocumentError::MissingAttribute {
            name: name.to_string(),
            element: self.name.clone(),
        })
    }

    /// First child element with the given local name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn require_child(&self, name: &str) -> Result<&Element, DocumentError> {
        self.child(name).ok_or_else(|| DocumentError::MissingElement {
            name: name.to_string(),
        })
    }

    /// All child elements with the given local name, in document order
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Concatenated, whitespace-trimmed text content of this element
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Read this element's `href` attribute and resolve it against `base`
    pub fn link(&self, base: &Url) -> Result<Url, DocumentError> {
        let href = self.require_attr("href")?;
        base.join(href).map_err(|e| DocumentError::InvalidHref {
            href: href.to_string(),
            reason: e.to_string(),
        })
    }
}

/// A parsed hypermedia document
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse an XML body into a document tree
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(start)) => stack.push(element_from_start(&start)?),
                Ok(Event::Empty(start)) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| DocumentError::Parse {
                        reason: "unexpected closing tag".to_string(),
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(text)) => {
                    if let Some(parent) = stack.last_mut() {
                        let decoded = text.decode().map_err(|e| DocumentError::Parse {
                            reason: e.to_string(),
                        })?;
                        let value =
                            quick_xml::escape::unescape(&decoded).map_err(|e| {
                                DocumentError::Parse {
                                    reason: e.to_string(),
                                }
                            })?;
                        let trimmed = value.trim();
                        if !trimmed.is_empty() {
                            if !parent.text.is_empty() {
                                parent.text.push(' ');
                            }
                            parent.text.push_str(trimmed);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(DocumentError::Parse {
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !stack.is_empty() {
            return Err(DocumentError::Parse {
                reason: "unclosed element at end of document".to_string(),
            });
        }

        root.map(|root| Self { root })
            .ok_or(DocumentError::EmptyDocument)
    }

    /// The sentinel manifest substituted when a build has no package
    /// activity: the server answers the manifest request with a
    /// non-success status, not with an empty document.
    pub fn empty_manifest() -> Self {
        let mut root = Element::named("nuget-dependencies");
        root.children.push(Element::named("packages"));
        root.children.push(Element::named("created"));
        root.children.push(Element::named("published"));
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Walk one child element per path segment, starting at the root.
    /// First match only; an absent segment is a contract violation.
    pub fn navigate(&self, path: &[&str]) -> Result<&Element, DocumentError> {
        let mut current = &self.root;
        for segment in path {
            current = current.require_child(segment)?;
        }
        Ok(current)
    }
}

/// Resolve the relative link at `path` to an absolute request target.
///
/// Walks the element path from the document root, reads the final
/// element's `href`, and joins it against `base`. Any absent element or a
/// missing `href` yields `LinkNotFound`: the paths are hard-coded against
/// the server's schema, so this always indicates a defect, never a
/// condition to retry.
pub fn resolve_link(doc: &Document, base: &Url, path: &[&str]) -> Result<Url, DocumentError> {
    let element = doc.navigate(path).map_err(|_| link_not_found(path))?;
    match element.link(base) {
        Err(DocumentError::MissingAttribute { .. }) => Err(link_not_found(path)),
        other => other,
    }
}

fn link_not_found(path: &[&str]) -> DocumentError {
    DocumentError::LinkNotFound {
        path: path.join("/"),
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, DocumentError> {
    let mut element = Element::named(String::from_utf8_lossy(start.local_name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocumentError::Parse {
            reason: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DocumentError::Parse {
                reason: e.to_string(),
            })?
            .into_owned();
        element.attributes.insert(key, value);
    }

    Ok(element)
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), DocumentError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(DocumentError::Parse {
            reason: "multiple root elements".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    include!("document.test.rs");
}
