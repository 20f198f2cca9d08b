/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Display;
use std::sync::Arc;

use crate::QualifiedName;
use crate::SaxError;
use crate::context::Element;

/// A namespace prefix bound to a URI.
///
/// The default namespace has an empty prefix.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PrefixMapping {
    pub prefix: String,
    pub uri: String,
}

/// Read-only copy of an attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeView {
    name: QualifiedName,
    value: String,
    uri: Option<String>,
}

impl AttributeView {
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn qname(&self) -> &str {
        self.name.as_str()
    }

    pub fn prefix(&self) -> &str {
        self.name.prefix()
    }

    pub fn local_part(&self) -> &str {
        self.name.local_part()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Eq, PartialEq)]
struct ElementSnapshot {
    name: QualifiedName,
    uri: Option<String>,
    attributes: Vec<AttributeView>,
    prefix_mappings: Vec<PrefixMapping>,
    standalone: bool,
    depth: usize,
    parent: Option<ElementView>,
}

/// Read-only copy of an element, taken when its start tag is complete.
///
/// Views are reference counted, cloning one is cheap and the parent
/// chain is shared with the views of the enclosing elements. A view
/// stays valid after the element is closed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ElementView {
    inner: Arc<ElementSnapshot>,
}

impl ElementView {
    pub(crate) fn snapshot(element: &Element, parent: Option<ElementView>, depth: usize) -> Self {
        let attributes = element
            .attributes()
            .iter()
            .map(|attribute| AttributeView {
                name: attribute.name().clone(),
                value: attribute.value().to_string(),
                uri: attribute.uri().map(str::to_string),
            })
            .collect();
        let prefix_mappings = element
            .prefix_mappings()
            .map(|(prefix, uri)| PrefixMapping {
                prefix: prefix.to_string(),
                uri: uri.to_string(),
            })
            .collect();
        ElementView {
            inner: Arc::new(ElementSnapshot {
                name: element.name().clone(),
                uri: element.uri().map(str::to_string),
                attributes,
                prefix_mappings,
                standalone: element.is_standalone(),
                depth,
                parent,
            }),
        }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.inner.name
    }

    pub fn qname(&self) -> &str {
        self.inner.name.as_str()
    }

    pub fn prefix(&self) -> &str {
        self.inner.name.prefix()
    }

    pub fn local_part(&self) -> &str {
        self.inner.name.local_part()
    }

    /// Namespace URI of the element, if its prefix is bound.
    pub fn uri(&self) -> Option<&str> {
        self.inner.uri.as_deref()
    }

    /// Enclosing element, `None` for the root element.
    pub fn parent(&self) -> Option<&ElementView> {
        self.inner.parent.as_ref()
    }

    pub fn attributes(&self) -> &[AttributeView] {
        &self.inner.attributes
    }

    /// Looks up an attribute by its qualified name.
    pub fn attribute(&self, qname: &str) -> Option<&AttributeView> {
        self.inner
            .attributes
            .iter()
            .find(|attribute| attribute.qname() == qname)
    }

    /// Namespace declarations made directly on this element.
    pub fn prefix_mappings(&self) -> &[PrefixMapping] {
        &self.inner.prefix_mappings
    }

    /// True if the element was written as an empty element tag `<name/>`.
    pub fn is_standalone(&self) -> bool {
        self.inner.standalone
    }

    /// Number of enclosing elements, zero for the root element.
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    /// Iterates over the enclosing elements, starting from the parent.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            current: self.parent(),
        }
    }
}

pub struct Ancestors<'a> {
    current: Option<&'a ElementView>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ElementView;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.current?;
        self.current = result.parent();
        Some(result)
    }
}

/// Discriminant of a [SaxEvent].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventKind {
    StartDocument,
    ProcessingInstruction,
    SgmlDeclaration,
    Doctype,
    StartPrefixMapping,
    StartElement,
    Text,
    Comment,
    EndElement,
    EndPrefixMapping,
    EndDocument,
    Error,
}

impl EventKind {
    pub const ALL: [EventKind; 12] = [
        EventKind::StartDocument,
        EventKind::ProcessingInstruction,
        EventKind::SgmlDeclaration,
        EventKind::Doctype,
        EventKind::StartPrefixMapping,
        EventKind::StartElement,
        EventKind::Text,
        EventKind::Comment,
        EventKind::EndElement,
        EventKind::EndPrefixMapping,
        EventKind::EndDocument,
        EventKind::Error,
    ];

    /// Record name of the event.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::StartDocument => "start_document",
            EventKind::ProcessingInstruction => "processing_instruction",
            EventKind::SgmlDeclaration => "sgml_declaration",
            EventKind::Doctype => "doctype",
            EventKind::StartPrefixMapping => "start_prefix_mapping",
            EventKind::StartElement => "start_element",
            EventKind::Text => "text",
            EventKind::Comment => "comment",
            EventKind::EndElement => "end_element",
            EventKind::EndPrefixMapping => "end_prefix_mapping",
            EventKind::EndDocument => "end_document",
            EventKind::Error => "error",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A parse event, emitted in document order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SaxEvent {
    /// The first `<` of the document is seen.
    StartDocument,

    /// Content between `<?` and `?>`.
    ProcessingInstruction(String),

    /// Content of a `<!...>` markup which is not a comment, CDATA section or doctype.
    SgmlDeclaration(String),

    /// Content after `<!DOCTYPE` up to the closing `>`.
    Doctype(String),

    /// Sent before the [StartElement](SaxEvent::StartElement) of the declaring element.
    StartPrefixMapping { prefix: String, uri: String },

    StartElement(ElementView),

    /// Character data inside an element.
    ///
    /// Entity references are replaced unless the text comes from a CDATA section.
    /// A run of text between two markups is sent as a single event.
    Text {
        content: String,
        element: ElementView,
        cdata: bool,
    },

    Comment(String),

    EndElement(ElementView),

    /// Sent after the [EndElement](SaxEvent::EndElement) of the declaring element.
    EndPrefixMapping { prefix: String, uri: String },

    /// The root element is closed.
    EndDocument,

    /// Terminal record of the pull parsers.
    ///
    /// The push parser returns errors instead of sending this.
    Error(SaxError),
}

impl SaxEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SaxEvent::StartDocument => EventKind::StartDocument,
            SaxEvent::ProcessingInstruction(_) => EventKind::ProcessingInstruction,
            SaxEvent::SgmlDeclaration(_) => EventKind::SgmlDeclaration,
            SaxEvent::Doctype(_) => EventKind::Doctype,
            SaxEvent::StartPrefixMapping { .. } => EventKind::StartPrefixMapping,
            SaxEvent::StartElement(_) => EventKind::StartElement,
            SaxEvent::Text { .. } => EventKind::Text,
            SaxEvent::Comment(_) => EventKind::Comment,
            SaxEvent::EndElement(_) => EventKind::EndElement,
            SaxEvent::EndPrefixMapping { .. } => EventKind::EndPrefixMapping,
            SaxEvent::EndDocument => EventKind::EndDocument,
            SaxEvent::Error(_) => EventKind::Error,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// The element the event belongs to, if any.
    pub fn element(&self) -> Option<&ElementView> {
        match self {
            SaxEvent::StartElement(element) => Some(element),
            SaxEvent::EndElement(element) => Some(element),
            SaxEvent::Text { element, .. } => Some(element),
            _ => None,
        }
    }

    /// True for the events after which no other event follows.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SaxEvent::EndDocument | SaxEvent::Error(_))
    }
}

impl Display for SaxEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaxEvent::StartDocument | SaxEvent::EndDocument => f.write_str(self.name()),
            SaxEvent::ProcessingInstruction(content)
            | SaxEvent::SgmlDeclaration(content)
            | SaxEvent::Doctype(content)
            | SaxEvent::Comment(content) => write!(f, "{}({:?})", self.name(), content),
            SaxEvent::StartPrefixMapping { prefix, uri }
            | SaxEvent::EndPrefixMapping { prefix, uri } => {
                write!(f, "{}({}, {})", self.name(), prefix, uri)
            }
            SaxEvent::StartElement(element) => {
                write!(f, "start_element({}", element.qname())?;
                if let Some(uri) = element.uri() {
                    write!(f, ", uri={}", uri)?;
                }
                if element.is_standalone() {
                    f.write_str(", standalone")?;
                }
                f.write_str(")")
            }
            SaxEvent::EndElement(element) => write!(f, "end_element({})", element.qname()),
            SaxEvent::Text {
                content,
                element,
                cdata,
            } => {
                if *cdata {
                    write!(f, "cdata({:?}, {})", content, element.qname())
                } else {
                    write!(f, "text({:?}, {})", content, element.qname())
                }
            }
            SaxEvent::Error(err) => write!(
                f,
                "error({}, line {}, column {})",
                err.message(),
                err.line(),
                err.column()
            ),
        }
    }
}
