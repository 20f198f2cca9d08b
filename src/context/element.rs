/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::ElementView;
use crate::QualifiedName;
use crate::name::XMLNS;

/// An attribute of an open element.
#[derive(Clone, Debug)]
pub struct Attribute {
    name: QualifiedName,
    value: String,
    uri: Option<String>,
}

impl Attribute {
    pub fn new(qname: impl Into<String>) -> Self {
        Attribute {
            name: QualifiedName::new(qname),
            value: String::new(),
            uri: None,
        }
    }

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

    /// Attribute value with the entity references already replaced.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Namespace URI, available after the start tag is closed.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// True for `xmlns` and `xmlns:*` attributes.
    pub fn is_namespace_declaration(&self) -> bool {
        self.name.prefix() == XMLNS
    }

    pub(crate) fn set_value(&mut self, value: String) {
        self.value = value;
    }

    pub(crate) fn set_uri(&mut self, uri: Option<String>) {
        self.uri = uri;
    }
}

/// An element on the [ParseContext](super::ParseContext) stack.
///
/// The parent link is the stack index of the enclosing element, it is
/// only meaningful while both elements are open.
#[derive(Clone, Debug)]
pub struct Element {
    name: QualifiedName,
    attributes: Vec<Attribute>,
    parent: Option<usize>,
    uri: Option<String>,
    standalone: bool,
    // (prefix, binding before this element declared it)
    pub(super) bindings: Vec<(String, Option<String>)>,
    pub(super) view: Option<ElementView>,
}

impl Element {
    pub fn new(qname: impl Into<String>, parent: Option<usize>) -> Self {
        Element {
            name: QualifiedName::new(qname),
            attributes: Vec::new(),
            parent,
            uri: None,
            standalone: false,
            bindings: Vec::new(),
            view: None,
        }
    }

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

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn peek_attribute(&self) -> Option<&Attribute> {
        self.attributes.last()
    }

    pub fn is_standalone(&self) -> bool {
        self.standalone
    }

    /// Namespace declarations made on this element as (prefix, uri) pairs.
    ///
    /// The default namespace declaration has an empty prefix.
    pub fn prefix_mappings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter(|attribute| attribute.is_namespace_declaration())
            .map(|attribute| (attribute.local_part(), attribute.value()))
    }

    pub(crate) fn new_attribute(&mut self, qname: String) {
        self.attributes.push(Attribute::new(qname));
    }

    pub(crate) fn peek_attribute_mut(&mut self) -> Option<&mut Attribute> {
        self.attributes.last_mut()
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut [Attribute] {
        &mut self.attributes
    }

    pub(crate) fn set_uri(&mut self, uri: Option<String>) {
        self.uri = uri;
    }

    pub(crate) fn set_standalone(&mut self) {
        self.standalone = true;
    }

    /// Snapshot made when the start tag was resolved.
    pub fn view(&self) -> Option<&ElementView> {
        self.view.as_ref()
    }
}
