/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod element;

use std::borrow::Cow;
use std::collections::HashMap;

pub use element::Attribute;
pub use element::Element;

use crate::ElementView;
use crate::Location;
use crate::ParserConfig;
use crate::SaxError;
use crate::automaton::State;
use crate::name::XML_NAMESPACE;

const INITIAL_MEMENTO_CAPACITY: usize = 128;

/// Mutable state of a parse session.
///
/// Every transition of the automaton reads and updates this structure.
/// It holds the stack of open elements, the active namespace bindings,
/// the scratch buffer of the current lexical token (the memento), the
/// quote character of an attribute value being read, the current state
/// and the position in the input.
///
/// One context serves a single document at a time. After an error it must
/// be [reset](ParseContext::reset) before it is used again.
#[derive(Debug)]
pub struct ParseContext {
    state: State,
    quote: Option<char>,
    memento: String,
    elements: Vec<Element>,
    namespaces: HashMap<String, String>,
    scoped_namespaces: bool,
    seen_content: bool,
    subset_depth: usize,
    location: Location,
}

impl ParseContext {
    pub fn new() -> Self {
        ParseContext::with_config(&ParserConfig::default())
    }

    pub fn with_config(config: &ParserConfig) -> Self {
        let mut cx = ParseContext {
            state: State::BeforeDocument,
            quote: None,
            memento: String::with_capacity(INITIAL_MEMENTO_CAPACITY),
            elements: Vec::new(),
            namespaces: HashMap::new(),
            scoped_namespaces: config.scoped_namespaces,
            seen_content: false,
            subset_depth: 0,
            location: Location::new(),
        };
        cx.bind_predefined();
        cx
    }

    /// Puts the context back to its initial state, keeping the allocations.
    pub fn reset(&mut self) {
        self.state = State::BeforeDocument;
        self.quote = None;
        self.memento.clear();
        self.elements.clear();
        self.namespaces.clear();
        self.bind_predefined();
        self.seen_content = false;
        self.subset_depth = 0;
        self.location = Location::new();
    }

    fn bind_predefined(&mut self) {
        self.namespaces
            .insert("xml".to_string(), XML_NAMESPACE.to_string());
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: State) {
        self.state = state;
    }

    pub fn quote(&self) -> Option<char> {
        self.quote
    }

    pub(crate) fn set_quote(&mut self, quote: Option<char>) {
        self.quote = quote;
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub(crate) fn advance(&mut self, c: char) {
        self.location.advance(c);
    }

    pub(crate) fn skip(&mut self, c: char) {
        self.location.skip(c);
    }

    /// Builds an error at the current position.
    pub(crate) fn error(&self, message: impl Into<Cow<'static, str>>) -> SaxError {
        SaxError::bad_xml(message, self.location)
    }

    /// Characters of the current token collected so far.
    pub fn memento(&self) -> &str {
        &self.memento
    }

    pub(crate) fn append(&mut self, c: char) {
        self.memento.push(c);
    }

    pub(crate) fn append_str(&mut self, s: &str) {
        self.memento.push_str(s);
    }

    pub(crate) fn clear_memento(&mut self) {
        self.memento.clear();
    }

    pub(crate) fn take_memento(&mut self) -> String {
        std::mem::take(&mut self.memento)
    }

    /// True once a start tag has been seen.
    pub fn seen_content(&self) -> bool {
        self.seen_content
    }

    /// Nesting level of the internal subset of a doctype declaration.
    pub(crate) fn subset_depth(&self) -> usize {
        self.subset_depth
    }

    pub(crate) fn set_subset_depth(&mut self, depth: usize) {
        self.subset_depth = depth;
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    pub fn peek(&self) -> Option<&Element> {
        self.elements.last()
    }

    pub(crate) fn peek_mut(&mut self) -> Option<&mut Element> {
        self.elements.last_mut()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub(crate) fn new_element(&mut self, qname: String) {
        let parent = self.elements.len().checked_sub(1);
        self.elements.push(Element::new(qname, parent));
        self.seen_content = true;
    }

    /// Snapshot of the innermost open element, if its start tag is resolved.
    pub fn current_view(&self) -> Option<ElementView> {
        self.peek().and_then(|element| element.view.clone())
    }

    /// Active URI of a namespace prefix, the empty prefix is the default namespace.
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// Binds a prefix on behalf of the innermost open element.
    ///
    /// The binding is undone when that element is popped.
    pub(crate) fn register(&mut self, prefix: &str, uri: &str) {
        let previous = self.namespaces.insert(prefix.to_string(), uri.to_string());
        if let Some(element) = self.elements.last_mut() {
            element.bindings.push((prefix.to_string(), previous));
        }
    }

    /// Completes the start tag of the innermost element.
    ///
    /// The namespace declarations of the element are registered first, then
    /// the element and its attributes get their URIs from the updated
    /// bindings. Returns the snapshot for the start element event.
    pub(crate) fn resolve_top(&mut self) -> Option<ElementView> {
        let index = self.elements.len().checked_sub(1)?;
        let mappings: Vec<(String, String)> = self.elements[index]
            .prefix_mappings()
            .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
            .collect();
        for (prefix, uri) in mappings.iter() {
            self.register(prefix, uri);
        }

        let parent = self.elements[index]
            .parent()
            .and_then(|parent| self.elements.get(parent))
            .and_then(|parent| parent.view.clone());

        let namespaces = &self.namespaces;
        let element = &mut self.elements[index];
        element.set_uri(namespaces.get(element.prefix()).cloned());
        for attribute in element.attributes_mut() {
            attribute.set_uri(namespaces.get(attribute.prefix()).cloned());
        }
        let view = ElementView::snapshot(element, parent, index);
        element.view = Some(view.clone());
        Some(view)
    }

    /// Removes the innermost element and undoes its namespace bindings.
    pub(crate) fn pop_element(&mut self) -> Option<Element> {
        let element = self.elements.pop()?;
        for (prefix, previous) in element.bindings.iter().rev() {
            match previous {
                Some(uri) if self.scoped_namespaces => {
                    self.namespaces.insert(prefix.clone(), uri.clone());
                }
                _ => {
                    self.namespaces.remove(prefix);
                }
            }
        }
        Some(element)
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        ParseContext::new()
    }
}
