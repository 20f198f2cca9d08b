/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Incremental SAX style XML tokenizer.
//!
//! The input is processed one character at a time by a resumable state
//! machine, so documents of any size can be parsed from streaming sources
//! with memory bounded by the longest single token. Namespace prefixes are
//! resolved when a start tag is complete and every event carries owned
//! snapshots of the elements involved.
//!
//! Events can be pushed into a [SaxHandler] (or per kind callbacks with
//! [SaxListeners]), or pulled with the [SaxEvents] and [PullParser]
//! iterators.
//!
//! ```
//! use streamsax::{SaxEvent, SaxParser};
//!
//! let mut parser = SaxParser::new();
//! let events: Vec<String> = parser
//!     .events(b"<a xmlns:b='urn:x'><b:c/></a>")
//!     .map(|event| event.to_string())
//!     .collect();
//! assert_eq!(events, [
//!     "start_document",
//!     "start_prefix_mapping(b, urn:x)",
//!     "start_element(a)",
//!     "start_element(b:c, uri=urn:x, standalone)",
//!     "end_element(b:c)",
//!     "end_element(a)",
//!     "end_prefix_mapping(b, urn:x)",
//!     "end_document",
//! ]);
//! ```

mod automaton;
mod config;
mod context;
pub mod entities;
mod event;
mod listener;
mod name;
mod parser;
mod pull;

pub use automaton::State;
pub use automaton::step;

pub use config::DEFAULT_BUFFER_SIZE;
pub use config::ParserConfig;

pub use context::Attribute;
pub use context::Element;
pub use context::ParseContext;

pub use event::Ancestors;
pub use event::AttributeView;
pub use event::ElementView;
pub use event::EventKind;
pub use event::PrefixMapping;
pub use event::SaxEvent;

pub use listener::SaxListeners;

pub use name::QualifiedName;
pub use name::XML_NAMESPACE;
pub use name::XMLNS;

pub use parser::Location;
pub use parser::SaxError;
pub use parser::SaxHandler;
pub use parser::SaxHandlerError;
pub use parser::SaxParser;

pub use pull::PullParser;
pub use pull::SaxEvents;
