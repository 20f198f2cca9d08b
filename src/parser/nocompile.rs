/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// # Must not compile tests
///
/// Event iterator cannot outlive the bytes buffer:
/// ```compile_fail
/// use streamsax::SaxParser;
/// let mut parser = SaxParser::new();
/// let mut events;
/// {
///     let bytes = b"<root/>".to_vec();
///     events = parser.events(&bytes);
/// }
/// println!("{:?}", events.next());
/// ```
///
/// Event iterator cannot outlive the parser:
/// ```compile_fail
/// use streamsax::SaxParser;
/// let bytes = b"<root/>";
/// let mut events;
/// {
///     let mut parser = SaxParser::new();
///     events = parser.events(bytes);
/// }
/// println!("{:?}", events.next());
/// ```
///
/// Parser cannot be reset while an event iterator is alive:
/// ```compile_fail
/// use streamsax::SaxParser;
/// let mut parser = SaxParser::new();
/// let mut events = parser.events(b"<root/>");
/// parser.reset();
/// println!("{:?}", events.next());
/// ```
///
/// Events are owned, they can outlive both the iterator and the parser:
/// ```
/// use streamsax::{SaxEvent, SaxParser};
/// let event: SaxEvent;
/// {
///     let bytes = b"<root/>".to_vec();
///     let mut parser = SaxParser::new();
///     let mut events = parser.events(&bytes);
///     events.next();
///     event = events.next().unwrap();
/// }
/// assert_eq!(event.element().unwrap().qname(), "root");
/// ```
///
#[cfg(doctest)]
struct MustNotCompileTests;
