/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;
mod location;
mod nocompile;

use log::debug;
use log::trace;

pub(crate) use error::description;
pub use error::SaxError;
pub use error::SaxHandlerError;
pub use location::Location;

use crate::ParseContext;
use crate::ParserConfig;
use crate::SaxEvent;
use crate::SaxEvents;
use crate::automaton;
use crate::automaton::State;

/// Receiver of the parse events in push mode.
///
/// Closures of the form `FnMut(&SaxEvent) -> Result<(), SaxHandlerError>`
/// implement this trait too.
pub trait SaxHandler {
    /// Called for every event in document order.
    ///
    /// Returning [SaxHandlerError::Abort] stops the parser, which then
    /// returns [SaxError::HandlerAbort].
    fn handle_event(&mut self, event: &SaxEvent) -> Result<(), SaxHandlerError>;

    /// Called once with the error which stopped the parsing, right before
    /// the parser returns it.
    fn handle_error(&mut self, _error: &SaxError) {}
}

impl<F> SaxHandler for F
where
    F: FnMut(&SaxEvent) -> Result<(), SaxHandlerError>,
{
    fn handle_event(&mut self, event: &SaxEvent) -> Result<(), SaxHandlerError> {
        self(event)
    }
}

/// SAX (Simple API for XML) based XML parser.
///
/// This struct implements an incremental parser which decodes the incoming
/// bytes as UTF-8, runs every character through the tokenizer automaton and
/// passes the produced [SaxEvent]s to a [SaxHandler]. The input can be split
/// at any byte boundary, the events are the same as if the whole document
/// was given at once.
///
/// # Examples
///
/// Typical usage:
/// ```
/// use streamsax::{SaxError, SaxEvent, SaxHandler, SaxHandlerError, SaxParser};
///
/// // Example handler which just prints parsed events
/// struct Handler {}
/// impl SaxHandler for Handler {
///     fn handle_event(&mut self, event: &SaxEvent) -> Result<(), SaxHandlerError> {
///         println!("Event parsed: {}", event);
///         Ok(())
///     }
/// }
/// let mut handler = Handler {};
///
/// let mut parser = SaxParser::new();
///
/// match parser.parse_bytes_finish(&mut handler, b"<doc>example</doc>") {
///     Ok(()) => (),
///     Err(SaxError::BadXml { message, location }) => {
///         println!("syntax error at {}: {}", location, message);
///         return;
///     }
///     Err(err) => {
///         println!("parsing stopped: {}", err);
///         return;
///     }
/// }
/// ```
///
/// Alternatively you can pass the input in multiple blocks:
/// ```
/// # use streamsax::{SaxError, SaxEvent, SaxHandlerError, SaxParser};
/// # fn main() -> Result<(), SaxError> {
/// # let mut handler = |_: &SaxEvent| -> Result<(), SaxHandlerError> { Ok(()) };
/// # let mut parser = SaxParser::new();
/// # use std::io::Read;
/// # let mut binding = vec!(b'<', b'a', b'/', b'>');
/// # let mut xml_file = binding.as_slice();
/// let mut buffer = [0u8; 1024];
/// loop {
///     let len = xml_file.read(&mut buffer).expect("io error");
///     if len == 0 {
///         break;
///     }
///     parser.parse_bytes(&mut handler, &buffer[0..len])?
/// }
/// // This is to check if there is any incomplete XML construct at the end
/// parser.parse_finish(&mut handler)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SaxParser {
    cx: ParseContext,
    config: ParserConfig,
    uni_len: u32,
    uni_left: u32,
    uni_char: u32,
    events: Vec<SaxEvent>,
    bom_pending: bool,
    failed: bool,
}

const INITIAL_EVENTS_CAPACITY: usize = 8;

fn is_valid_xml_char(c: u32) -> bool {
    matches!(c, 0x09 | 0x0a | 0x0d | 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff)
}

impl SaxParser {
    /// Creates a new SAX parser instance with the default configuration.
    ///
    /// The instance can be reused for multiple documents with the
    /// [reset()](SaxParser::reset) method.
    pub fn new() -> SaxParser {
        SaxParser::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> SaxParser {
        debug!("new parser, {:?}", config);
        SaxParser {
            cx: ParseContext::with_config(&config),
            config,
            uni_len: 0,
            uni_left: 0,
            uni_char: 0,
            events: Vec::with_capacity(INITIAL_EVENTS_CAPACITY),
            bom_pending: true,
            failed: false,
        }
    }

    /// Resets the parser into a clean state.
    ///
    /// This is the only way to continue using a parser after an error.
    pub fn reset(&mut self) {
        debug!("parser reset at {}", self.cx.location());
        self.cx.reset();
        self.uni_len = 0;
        self.uni_left = 0;
        self.uni_char = 0;
        self.events.clear();
        self.bom_pending = true;
        self.failed = false;
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Position right after the last consumed character.
    pub fn location(&self) -> Location {
        self.cx.location()
    }

    /// Number of currently open elements.
    pub fn depth(&self) -> usize {
        self.cx.depth()
    }

    /// True when the root element is closed and no error happened.
    pub fn is_finished(&self) -> bool {
        !self.failed && self.cx.state() == State::AfterDocument
    }

    /// The parse context, mostly useful for diagnostics.
    pub fn context(&self) -> &ParseContext {
        &self.cx
    }

    fn reuse_error(&self) -> SaxError {
        SaxError::bad_xml(description::PARSER_REUSE_WITHOUT_RESET, self.cx.location())
    }

    // The context location only moves on complete characters, bytes of a
    // partial sequence are added here.
    fn decode_error(&self, message: &'static str, consumed: u32) -> SaxError {
        let mut location = self.cx.location();
        location.bytes += consumed as usize;
        SaxError::bad_xml(message, location)
    }

    fn decode(&mut self, byte: u8) -> Result<Option<char>, SaxError> {
        if self.uni_left > 0 {
            let consumed = self.uni_len - self.uni_left + 1;
            if byte & 0xc0 != 0x80 {
                return Err(self.decode_error(description::UTF8_INVALID_CONT_BYTE, consumed));
            }
            self.uni_char <<= 6;
            self.uni_char += byte as u32 & 0x3f;
            self.uni_left -= 1;
            if self.uni_left > 0 {
                return Ok(None);
            }
            // Sequences longer than the actual character codepoint
            // size are security hazards.
            if (self.uni_len == 2 && self.uni_char <= 0x7f)
                || (self.uni_len == 3 && self.uni_char <= 0x7ff)
                || (self.uni_len == 4 && self.uni_char <= 0xffff)
            {
                return Err(self.decode_error(description::UTF8_OVERLONG_SEQUENCE, consumed));
            }
            if !is_valid_xml_char(self.uni_char) {
                return Err(self.decode_error(description::CHAR_INVALID, consumed));
            }
            match char::from_u32(self.uni_char) {
                Some(c) => Ok(Some(c)),
                None => Err(self.decode_error(description::CHAR_INVALID, consumed)),
            }
        } else if byte & 0x80 == 0x80 {
            if byte & 0x60 == 0x40 {
                self.uni_len = 2;
                self.uni_left = 1;
                self.uni_char = byte as u32 & 0x1f;
            } else if byte & 0x70 == 0x60 {
                self.uni_len = 3;
                self.uni_left = 2;
                self.uni_char = byte as u32 & 0x0f;
            } else if byte & 0x78 == 0x70 {
                self.uni_len = 4;
                self.uni_left = 3;
                self.uni_char = byte as u32 & 0x07;
            } else {
                return Err(self.decode_error(description::UTF8_INVALID_PREFIX_BYTE, 1));
            }
            Ok(None)
        } else if !is_valid_xml_char(byte as u32) {
            Err(self.decode_error(description::CHAR_INVALID, 1))
        } else {
            Ok(Some(byte as char))
        }
    }

    fn feed_char(&mut self, c: char, events: &mut Vec<SaxEvent>) -> Result<(), SaxError> {
        if self.bom_pending {
            self.bom_pending = false;
            if c == '\u{feff}' && self.config.skip_bom {
                self.cx.skip(c);
                return Ok(());
            }
        }
        let first = events.len();
        let result = automaton::step(&mut self.cx, c, events);
        for event in &events[first..] {
            trace!("{}", event);
            if let SaxEvent::EndDocument = event {
                debug!("document complete at {}", self.cx.location());
            }
        }
        result
    }

    /// Runs one input byte through the decoder and the automaton.
    ///
    /// Events are appended to `events`. Any error makes the parser unusable
    /// until it is reset.
    pub(crate) fn feed_byte(&mut self, byte: u8, events: &mut Vec<SaxEvent>) -> Result<(), SaxError> {
        if self.failed {
            return Err(self.reuse_error());
        }
        let result = match self.decode(byte) {
            Ok(Some(c)) => self.feed_char(c, events),
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            self.abort(err);
        }
        result
    }

    pub(crate) fn abort(&mut self, err: &SaxError) {
        debug!("parse aborted: {}", err);
        self.failed = true;
    }

    pub(crate) fn is_failed(&self) -> bool {
        self.failed
    }

    /// Checks if the document is complete.
    ///
    /// A completed document should have a root tag and should not have any
    /// unfinished XML constructs, such as open comments and markup.
    pub(crate) fn finish_check(&self) -> Result<(), SaxError> {
        if self.failed {
            return Err(self.reuse_error());
        }
        let location = self.cx.location();
        if self.uni_left > 0 {
            return Err(SaxError::bad_xml(description::UTF8_INCOMPLETE, location));
        }
        if !self.cx.seen_content() {
            return Err(SaxError::bad_xml(description::DOC_NO_CONTENT, location));
        }
        if self.cx.depth() > 0 {
            return Err(SaxError::bad_xml(description::DOC_OPEN_TAGS, location));
        }
        if self.cx.state() != State::AfterDocument {
            return Err(SaxError::bad_xml(description::DOC_OPEN_MARKUP, location));
        }
        Ok(())
    }

    fn deliver(&self, handler: &mut impl SaxHandler, events: &[SaxEvent]) -> Result<(), SaxError> {
        for event in events {
            if handler.handle_event(event).is_err() {
                return Err(SaxError::HandlerAbort {
                    location: self.cx.location(),
                });
            }
        }
        Ok(())
    }

    /// Parses given XML bytes.
    ///
    /// Events produced before an error are delivered to the handler before
    /// the error is returned.
    pub fn parse_bytes(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        if self.failed {
            return Err(self.reuse_error());
        }
        let mut events = std::mem::take(&mut self.events);
        let mut result = Ok(());
        for &byte in bytes {
            let fed = self.feed_byte(byte, &mut events);
            let delivered = self.deliver(handler, &events);
            events.clear();
            if let Err(err) = fed.and(delivered) {
                result = Err(err);
                break;
            }
        }
        self.events = events;
        if let Err(err) = &result {
            if !self.failed {
                self.abort(err);
            }
            handler.handle_error(err);
        }
        result
    }

    /// Parses given XML text.
    pub fn parse_str(&mut self, handler: &mut impl SaxHandler, s: &str) -> Result<(), SaxError> {
        self.parse_bytes(handler, s.as_bytes())
    }

    /// Checks if the document is complete.
    ///
    /// A completed document should have a root tag and should not have any
    /// unfinished XML constructs, such as open comments, markup or a cut
    /// UTF-8 sequence.
    pub fn parse_finish(&mut self, handler: &mut impl SaxHandler) -> Result<(), SaxError> {
        if self.failed {
            return Err(self.reuse_error());
        }
        let result = self.finish_check();
        if let Err(err) = &result {
            self.abort(err);
            handler.handle_error(err);
        }
        result
    }

    /// Parses given XML bytes and checks if the document is complete.
    ///
    /// This is a convenience function which calls [parse_bytes()](SaxParser::parse_bytes)
    /// and [parse_finish()](SaxParser::parse_finish) methods for you.
    pub fn parse_bytes_finish(
        &mut self,
        handler: &mut impl SaxHandler,
        bytes: &[u8],
    ) -> Result<(), SaxError> {
        self.parse_bytes(handler, bytes)?;
        self.parse_finish(handler)
    }

    /// Returns a lazy iterator over the events of the given bytes.
    ///
    /// The bytes are parsed only as far as needed for the next event. The
    /// iterator stops after [SaxEvent::EndDocument], or after yielding a
    /// single [SaxEvent::Error] record.
    ///
    /// ```
    /// use streamsax::{SaxEvent, SaxParser};
    ///
    /// let mut parser = SaxParser::new();
    /// let names: Vec<&str> = parser
    ///     .events(b"<a><b/></a>")
    ///     .map(|event| event.name())
    ///     .collect();
    /// assert_eq!(names[0], "start_document");
    /// assert_eq!(names.last(), Some(&"end_document"));
    /// ```
    pub fn events<'p, 'b>(&'p mut self, bytes: &'b [u8]) -> SaxEvents<'p, 'b> {
        SaxEvents::new(self, bytes)
    }
}

impl Default for SaxParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
