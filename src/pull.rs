/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::io::Read;

use log::debug;

use crate::Location;
use crate::ParserConfig;
use crate::SaxError;
use crate::SaxEvent;
use crate::SaxParser;

// Events waiting to be yielded, shared by both pull iterators.
#[derive(Debug, Default)]
struct Pending {
    queue: VecDeque<SaxEvent>,
    scratch: Vec<SaxEvent>,
    done: bool,
}

impl Pending {
    fn pop(&mut self) -> Option<SaxEvent> {
        let event = self.queue.pop_front()?;
        if event.is_terminal() {
            self.done = true;
            self.queue.clear();
        }
        Some(event)
    }

    fn feed(&mut self, parser: &mut SaxParser, byte: u8) {
        let result = parser.feed_byte(byte, &mut self.scratch);
        self.queue.extend(self.scratch.drain(..));
        if let Err(err) = result {
            self.queue.push_back(SaxEvent::Error(err));
        }
    }

    fn finish(&mut self, parser: &mut SaxParser) {
        match parser.finish_check() {
            Ok(()) => self.done = true,
            Err(err) => {
                if !parser.is_failed() {
                    parser.abort(&err);
                }
                self.queue.push_back(SaxEvent::Error(err));
            }
        }
    }

    fn fail(&mut self, parser: &mut SaxParser, err: SaxError) {
        parser.abort(&err);
        self.queue.push_back(SaxEvent::Error(err));
    }
}

/// Lazy iterator over the events of an in-memory byte slice.
///
/// Created by [SaxParser::events()](crate::SaxParser::events). Dropping the
/// iterator stops the parsing, the parser keeps its state.
#[derive(Debug)]
pub struct SaxEvents<'p, 'b> {
    parser: &'p mut SaxParser,
    bytes: &'b [u8],
    pos: usize,
    pending: Pending,
}

impl<'p, 'b> SaxEvents<'p, 'b> {
    pub(crate) fn new(parser: &'p mut SaxParser, bytes: &'b [u8]) -> Self {
        SaxEvents {
            parser,
            bytes,
            pos: 0,
            pending: Pending::default(),
        }
    }

    /// Position right after the last consumed character.
    pub fn location(&self) -> Location {
        self.parser.location()
    }
}

impl Iterator for SaxEvents<'_, '_> {
    type Item = SaxEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop() {
                return Some(event);
            }
            if self.pending.done {
                return None;
            }
            match self.bytes.get(self.pos) {
                Some(&byte) => {
                    self.pos += 1;
                    self.pending.feed(self.parser, byte);
                }
                None => self.pending.finish(self.parser),
            }
        }
    }
}

/// Lazy iterator over the events of a reader.
///
/// The reader is consumed in blocks of
/// [buffer_size](crate::ParserConfig::buffer_size) bytes, only as far as
/// needed for the next event. Read failures end the iteration with a
/// [SaxError::Io] record.
///
/// ```
/// use streamsax::{PullParser, SaxEvent};
///
/// let xml = "<feed><entry>a</entry><entry>b</entry></feed>";
/// let texts: Vec<String> = PullParser::new(xml.as_bytes())
///     .filter_map(|event| match event {
///         SaxEvent::Text { content, .. } => Some(content),
///         _ => None,
///     })
///     .collect();
/// assert_eq!(texts, ["a", "b"]);
/// ```
#[derive(Debug)]
pub struct PullParser<R: Read> {
    reader: R,
    parser: SaxParser,
    buffer: Vec<u8>,
    pos: usize,
    len: usize,
    pending: Pending,
}

impl<R: Read> PullParser<R> {
    pub fn new(reader: R) -> Self {
        PullParser::with_config(reader, ParserConfig::default())
    }

    pub fn with_config(reader: R, config: ParserConfig) -> Self {
        PullParser {
            reader,
            buffer: vec![0u8; config.read_size()],
            parser: SaxParser::with_config(config),
            pos: 0,
            len: 0,
            pending: Pending::default(),
        }
    }

    /// Position right after the last consumed character.
    pub fn location(&self) -> Location {
        self.parser.location()
    }

    pub fn parser(&self) -> &SaxParser {
        &self.parser
    }

    /// Gives the reader back, unread buffered bytes are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) {
        loop {
            match self.reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.pending.finish(&mut self.parser);
                    return;
                }
                Ok(len) => {
                    self.pos = 0;
                    self.len = len;
                    return;
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!("read failed: {}", err);
                    let err = SaxError::io(&err, self.parser.location());
                    self.pending.fail(&mut self.parser, err);
                    return;
                }
            }
        }
    }
}

impl<R: Read> Iterator for PullParser<R> {
    type Item = SaxEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop() {
                return Some(event);
            }
            if self.pending.done {
                return None;
            }
            if self.pos < self.len {
                let byte = self.buffer[self.pos];
                self.pos += 1;
                self.pending.feed(&mut self.parser, byte);
            } else {
                self.fill();
            }
        }
    }
}
