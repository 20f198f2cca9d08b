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

/// A position in the parser input stream.
///
/// This struct is returned from the
/// [location()](crate::SaxParser::location) method and is carried by
/// every [SaxError](crate::SaxError). It gives you the position right
/// after the last consumed character, so for an error it points at the
/// offending character.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location {
    /// Byte position in the input stream.
    pub bytes: usize,
    /// Line number, starting from 1. Lines are separated by the newline character.
    pub line: usize,
    /// How many characters after the last newline character.
    pub column: usize,
}

impl Location {
    /// Creates a new location at the beginning of the input stream.
    ///
    /// This constructor is made public in case if you store the
    /// location in somewhere and need a default.
    pub fn new() -> Self {
        Location {
            bytes: 0,
            line: 1,
            column: 0,
        }
    }

    pub(crate) fn advance(&mut self, c: char) {
        self.bytes += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    pub(crate) fn skip(&mut self, c: char) {
        self.bytes += c.len_utf8();
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line: {}, column: {}, byte: {}",
            self.line, self.column, self.bytes
        )
    }
}
