/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// Default read size of the [PullParser](crate::PullParser).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Parser settings.
///
/// ```
/// use streamsax::ParserConfig;
///
/// let config = ParserConfig::default()
///     .with_scoped_namespaces(true)
///     .with_buffer_size(4096);
/// assert!(config.scoped_namespaces);
/// assert_eq!(config.buffer_size, 4096);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParserConfig {
    /// Restore the ancestor binding when an element which redeclared a
    /// namespace prefix is closed.
    ///
    /// When false, a redeclaration overwrites the binding and closing the
    /// redeclaring element removes the prefix altogether, even if an
    /// ancestor declared it first.
    pub scoped_namespaces: bool,

    /// Number of bytes read from the input at once by the reader based
    /// parsers. Zero is treated as one.
    pub buffer_size: usize,

    /// Skip a byte order mark at the start of the input.
    pub skip_bom: bool,
}

impl ParserConfig {
    pub fn new() -> Self {
        ParserConfig {
            scoped_namespaces: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            skip_bom: true,
        }
    }

    pub fn with_scoped_namespaces(mut self, scoped: bool) -> Self {
        self.scoped_namespaces = scoped;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn with_skip_bom(mut self, skip: bool) -> Self {
        self.skip_bom = skip;
        self
    }

    pub(crate) fn read_size(&self) -> usize {
        self.buffer_size.max(1)
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig::new()
    }
}
