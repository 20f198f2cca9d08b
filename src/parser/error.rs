/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::borrow::Cow;
use std::fmt::Display;

use super::Location;

/// Error which happened during the XML SAX parsing.
///
/// These categories are designed to be as few as possible and correspond to the distinct
/// actions the caller might take based on the problem. Every error carries the
/// [Location] where it was detected. None of them are recoverable, the parser must be
/// [reset](super::SaxParser::reset) before it can be used again.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SaxError {
    /// A syntax error is encountered in the XML input.
    ///
    /// Typical action is telling the message and the location to the user so they can
    /// fix the document.
    BadXml {
        message: Cow<'static, str>,
        location: Location,
    },

    /// Handler function returned [SaxHandlerError::Abort].
    ///
    /// This is intended for caller's handler to be able to abort the processing while
    /// signalling to the caller that the interruption is not caused by the parser itself.
    HandlerAbort { location: Location },

    /// Reading the input failed.
    ///
    /// Only the reader based [PullParser](crate::PullParser) produces this.
    Io {
        kind: std::io::ErrorKind,
        message: String,
        location: Location,
    },
}

impl SaxError {
    pub(crate) fn bad_xml(message: impl Into<Cow<'static, str>>, location: Location) -> Self {
        SaxError::BadXml {
            message: message.into(),
            location,
        }
    }

    pub(crate) fn io(err: &std::io::Error, location: Location) -> Self {
        SaxError::Io {
            kind: err.kind(),
            message: err.to_string(),
            location,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            SaxError::BadXml { message, .. } => message.as_ref(),
            SaxError::HandlerAbort { .. } => description::HANDLER_ABORT,
            SaxError::Io { message, .. } => message.as_str(),
        }
    }

    pub fn location(&self) -> Location {
        match self {
            SaxError::BadXml { location, .. } => *location,
            SaxError::HandlerAbort { location } => *location,
            SaxError::Io { location, .. } => *location,
        }
    }

    /// Line of the error, starting from 1.
    pub fn line(&self) -> usize {
        self.location().line
    }

    /// Column of the error, reset to 0 on every new line.
    pub fn column(&self) -> usize {
        self.location().column
    }
}

impl Display for SaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaxError::BadXml { message, location } => {
                write!(f, "invalid xml syntax at {}: {}", location, message)
            }
            SaxError::HandlerAbort { location } => {
                write!(f, "{} at {}", description::HANDLER_ABORT, location)
            }
            SaxError::Io { message, location, .. } => {
                write!(f, "read error at {}: {}", location, message)
            }
        }
    }
}

impl std::error::Error for SaxError {}

/// Error type for the [SaxHandler](super::SaxHandler) functions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SaxHandlerError {
    /// Stop parsing, the parser returns [SaxError::HandlerAbort].
    Abort,
}

impl Display for SaxHandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaxHandlerError::Abort => write!(f, "handler requested abort"),
        }
    }
}

impl std::error::Error for SaxHandlerError {}

pub(crate) mod description {
    pub(crate) const PARSER_REUSE_WITHOUT_RESET: &str =
        "Cannot continue after an error without a reset";
    pub(crate) const HANDLER_ABORT: &str = "Handler aborted the parsing";
    pub(crate) const UTF8_INVALID_CONT_BYTE: &str = "Invalid UTF-8 continuation byte";
    pub(crate) const UTF8_OVERLONG_SEQUENCE: &str = "Overlong UTF-8 sequence";
    pub(crate) const UTF8_INVALID_PREFIX_BYTE: &str = "Invalid UTF-8 prefix byte";
    pub(crate) const UTF8_INCOMPLETE: &str = "Incomplete UTF-8 sequence at the end of input";
    pub(crate) const CHAR_INVALID: &str = "Invalid XML character";
    pub(crate) const DOC_NO_CONTENT: &str = "Document has no root element";
    pub(crate) const DOC_OPEN_TAGS: &str = "Document has unclosed tags";
    pub(crate) const DOC_OPEN_MARKUP: &str = "Document ends inside markup";
    pub(crate) const NON_WHITESPACE_BEFORE_DOCUMENT: &str = "Non-whitespace before document.";
    pub(crate) const NON_WHITESPACE_AFTER_DOCUMENT: &str = "Non-whitespace after document.";
    pub(crate) const UNENCODED_LT: &str = "Unencoded <";
    pub(crate) const CDATA_OUTSIDE_ROOT: &str = "CDATA section outside of root element";
    pub(crate) const DOCTYPE_MISPLACED: &str = "Inappropriately located doctype declaration";
    pub(crate) const ELEMENT_NAME_INVALID_CHAR: &str = "Invalid character in element name";
    pub(crate) const ELEMENT_NAME_INVALID: &str = "Invalid element name";
    pub(crate) const ATTRIBUTE_NAME_INVALID: &str = "Invalid attribute name";
    pub(crate) const ATTRIBUTE_WITHOUT_VALUE: &str = "Attribute without value";
    pub(crate) const ATTRIBUTE_UNQUOTED_VALUE: &str = "Unquoted attribute value";
    pub(crate) const EMPTY_TAG_MISSING_END: &str = "Forward-slash in start-tag not followed by >";
    pub(crate) const END_TAG_INVALID_CHARS: &str = "Invalid characters in end-tag";
    pub(crate) const ILLEGAL_STRUCTURE: &str = "Illegal element structure";
}
