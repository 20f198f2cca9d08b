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

/// Prefix of the namespace declaration attributes.
pub const XMLNS: &str = "xmlns";

/// Namespace URI bound to the `xml` prefix by definition.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// A name of the form `prefix:localPart` or a bare `localPart`.
///
/// The name is split on the first colon. A name without any colon has
/// an empty prefix, with the single exception of the bare `xmlns`
/// attribute name, which is treated as prefix `xmlns` with an empty
/// local part so that default namespace declarations can be handled
/// like the prefixed ones.
///
/// ```
/// use streamsax::QualifiedName;
///
/// let name = QualifiedName::new("atom:link");
/// assert_eq!(name.prefix(), "atom");
/// assert_eq!(name.local_part(), "link");
///
/// let name = QualifiedName::new("xmlns");
/// assert_eq!(name.prefix(), "xmlns");
/// assert_eq!(name.local_part(), "");
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct QualifiedName {
    qname: String,
    prefix_len: usize,
    local_start: usize,
}

impl QualifiedName {
    pub fn new(qname: impl Into<String>) -> Self {
        let qname = qname.into();
        let (prefix_len, local_start) = if qname == XMLNS {
            (XMLNS.len(), XMLNS.len())
        } else {
            match qname.find(':') {
                Some(pos) => (pos, pos + 1),
                None => (0, 0),
            }
        };
        QualifiedName {
            qname,
            prefix_len,
            local_start,
        }
    }

    /// The full name as it appeared in the document.
    pub fn as_str(&self) -> &str {
        &self.qname
    }

    pub fn prefix(&self) -> &str {
        &self.qname[..self.prefix_len]
    }

    pub fn local_part(&self) -> &str {
        &self.qname[self.local_start..]
    }

    pub fn has_prefix(&self) -> bool {
        self.prefix_len > 0
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.qname)
    }
}

impl PartialEq<str> for QualifiedName {
    fn eq(&self, other: &str) -> bool {
        self.qname == other
    }
}

impl PartialEq<&str> for QualifiedName {
    fn eq(&self, other: &&str) -> bool {
        self.qname == *other
    }
}
