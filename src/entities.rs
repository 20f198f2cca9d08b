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

use memchr::memchr;

pub mod predefined {
    pub const AMP: &str = "&amp;";
    pub const GT: &str = "&gt;";
    pub const LT: &str = "&lt;";
    pub const QUOT: &str = "&quot;";
    pub const APOS: &str = "&apos;";
}

// Replacement order matters, each pass runs over the output of the previous one.
const REPLACEMENTS: [(&str, &str); 5] = [
    (predefined::AMP, "&"),
    (predefined::GT, ">"),
    (predefined::LT, "<"),
    (predefined::QUOT, "\""),
    (predefined::APOS, "'"),
];

fn has_reference(s: &str) -> bool {
    memchr(b'&', s.as_bytes()).is_some()
}

/// Replaces the five predefined XML entity references.
///
/// Character references and custom entities are not recognized and are
/// passed through literally. Text without any `&` is returned borrowed.
///
/// ```
/// use streamsax::entities::decode;
///
/// assert_eq!(decode("john&amp;mary"), "john&mary");
/// assert_eq!(decode("&#65;&custom;"), "&#65;&custom;");
/// ```
pub fn decode(text: &str) -> Cow<'_, str> {
    let mut decoded = Cow::Borrowed(text);
    for (entity, replacement) in REPLACEMENTS {
        if !has_reference(&decoded) {
            break;
        }
        if decoded.contains(entity) {
            decoded = Cow::Owned(decoded.replace(entity, replacement));
        }
    }
    decoded
}

/// Same as [decode()] but consumes the buffer and reuses it when nothing
/// needs to be replaced.
pub fn decode_string(text: String) -> String {
    if !has_reference(&text) {
        return text;
    }
    decode(&text).into_owned()
}
