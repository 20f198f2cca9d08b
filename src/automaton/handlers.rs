/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::State;
use super::is_name_char;
use super::is_name_start_char;
use crate::ParseContext;
use crate::SaxError;
use crate::SaxEvent;
use crate::entities;
use crate::parser::description;

type Transition = Result<(), SaxError>;

macro_rules! xml_error {
    ($cx:ident, $a:ident) => {
        return Err($cx.error(description::$a))
    };
}

// True if the memento followed by c spells the keyword, ignoring ASCII case.
fn spells(memento: &str, c: char, keyword: &str) -> bool {
    let mut buf = [0u8; 4];
    let tail = c.encode_utf8(&mut buf);
    memento.len() + tail.len() == keyword.len()
        && keyword[..memento.len()].eq_ignore_ascii_case(memento)
        && keyword[memento.len()..].eq_ignore_ascii_case(tail)
}

fn emit_start_element(cx: &mut ParseContext, events: &mut Vec<SaxEvent>) -> Transition {
    let Some(view) = cx.resolve_top() else {
        xml_error!(cx, ILLEGAL_STRUCTURE);
    };
    for mapping in view.prefix_mappings() {
        events.push(SaxEvent::StartPrefixMapping {
            prefix: mapping.prefix.clone(),
            uri: mapping.uri.clone(),
        });
    }
    events.push(SaxEvent::StartElement(view));
    Ok(())
}

// Pops the element closed by the end tag `qname` and finishes the
// document if it was the root.
fn close_element(cx: &mut ParseContext, qname: &str, events: &mut Vec<SaxEvent>) -> Transition {
    let Some(element) = cx.pop_element() else {
        return Err(cx.error(format!("{}, {}", description::ILLEGAL_STRUCTURE, qname)));
    };
    if element.qname() != qname {
        return Err(cx.error(format!(
            "{}, {} & {}",
            description::ILLEGAL_STRUCTURE,
            element.qname(),
            qname
        )));
    }
    let Some(view) = element.view().cloned() else {
        xml_error!(cx, ILLEGAL_STRUCTURE);
    };
    events.push(SaxEvent::EndElement(view.clone()));
    for mapping in view.prefix_mappings() {
        events.push(SaxEvent::EndPrefixMapping {
            prefix: mapping.prefix.clone(),
            uri: mapping.uri.clone(),
        });
    }
    if cx.depth() == 0 {
        events.push(SaxEvent::EndDocument);
        cx.set_state(State::AfterDocument);
    } else {
        cx.set_state(State::GeneralStuff);
    }
    Ok(())
}

fn new_attribute(cx: &mut ParseContext) -> Transition {
    let qname = cx.take_memento();
    let Some(element) = cx.peek_mut() else {
        xml_error!(cx, ILLEGAL_STRUCTURE);
    };
    element.new_attribute(qname);
    cx.set_state(State::AttributeEqual);
    Ok(())
}

pub(super) fn before_document(
    cx: &mut ParseContext,
    c: char,
    events: &mut Vec<SaxEvent>,
) -> Transition {
    match c {
        '<' => {
            events.push(SaxEvent::StartDocument);
            cx.set_state(State::FoundLt);
        }
        whitespace!() => (),
        _ => xml_error!(cx, NON_WHITESPACE_BEFORE_DOCUMENT),
    }
    Ok(())
}

pub(super) fn general_stuff(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        '<' => cx.set_state(State::FoundLt),
        // Only whitespace may appear between the prolog constructs
        whitespace!() if cx.depth() == 0 => (),
        _ if cx.depth() == 0 => xml_error!(cx, NON_WHITESPACE_BEFORE_DOCUMENT),
        _ => cx.append(c),
    }
    Ok(())
}

pub(super) fn found_lt(cx: &mut ParseContext, c: char, events: &mut Vec<SaxEvent>) -> Transition {
    if !cx.memento().is_empty() {
        let Some(element) = cx.current_view() else {
            xml_error!(cx, NON_WHITESPACE_BEFORE_DOCUMENT);
        };
        let content = entities::decode_string(cx.take_memento());
        events.push(SaxEvent::Text {
            content,
            element,
            cdata: false,
        });
    }
    match c {
        whitespace!() => (),
        '?' => cx.set_state(State::ProcInst),
        '!' => cx.set_state(State::SgmlDecl),
        '/' => cx.set_state(State::EndTag),
        _ if is_name_start_char(c) => {
            cx.append(c);
            cx.set_state(State::StartTag);
        }
        _ => xml_error!(cx, UNENCODED_LT),
    }
    Ok(())
}

pub(super) fn proc_inst(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        '?' => cx.set_state(State::ProcInstEnding),
        _ => cx.append(c),
    }
    Ok(())
}

pub(super) fn proc_inst_ending(
    cx: &mut ParseContext,
    c: char,
    events: &mut Vec<SaxEvent>,
) -> Transition {
    match c {
        '>' => {
            events.push(SaxEvent::ProcessingInstruction(cx.take_memento()));
            cx.set_state(State::GeneralStuff);
        }
        '?' => cx.append('?'),
        _ => {
            cx.append('?');
            cx.append(c);
            cx.set_state(State::ProcInst);
        }
    }
    Ok(())
}

pub(super) fn sgml_decl(cx: &mut ParseContext, c: char, events: &mut Vec<SaxEvent>) -> Transition {
    if spells(cx.memento(), c, "[CDATA[") {
        if cx.depth() == 0 {
            xml_error!(cx, CDATA_OUTSIDE_ROOT);
        }
        cx.clear_memento();
        cx.set_state(State::Cdata);
    } else if spells(cx.memento(), c, "--") {
        cx.clear_memento();
        cx.set_state(State::Comment);
    } else if spells(cx.memento(), c, "DOCTYPE") {
        if cx.depth() > 0 {
            xml_error!(cx, DOCTYPE_MISPLACED);
        }
        cx.clear_memento();
        cx.set_subset_depth(0);
        cx.set_state(State::Doctype);
    } else if c == '>' {
        events.push(SaxEvent::SgmlDeclaration(cx.take_memento()));
        cx.set_state(State::GeneralStuff);
    } else {
        cx.append(c);
    }
    Ok(())
}

pub(super) fn cdata(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        ']' => cx.set_state(State::CdataEnding),
        _ => cx.append(c),
    }
    Ok(())
}

pub(super) fn cdata_ending(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        ']' => cx.set_state(State::CdataEnding2),
        _ => {
            cx.append(']');
            cx.append(c);
            cx.set_state(State::Cdata);
        }
    }
    Ok(())
}

pub(super) fn cdata_ending2(
    cx: &mut ParseContext,
    c: char,
    events: &mut Vec<SaxEvent>,
) -> Transition {
    match c {
        '>' => {
            if !cx.memento().is_empty() {
                let Some(element) = cx.current_view() else {
                    xml_error!(cx, CDATA_OUTSIDE_ROOT);
                };
                events.push(SaxEvent::Text {
                    content: cx.take_memento(),
                    element,
                    cdata: true,
                });
            }
            cx.set_state(State::GeneralStuff);
        }
        ']' => cx.append(']'),
        _ => {
            cx.append_str("]]");
            cx.append(c);
            cx.set_state(State::Cdata);
        }
    }
    Ok(())
}

pub(super) fn comment(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        '-' => cx.set_state(State::CommentEnding),
        _ => cx.append(c),
    }
    Ok(())
}

pub(super) fn comment_ending(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        '-' => cx.set_state(State::CommentEnding2),
        _ => {
            cx.append('-');
            cx.append(c);
            cx.set_state(State::Comment);
        }
    }
    Ok(())
}

pub(super) fn comment_ending2(
    cx: &mut ParseContext,
    c: char,
    events: &mut Vec<SaxEvent>,
) -> Transition {
    match c {
        '>' => {
            let comment = cx.take_memento();
            if !comment.is_empty() {
                events.push(SaxEvent::Comment(comment));
            }
            cx.set_state(State::GeneralStuff);
        }
        '-' => cx.append('-'),
        _ => {
            cx.append_str("--");
            cx.append(c);
            cx.set_state(State::Comment);
        }
    }
    Ok(())
}

pub(super) fn doctype(cx: &mut ParseContext, c: char, events: &mut Vec<SaxEvent>) -> Transition {
    match c {
        '>' if cx.subset_depth() == 0 => {
            events.push(SaxEvent::Doctype(cx.take_memento()));
            cx.set_state(State::GeneralStuff);
        }
        '[' => {
            cx.set_subset_depth(cx.subset_depth() + 1);
            cx.append(c);
        }
        ']' => {
            cx.set_subset_depth(cx.subset_depth().saturating_sub(1));
            cx.append(c);
        }
        _ => cx.append(c),
    }
    Ok(())
}

pub(super) fn start_tag(cx: &mut ParseContext, c: char, events: &mut Vec<SaxEvent>) -> Transition {
    if is_name_char(c) {
        cx.append(c);
        return Ok(());
    }
    let qname = cx.take_memento();
    cx.new_element(qname);
    match c {
        '>' => {
            emit_start_element(cx, events)?;
            cx.set_state(State::GeneralStuff);
        }
        '/' => cx.set_state(State::EmptyElementTag),
        whitespace!() => cx.set_state(State::StartTagStuff),
        _ => xml_error!(cx, ELEMENT_NAME_INVALID_CHAR),
    }
    Ok(())
}

pub(super) fn start_tag_stuff(
    cx: &mut ParseContext,
    c: char,
    events: &mut Vec<SaxEvent>,
) -> Transition {
    match c {
        whitespace!() => (),
        '>' => {
            emit_start_element(cx, events)?;
            cx.set_state(State::GeneralStuff);
        }
        '/' => cx.set_state(State::EmptyElementTag),
        _ if is_name_start_char(c) => {
            cx.append(c);
            cx.set_state(State::AttributeName);
        }
        _ => xml_error!(cx, ATTRIBUTE_NAME_INVALID),
    }
    Ok(())
}

pub(super) fn empty_element_tag(
    cx: &mut ParseContext,
    c: char,
    events: &mut Vec<SaxEvent>,
) -> Transition {
    if c != '>' {
        xml_error!(cx, EMPTY_TAG_MISSING_END);
    }
    let Some(element) = cx.peek_mut() else {
        xml_error!(cx, ILLEGAL_STRUCTURE);
    };
    element.set_standalone();
    let qname = element.qname().to_string();
    emit_start_element(cx, events)?;
    close_element(cx, &qname, events)
}

pub(super) fn attribute_name(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        _ if is_name_char(c) => cx.append(c),
        whitespace!() => cx.set_state(State::AttributeNameSawWhite),
        '=' => new_attribute(cx)?,
        '>' => xml_error!(cx, ATTRIBUTE_WITHOUT_VALUE),
        _ => xml_error!(cx, ATTRIBUTE_NAME_INVALID),
    }
    Ok(())
}

pub(super) fn attribute_name_saw_white(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        '=' => new_attribute(cx)?,
        whitespace!() => (),
        _ => xml_error!(cx, ATTRIBUTE_WITHOUT_VALUE),
    }
    Ok(())
}

pub(super) fn attribute_equal(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        '"' | '\'' => {
            cx.set_quote(Some(c));
            cx.set_state(State::AttributeValueStart);
        }
        whitespace!() => (),
        _ => xml_error!(cx, ATTRIBUTE_UNQUOTED_VALUE),
    }
    Ok(())
}

pub(super) fn attribute_value_start(cx: &mut ParseContext, c: char) -> Transition {
    if cx.quote() != Some(c) {
        cx.append(c);
        return Ok(());
    }
    let value = entities::decode_string(cx.take_memento());
    let Some(attribute) = cx.peek_mut().and_then(|e| e.peek_attribute_mut()) else {
        xml_error!(cx, ATTRIBUTE_NAME_INVALID);
    };
    attribute.set_value(value);
    cx.set_quote(None);
    cx.set_state(State::AttributeValueEnd);
    Ok(())
}

pub(super) fn attribute_value_end(
    cx: &mut ParseContext,
    c: char,
    events: &mut Vec<SaxEvent>,
) -> Transition {
    match c {
        whitespace!() => cx.set_state(State::StartTagStuff),
        '/' => cx.set_state(State::EmptyElementTag),
        '>' => {
            emit_start_element(cx, events)?;
            cx.set_state(State::GeneralStuff);
        }
        _ => xml_error!(cx, ATTRIBUTE_NAME_INVALID),
    }
    Ok(())
}

pub(super) fn end_tag(cx: &mut ParseContext, c: char, events: &mut Vec<SaxEvent>) -> Transition {
    match c {
        _ if is_name_char(c) => cx.append(c),
        '>' => {
            let qname = cx.take_memento();
            close_element(cx, &qname, events)?;
        }
        whitespace!() => cx.set_state(State::EndTagSawWhite),
        _ => xml_error!(cx, ELEMENT_NAME_INVALID),
    }
    Ok(())
}

pub(super) fn end_tag_saw_white(
    cx: &mut ParseContext,
    c: char,
    events: &mut Vec<SaxEvent>,
) -> Transition {
    match c {
        '>' => {
            let qname = cx.take_memento();
            close_element(cx, &qname, events)?;
        }
        whitespace!() => (),
        _ => xml_error!(cx, END_TAG_INVALID_CHARS),
    }
    Ok(())
}

pub(super) fn after_document(cx: &mut ParseContext, c: char) -> Transition {
    match c {
        whitespace!() => (),
        _ => xml_error!(cx, NON_WHITESPACE_AFTER_DOCUMENT),
    }
    Ok(())
}
