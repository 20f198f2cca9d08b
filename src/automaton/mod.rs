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

use crate::ParseContext;
use crate::SaxError;
use crate::SaxEvent;

macro_rules! whitespace {
    () => {
        ' ' | '\t' | '\r' | '\n'
    };
}

mod handlers;

/// States of the tokenizer.
///
/// ```text
/// BeforeDocument
/// GeneralStuff
/// FoundLt                  <
/// ProcInst                 <?
/// ProcInstEnding           <? proc ?
/// SgmlDecl                 <!
/// Cdata                    <![CDATA[
/// CdataEnding              <![CDATA[ cdata ]
/// CdataEnding2             <![CDATA[ cdata ]]
/// Comment                  <!--
/// CommentEnding            <!-- comment -
/// CommentEnding2           <!-- comment --
/// Doctype                  <!DOCTYPE
/// StartTag                 <element
/// StartTagStuff            <element%20
/// EmptyElementTag          <element/
/// AttributeName            <element a
/// AttributeNameSawWhite    <element a%20
/// AttributeEqual           <element a=
/// AttributeValueStart      <element a="
/// AttributeValueEnd        <element a="value"
/// EndTag                   </element
/// EndTagSawWhite           </element%20
/// AfterDocument
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    BeforeDocument,
    GeneralStuff,
    FoundLt,
    ProcInst,
    ProcInstEnding,
    SgmlDecl,
    Cdata,
    CdataEnding,
    CdataEnding2,
    Comment,
    CommentEnding,
    CommentEnding2,
    Doctype,
    StartTag,
    StartTagStuff,
    EmptyElementTag,
    AttributeName,
    AttributeNameSawWhite,
    AttributeEqual,
    AttributeValueStart,
    AttributeValueEnd,
    EndTag,
    EndTagSawWhite,
    AfterDocument,
}

impl State {
    pub fn name(self) -> &'static str {
        match self {
            State::BeforeDocument => "BEFORE_DOCUMENT",
            State::GeneralStuff => "GENERAL_STUFF",
            State::FoundLt => "FOUND_LT",
            State::ProcInst => "PROC_INST",
            State::ProcInstEnding => "PROC_INST_ENDING",
            State::SgmlDecl => "SGML_DECL",
            State::Cdata => "CDATA",
            State::CdataEnding => "CDATA_ENDING",
            State::CdataEnding2 => "CDATA_ENDING_2",
            State::Comment => "COMMENT",
            State::CommentEnding => "COMMENT_ENDING",
            State::CommentEnding2 => "COMMENT_ENDING_2",
            State::Doctype => "DOCTYPE",
            State::StartTag => "START_TAG",
            State::StartTagStuff => "START_TAG_STUFF",
            State::EmptyElementTag => "EMPTY_ELEMENT_TAG",
            State::AttributeName => "ATTRIBUTE_NAME",
            State::AttributeNameSawWhite => "ATTRIBUTE_NAME_SAW_WHITE",
            State::AttributeEqual => "ATTRIBUTE_EQUAL",
            State::AttributeValueStart => "ATTRIBUTE_VALUE_START",
            State::AttributeValueEnd => "ATTRIBUTE_VALUE_END",
            State::EndTag => "END_TAG",
            State::EndTagSawWhite => "END_TAG_SAW_WHITE",
            State::AfterDocument => "AFTER_DOCUMENT",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | '_' | 'A'..='Z' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

pub(crate) fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}'
        )
}

/// Consumes one character.
///
/// The position of the context is advanced first, so an error points
/// right after the offending character. Produced events are appended to
/// `events`. After an error the context is left in an undefined state and
/// must be [reset](ParseContext::reset).
pub fn step(cx: &mut ParseContext, c: char, events: &mut Vec<SaxEvent>) -> Result<(), SaxError> {
    cx.advance(c);
    match cx.state() {
        State::BeforeDocument => handlers::before_document(cx, c, events),
        State::GeneralStuff => handlers::general_stuff(cx, c),
        State::FoundLt => handlers::found_lt(cx, c, events),
        State::ProcInst => handlers::proc_inst(cx, c),
        State::ProcInstEnding => handlers::proc_inst_ending(cx, c, events),
        State::SgmlDecl => handlers::sgml_decl(cx, c, events),
        State::Cdata => handlers::cdata(cx, c),
        State::CdataEnding => handlers::cdata_ending(cx, c),
        State::CdataEnding2 => handlers::cdata_ending2(cx, c, events),
        State::Comment => handlers::comment(cx, c),
        State::CommentEnding => handlers::comment_ending(cx, c),
        State::CommentEnding2 => handlers::comment_ending2(cx, c, events),
        State::Doctype => handlers::doctype(cx, c, events),
        State::StartTag => handlers::start_tag(cx, c, events),
        State::StartTagStuff => handlers::start_tag_stuff(cx, c, events),
        State::EmptyElementTag => handlers::empty_element_tag(cx, c, events),
        State::AttributeName => handlers::attribute_name(cx, c),
        State::AttributeNameSawWhite => handlers::attribute_name_saw_white(cx, c),
        State::AttributeEqual => handlers::attribute_equal(cx, c),
        State::AttributeValueStart => handlers::attribute_value_start(cx, c),
        State::AttributeValueEnd => handlers::attribute_value_end(cx, c, events),
        State::EndTag => handlers::end_tag(cx, c, events),
        State::EndTagSawWhite => handlers::end_tag_saw_white(cx, c, events),
        State::AfterDocument => handlers::after_document(cx, c),
    }
}
