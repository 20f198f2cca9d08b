/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::ElementView;
use crate::SaxError;
use crate::SaxEvent;
use crate::SaxHandler;
use crate::SaxHandlerError;

type ListenerResult = Result<(), SaxHandlerError>;

type NoArgFn<'a> = Box<dyn FnMut() -> ListenerResult + 'a>;
type ContentFn<'a> = Box<dyn FnMut(&str) -> ListenerResult + 'a>;
type MappingFn<'a> = Box<dyn FnMut(&str, &str) -> ListenerResult + 'a>;
type ElementFn<'a> = Box<dyn FnMut(&ElementView) -> ListenerResult + 'a>;
type TextFn<'a> = Box<dyn FnMut(&str, &ElementView, bool) -> ListenerResult + 'a>;
type ErrorFn<'a> = Box<dyn FnMut(&SaxError) + 'a>;

/// A [SaxHandler] which dispatches every event kind to its own callbacks.
///
/// Any number of callbacks can be registered for an event kind, they are
/// called in registration order. Events without a callback are ignored.
///
/// ```
/// use streamsax::{SaxListeners, SaxParser};
///
/// let mut names = Vec::new();
/// let mut text = String::new();
/// {
///     let mut listeners = SaxListeners::new()
///         .on_start_element(|element| {
///             names.push(element.qname().to_string());
///             Ok(())
///         })
///         .on_text(|content, _element, _cdata| {
///             text.push_str(content);
///             Ok(())
///         });
///     let mut parser = SaxParser::new();
///     parser
///         .parse_str(&mut listeners, "<p>Hello <b>world</b></p>")
///         .unwrap();
/// }
/// assert_eq!(names, ["p", "b"]);
/// assert_eq!(text, "Hello world");
/// ```
#[derive(Default)]
pub struct SaxListeners<'a> {
    start_document: Vec<NoArgFn<'a>>,
    processing_instruction: Vec<ContentFn<'a>>,
    sgml_declaration: Vec<ContentFn<'a>>,
    doctype: Vec<ContentFn<'a>>,
    start_prefix_mapping: Vec<MappingFn<'a>>,
    start_element: Vec<ElementFn<'a>>,
    text: Vec<TextFn<'a>>,
    comment: Vec<ContentFn<'a>>,
    end_element: Vec<ElementFn<'a>>,
    end_prefix_mapping: Vec<MappingFn<'a>>,
    end_document: Vec<NoArgFn<'a>>,
    error: Vec<ErrorFn<'a>>,
}

impl<'a> SaxListeners<'a> {
    pub fn new() -> Self {
        SaxListeners::default()
    }

    pub fn on_start_document(mut self, f: impl FnMut() -> ListenerResult + 'a) -> Self {
        self.start_document.push(Box::new(f));
        self
    }

    pub fn on_processing_instruction(mut self, f: impl FnMut(&str) -> ListenerResult + 'a) -> Self {
        self.processing_instruction.push(Box::new(f));
        self
    }

    pub fn on_sgml_declaration(mut self, f: impl FnMut(&str) -> ListenerResult + 'a) -> Self {
        self.sgml_declaration.push(Box::new(f));
        self
    }

    pub fn on_doctype(mut self, f: impl FnMut(&str) -> ListenerResult + 'a) -> Self {
        self.doctype.push(Box::new(f));
        self
    }

    /// Callback receives the prefix and the URI.
    pub fn on_start_prefix_mapping(
        mut self,
        f: impl FnMut(&str, &str) -> ListenerResult + 'a,
    ) -> Self {
        self.start_prefix_mapping.push(Box::new(f));
        self
    }

    pub fn on_start_element(mut self, f: impl FnMut(&ElementView) -> ListenerResult + 'a) -> Self {
        self.start_element.push(Box::new(f));
        self
    }

    /// Callback receives the content, the enclosing element and the CDATA flag.
    pub fn on_text(
        mut self,
        f: impl FnMut(&str, &ElementView, bool) -> ListenerResult + 'a,
    ) -> Self {
        self.text.push(Box::new(f));
        self
    }

    pub fn on_comment(mut self, f: impl FnMut(&str) -> ListenerResult + 'a) -> Self {
        self.comment.push(Box::new(f));
        self
    }

    pub fn on_end_element(mut self, f: impl FnMut(&ElementView) -> ListenerResult + 'a) -> Self {
        self.end_element.push(Box::new(f));
        self
    }

    pub fn on_end_prefix_mapping(
        mut self,
        f: impl FnMut(&str, &str) -> ListenerResult + 'a,
    ) -> Self {
        self.end_prefix_mapping.push(Box::new(f));
        self
    }

    pub fn on_end_document(mut self, f: impl FnMut() -> ListenerResult + 'a) -> Self {
        self.end_document.push(Box::new(f));
        self
    }

    /// Called with the error which stopped the parsing.
    pub fn on_error(mut self, f: impl FnMut(&SaxError) + 'a) -> Self {
        self.error.push(Box::new(f));
        self
    }
}

impl SaxHandler for SaxListeners<'_> {
    fn handle_event(&mut self, event: &SaxEvent) -> Result<(), SaxHandlerError> {
        match event {
            SaxEvent::StartDocument => self.start_document.iter_mut().try_for_each(|f| f()),
            SaxEvent::ProcessingInstruction(content) => self
                .processing_instruction
                .iter_mut()
                .try_for_each(|f| f(content.as_str())),
            SaxEvent::SgmlDeclaration(content) => self
                .sgml_declaration
                .iter_mut()
                .try_for_each(|f| f(content.as_str())),
            SaxEvent::Doctype(content) => self.doctype.iter_mut().try_for_each(|f| f(content.as_str())),
            SaxEvent::StartPrefixMapping { prefix, uri } => self
                .start_prefix_mapping
                .iter_mut()
                .try_for_each(|f| f(prefix.as_str(), uri.as_str())),
            SaxEvent::StartElement(element) => self
                .start_element
                .iter_mut()
                .try_for_each(|f| f(element)),
            SaxEvent::Text {
                content,
                element,
                cdata,
            } => self
                .text
                .iter_mut()
                .try_for_each(|f| f(content.as_str(), element, *cdata)),
            SaxEvent::Comment(content) => self.comment.iter_mut().try_for_each(|f| f(content.as_str())),
            SaxEvent::EndElement(element) => {
                self.end_element.iter_mut().try_for_each(|f| f(element))
            }
            SaxEvent::EndPrefixMapping { prefix, uri } => self
                .end_prefix_mapping
                .iter_mut()
                .try_for_each(|f| f(prefix.as_str(), uri.as_str())),
            SaxEvent::EndDocument => self.end_document.iter_mut().try_for_each(|f| f()),
            SaxEvent::Error(err) => {
                self.handle_error(err);
                Ok(())
            }
        }
    }

    fn handle_error(&mut self, error: &SaxError) {
        for f in self.error.iter_mut() {
            f(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::SaxParser;

    #[test]
    fn dispatch_order() {
        let log = RefCell::new(Vec::new());
        let mut listeners = SaxListeners::new()
            .on_start_document(|| {
                log.borrow_mut().push("start_document".to_string());
                Ok(())
            })
            .on_processing_instruction(|pi| {
                log.borrow_mut().push(format!("pi {}", pi));
                Ok(())
            })
            .on_doctype(|doctype| {
                log.borrow_mut().push(format!("doctype{}", doctype));
                Ok(())
            })
            .on_start_prefix_mapping(|prefix, uri| {
                log.borrow_mut().push(format!("map {}={}", prefix, uri));
                Ok(())
            })
            .on_start_element(|element| {
                log.borrow_mut().push(format!("<{}>", element.qname()));
                Ok(())
            })
            .on_start_element(|element| {
                log.borrow_mut().push(format!("again <{}>", element.local_part()));
                Ok(())
            })
            .on_text(|content, element, cdata| {
                log.borrow_mut()
                    .push(format!("text {} in {} {}", content, element.qname(), cdata));
                Ok(())
            })
            .on_comment(|comment| {
                log.borrow_mut().push(format!("comment {}", comment));
                Ok(())
            })
            .on_end_element(|element| {
                log.borrow_mut().push(format!("</{}>", element.qname()));
                Ok(())
            })
            .on_end_prefix_mapping(|prefix, _uri| {
                log.borrow_mut().push(format!("unmap {}", prefix));
                Ok(())
            })
            .on_end_document(|| {
                log.borrow_mut().push("end_document".to_string());
                Ok(())
            });
        let mut parser = SaxParser::new();
        parser
            .parse_bytes_finish(
                &mut listeners,
                b"<?pi x?><!DOCTYPE d><d:r xmlns:d='urn:d'><!--c--><![CDATA[<>]]></d:r>",
            )
            .unwrap();
        drop(listeners);
        assert_eq!(
            log.into_inner(),
            [
                "start_document",
                "pi pi x",
                "doctype d",
                "map d=urn:d",
                "<d:r>",
                "again <r>",
                "comment c",
                "text <> in d:r true",
                "</d:r>",
                "unmap d",
                "end_document",
            ]
        );
    }

    #[test]
    fn abort_and_error() {
        let mut seen = 0;
        let mut error = None;
        {
            let mut listeners = SaxListeners::new()
                .on_start_element(|element| {
                    seen += 1;
                    if element.qname() == "stop" {
                        Err(SaxHandlerError::Abort)
                    } else {
                        Ok(())
                    }
                })
                .on_error(|err| error = Some(err.clone()));
            let mut parser = SaxParser::new();
            let result = parser.parse_str(&mut listeners, "<a><stop/><b/></a>");
            assert!(matches!(result, Err(SaxError::HandlerAbort { .. })));
        }
        assert_eq!(seen, 2);
        assert!(matches!(error, Some(SaxError::HandlerAbort { .. })));
    }
}
