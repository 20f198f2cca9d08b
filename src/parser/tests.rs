/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::*;
use crate::ElementView;

struct Tester<'a> {
    expected: &'a [&'a str],
    config: ParserConfig,
    events: Vec<String>,
}

impl<'a> Tester<'a> {
    fn new(expected: &'a [&'a str]) -> Tester<'a> {
        Tester::with_config(expected, ParserConfig::default())
    }

    fn with_config(expected: &'a [&'a str], config: ParserConfig) -> Tester<'a> {
        Tester {
            expected,
            config,
            events: Vec::new(),
        }
    }

    fn check(&mut self, s: &str) {
        let nr_lines = s.matches('\n').count() + 1;
        let nr_column = s.rsplit('\n').next().unwrap().chars().count();

        let mut parser = SaxParser::with_config(self.config);
        parser.parse_bytes_finish(self, s.as_bytes()).unwrap();
        assert_eq!(self.events, self.expected);
        assert!(parser.is_finished());
        assert_eq!(parser.location().line, nr_lines);
        assert_eq!(parser.location().column, nr_column);
        assert_eq!(parser.location().bytes, s.len());

        // now try byte by byte
        parser.reset();
        self.events.clear();
        for i in 0..s.len() {
            parser.parse_bytes(self, &s.as_bytes()[i..i + 1]).unwrap();
        }
        parser.parse_finish(self).unwrap();
        assert_eq!(self.events, self.expected);
        assert_eq!(parser.location().line, nr_lines);
        assert_eq!(parser.location().column, nr_column);
        assert_eq!(parser.location().bytes, s.len());
    }
}

impl SaxHandler for Tester<'_> {
    fn handle_event(&mut self, event: &SaxEvent) -> Result<(), SaxHandlerError> {
        self.events.push(event.to_string());
        Ok(())
    }
}

struct BadTester {
    bad_offset: usize,
    message: &'static str,
    errors_seen: usize,
}

impl BadTester {
    fn new(bad_offset: usize, message: &'static str) -> BadTester {
        BadTester {
            bad_offset,
            message,
            errors_seen: 0,
        }
    }

    fn verify(&mut self, err: SaxError) {
        assert_eq!(err.message(), self.message);
        assert_eq!(err.location().bytes, self.bad_offset);
        assert_eq!(self.errors_seen, 1);
        self.errors_seen = 0;
    }

    fn check(&mut self, s: &str) {
        self.check_bytes(s.as_bytes());
    }

    fn check_bytes(&mut self, bytes: &[u8]) {
        let mut parser = SaxParser::new();
        let err = parser.parse_bytes_finish(self, bytes).unwrap_err();
        self.verify(err);

        parser.reset();
        let mut result = Ok(());
        for i in 0..bytes.len() {
            result = parser.parse_bytes(self, &bytes[i..i + 1]);
            if result.is_err() {
                break;
            }
        }
        let err = match result {
            Ok(()) => parser.parse_finish(self).unwrap_err(),
            Err(err) => err,
        };
        self.verify(err);
    }
}

impl SaxHandler for BadTester {
    fn handle_event(&mut self, _event: &SaxEvent) -> Result<(), SaxHandlerError> {
        Ok(())
    }

    fn handle_error(&mut self, _error: &SaxError) {
        self.errors_seen += 1;
    }
}

fn sink(_event: &SaxEvent) -> Result<(), SaxHandlerError> {
    Ok(())
}

fn collect(s: &str) -> Vec<SaxEvent> {
    let mut events = Vec::new();
    let mut parser = SaxParser::new();
    parser
        .parse_bytes_finish(
            &mut |event: &SaxEvent| -> Result<(), SaxHandlerError> {
                events.push(event.clone());
                Ok(())
            },
            s.as_bytes(),
        )
        .unwrap();
    events
}

fn start_elements(s: &str) -> Vec<ElementView> {
    collect(s)
        .into_iter()
        .filter_map(|event| match event {
            SaxEvent::StartElement(element) => Some(element),
            _ => None,
        })
        .collect()
}

#[test]
fn tags() {
    Tester::new(&[
        "start_document",
        "start_element(lonely, standalone)",
        "end_element(lonely)",
        "end_document",
    ])
    .check("<lonely/>");

    Tester::new(&[
        "start_document",
        "start_element(lonely, standalone)",
        "end_element(lonely)",
        "end_document",
    ])
    .check("   <lonely/>    ");

    Tester::new(&[
        "start_document",
        "processing_instruction(\"xml version='1.0'\")",
        "start_element(parent)",
        "start_element(child, standalone)",
        "end_element(child)",
        "start_element(child, standalone)",
        "end_element(child)",
        "text(\"child\", parent)",
        "end_element(parent)",
        "end_document",
    ])
    .check("<?xml version='1.0'?><parent><child/><child/>child</parent>");

    Tester::new(&[
        "start_document",
        "start_element(parent)",
        "start_element(empty, standalone)",
        "end_element(empty)",
        "start_element(b)",
        "text(\"lala\", b)",
        "end_element(b)",
        "end_element(parent)",
        "end_document",
    ])
    .check("<parent  ><empty \t /><b>lala</b \n></parent>");

    Tester::new(&[
        "start_document",
        "start_element(a)",
        "start_element(b, standalone)",
        "end_element(b)",
        "start_element(c, standalone)",
        "end_element(c)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a><b x1 ='lala'/><c x2\t= \t'bibi'/></a>");

    Tester::new(&[
        "start_document",
        "start_element(tag)",
        "start_element(sub)",
        "end_element(sub)",
        "end_element(tag)",
        "end_document",
    ])
    .check("<tag a  =  '1' b  ='2' c=  '3' d='4'   e='5' f='6' g='7' id='xyz9'><sub></sub></tag>");

    Tester::new(&[
        "start_document",
        "start_element(a)",
        "start_element(b)",
        "text(\"john&mary\", b)",
        "start_element(c)",
        "start_element(d, standalone)",
        "end_element(d)",
        "end_element(c)",
        "end_element(b)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a><b>john&amp;mary<c><d e='f' g='123456' h='madcat' klm='nop'/></c></b></a>");
}

#[test]
fn loose_lt() {
    Tester::new(&[
        "start_document",
        "start_element(a)",
        "start_element(b, standalone)",
        "end_element(b)",
        "end_element(a)",
        "end_document",
    ])
    .check("< a>< b/></a>");
}

#[test]
fn attributes() {
    let elements = start_elements("<a><b x1 ='lala'/><c x2\t= \t'bibi' x3=\"\"/></a>");
    let b = &elements[1];
    assert_eq!(b.attributes().len(), 1);
    assert_eq!(b.attribute("x1").unwrap().value(), "lala");
    let c = &elements[2];
    assert_eq!(c.attribute("x2").unwrap().value(), "bibi");
    assert_eq!(c.attribute("x3").unwrap().value(), "");
    assert_eq!(c.parent().unwrap().qname(), "a");

    let elements = start_elements("<tag a='12\"34' b=\"123'456\" />");
    assert_eq!(elements[0].attribute("a").unwrap().value(), "12\"34");
    assert_eq!(elements[0].attribute("b").unwrap().value(), "123'456");

    let elements = start_elements("<tag a  =  '1' b  ='2' c=  '3' id='xyz9'></tag>");
    let names: Vec<&str> = elements[0].attributes().iter().map(|a| a.qname()).collect();
    assert_eq!(names, ["a", "b", "c", "id"]);
}

#[test]
fn comments() {
    Tester::new(&[
        "start_document",
        "start_element(item)",
        "comment(\" little comment \")",
        "text(\"Jabber Site\", item)",
        "end_element(item)",
        "end_document",
    ])
    .check("<item url='http://jabber.org'><!-- little comment -->Jabber Site</item>");

    Tester::new(&[
        "start_document",
        "start_element(index)",
        "comment(\" <item> - tag has no childs \")",
        "start_element(item, standalone)",
        "end_element(item)",
        "end_element(index)",
        "end_document",
    ])
    .check("<index><!-- <item> - tag has no childs --><item name='lala' page='42'/></index>");

    Tester::new(&[
        "start_document",
        "comment(\" comment \")",
        "start_element(empty, standalone)",
        "end_element(empty)",
        "end_document",
    ])
    .check("<!-- comment --> <empty/> ");

    Tester::new(&[
        "start_document",
        "start_element(a)",
        "comment(\" x-y--z \")",
        "end_element(a)",
        "end_document",
    ])
    .check("<a><!-- x-y--z --><!----></a>");
}

#[test]
fn cdatas() {
    Tester::new(&[
        "start_document",
        "start_element(ka)",
        "text(\"1234\", ka)",
        "cdata(\" <ka> lala ] ]] ]]] \", ka)",
        "text(\"4321\", ka)",
        "end_element(ka)",
        "end_document",
    ])
    .check("<ka>1234<![CDATA[ <ka> lala ] ]] ]]] ]]>4321</ka>");

    Tester::new(&[
        "start_document",
        "start_element(data)",
        "cdata(\"[TEST]\", data)",
        "end_element(data)",
        "end_document",
    ])
    .check("<data><![CDATA[[TEST]]]></data>");

    Tester::new(&[
        "start_document",
        "start_element(data)",
        "cdata(\"[TEST]]\", data)",
        "end_element(data)",
        "end_document",
    ])
    .check("<data><![CDATA[[TEST]]]]></data>");

    Tester::new(&[
        "start_document",
        "start_element(a)",
        "cdata(\"x<y\", a)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a><![CDATA[x<y]]></a>");

    Tester::new(&[
        "start_document",
        "start_element(a)",
        "text(\"[[bg:Чингис хан]][[zh:成吉思汗]]\", a)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a>[[bg:Чингис хан]][[zh:成吉思汗]]</a>");
}

#[test]
fn dtds() {
    Tester::new(&[
        "start_document",
        "doctype(\" greeting [ <!ELEMENT greeting (#PCDATA)> ]\")",
        "start_element(x)",
        "text(\"foo\", x)",
        "end_element(x)",
        "end_document",
    ])
    .check(" <!DOCTYPE greeting [ <!ELEMENT greeting (#PCDATA)> ]> <x>foo</x>");

    Tester::new(&[
        "start_document",
        "sgml_declaration(\"ELEMENT x ANY\")",
        "start_element(x, standalone)",
        "end_element(x)",
        "end_document",
    ])
    .check("<!ELEMENT x ANY><x/>");
}

#[test]
fn pi() {
    Tester::new(&[
        "start_document",
        "start_element(a)",
        "processing_instruction(\"xml lala\")",
        "text(\"bibi\", a)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a><?xml lala?>bibi</a>");
}

#[test]
fn entities() {
    Tester::new(&[
        "start_document",
        "start_element(body)",
        "text(\"I'm fixing parser&tester for \\\"<\\\" and \\\">\\\" chars.\", body)",
        "end_element(body)",
        "end_document",
    ])
    .check("<body>I&apos;m fixing parser&amp;tester for &quot;&lt;&quot; and &quot;&gt;&quot; chars.</body>");

    Tester::new(&[
        "start_document",
        "start_element(test)",
        "start_element(standalone, standalone)",
        "end_element(standalone)",
        "text(\"abcd\", test)",
        "start_element(br, standalone)",
        "end_element(br)",
        "text(\"<escape>\", test)",
        "end_element(test)",
        "end_document",
    ])
    .check("<test><standalone be='happy'/>abcd<br/>&lt;escape&gt;</test>");

    // Only the predefined entities are replaced
    Tester::new(&[
        "start_document",
        "start_element(a)",
        "text(\"&#65;&custom;\", a)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a>&#65;&custom;</a>");

    Tester::new(&[
        "start_document",
        "start_element(a)",
        "text(\"<\", a)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a>&amp;lt;</a>");
}

#[test]
fn attribute_entities() {
    let elements = start_elements("<a b='a&amp;b &lt;c&gt;' q=\"&quot;&apos;\"></a>");
    assert_eq!(elements[0].attribute("b").unwrap().value(), "a&b <c>");
    assert_eq!(elements[0].attribute("q").unwrap().value(), "\"'");
}

#[test]
fn long_tag() {
    let name = "abc".repeat(500);
    let xml = format!("<{}></{}>", name, name);
    let start = format!("start_element({})", name);
    let end = format!("end_element({})", name);

    Tester::new(&["start_document", start.as_str(), end.as_str(), "end_document"]).check(&xml);
}

#[test]
fn location() {
    Tester::new(&[
        "start_document",
        "start_element(a)",
        "text(\"\\n\\n \", a)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a>\n\n </a>");

    Tester::new(&[
        "start_document",
        "start_element(ş)",
        "text(\"ğü\", ş)",
        "end_element(ş)",
        "end_document",
    ])
    .check("<ş>ğü</ş>\n");
}

#[test]
fn whitespace_text() {
    Tester::new(&[
        "start_document",
        "start_element(a)",
        "text(\"\\n  \", a)",
        "start_element(b, standalone)",
        "end_element(b)",
        "text(\" \", a)",
        "start_element(c, standalone)",
        "end_element(c)",
        "text(\"\\n\", a)",
        "end_element(a)",
        "end_document",
    ])
    .check("<a>\n  <b/> <c/>\n</a>");
}

#[test]
fn namespaces() {
    Tester::new(&[
        "start_document",
        "start_prefix_mapping(b, urn:x)",
        "start_element(a)",
        "start_element(b:c, uri=urn:x, standalone)",
        "end_element(b:c)",
        "end_element(a)",
        "end_prefix_mapping(b, urn:x)",
        "end_document",
    ])
    .check("<a xmlns:b=\"urn:x\"><b:c/></a>");

    Tester::new(&[
        "start_document",
        "start_prefix_mapping(, urn:atom)",
        "start_element(feed, uri=urn:atom)",
        "start_element(entry, uri=urn:atom, standalone)",
        "end_element(entry)",
        "end_element(feed)",
        "end_prefix_mapping(, urn:atom)",
        "end_document",
    ])
    .check("<feed xmlns='urn:atom' xml:lang='en'><entry/></feed>");

    let elements = start_elements("<feed xmlns='urn:atom' xml:lang='en' a:x='1' xmlns:a='urn:a'/>");
    let feed = &elements[0];
    assert_eq!(feed.attribute("xml:lang").unwrap().uri(), Some(crate::XML_NAMESPACE));
    assert_eq!(feed.attribute("a:x").unwrap().uri(), Some("urn:a"));
    assert_eq!(feed.attribute("xmlns").unwrap().uri(), None);
    assert_eq!(feed.prefix_mappings().len(), 2);
}

#[test]
fn namespace_redeclaration() {
    let xml = "<a xmlns:p='urn:1'><b xmlns:p='urn:2'/><p:c/></a>";
    Tester::new(&[
        "start_document",
        "start_prefix_mapping(p, urn:1)",
        "start_element(a)",
        "start_prefix_mapping(p, urn:2)",
        "start_element(b, standalone)",
        "end_element(b)",
        "end_prefix_mapping(p, urn:2)",
        "start_element(p:c, standalone)",
        "end_element(p:c)",
        "end_element(a)",
        "end_prefix_mapping(p, urn:1)",
        "end_document",
    ])
    .check(xml);

    Tester::with_config(
        &[
            "start_document",
            "start_prefix_mapping(p, urn:1)",
            "start_element(a)",
            "start_prefix_mapping(p, urn:2)",
            "start_element(b, standalone)",
            "end_element(b)",
            "end_prefix_mapping(p, urn:2)",
            "start_element(p:c, uri=urn:1, standalone)",
            "end_element(p:c)",
            "end_element(a)",
            "end_prefix_mapping(p, urn:1)",
            "end_document",
        ],
        ParserConfig::new().with_scoped_namespaces(true),
    )
    .check(xml);
}

#[test]
fn byte_order_mark() {
    let mut events = Vec::new();
    let mut parser = SaxParser::new();
    parser
        .parse_str(
            &mut |event: &SaxEvent| -> Result<(), SaxHandlerError> {
                events.push(event.name());
                Ok(())
            },
            "\u{feff}<a/>",
        )
        .unwrap();
    assert_eq!(
        events,
        ["start_document", "start_element", "end_element", "end_document"]
    );
    assert_eq!(parser.location().bytes, 7);
    assert_eq!(parser.location().column, 4);

    let config = ParserConfig::new().with_skip_bom(false);
    let mut parser = SaxParser::with_config(config);
    let mut handler = sink;
    let err = parser
        .parse_str(&mut handler, "\u{feff}<a/>")
        .unwrap_err();
    assert_eq!(err.message(), "Non-whitespace before document.");
}

#[test]
fn element_views() {
    let events = collect("<r><p><q>t</q></p></r>");
    let text = events.iter().find(|e| e.name() == "text").unwrap();
    let q = text.element().unwrap();
    assert_eq!(q.qname(), "q");
    assert_eq!(q.depth(), 2);
    let path: Vec<&str> = q.ancestors().map(|e| e.qname()).collect();
    assert_eq!(path, ["p", "r"]);
    // Start and end events share the same snapshot
    let start = events.iter().find(|e| matches!(e, SaxEvent::StartElement(v) if v.qname() == "q"));
    let end = events.iter().find(|e| matches!(e, SaxEvent::EndElement(v) if v.qname() == "q"));
    assert_eq!(start.unwrap().element(), end.unwrap().element());
}

#[test]
fn bad_tags() {
    BadTester::new(7, "Forward-slash in start-tag not followed by >").check("<a><b/ ></a>");
    BadTester::new(9, "Invalid element name").check("<a></ccc/></a>");
    BadTester::new(4, "Illegal element structure, a").check("</a>");
    BadTester::new(10, "Invalid characters in end-tag").check("<a> </a  b>");
    BadTester::new(8, "Non-whitespace after document.").check("<a></a><b/>");
    BadTester::new(11, "Attribute without value").check("<a a='1' b></a>");
    BadTester::new(12, "Unquoted attribute value").check("<a a='1' b=></a>");
    BadTester::new(13, "Attribute without value").check("<a a='12' b '2'></a>");
    BadTester::new(15, "Invalid characters in end-tag").check("<a a='12'></a b='1'>");
    BadTester::new(18, "Forward-slash in start-tag not followed by >")
        .check("<g><test a='123'/ b='lala'></g>");
    BadTester::new(17, "Document has unclosed tags").check("<a a='1' b='></a>");
    BadTester::new(6, "Unencoded <").check("<a> <> </a>");
    BadTester::new(7, "Illegal element structure, a & ").check("<a> </> </a>");
    BadTester::new(10, "Illegal element structure, b & a").check("<a><b></a></b>");
    BadTester::new(3, "Invalid character in element name").check("<a\"b/>");
    BadTester::new(4, "Invalid attribute name").check("<a 1='x'/>");
    BadTester::new(9, "Invalid attribute name").check("<a b='1'c='2'/>");
    BadTester::new(7, "Unencoded <").check("<a>ş<1");
}

#[test]
fn bad_comments() {
    BadTester::new(13, "Non-whitespace before document.").check("<!-- c1 --> lala <ha/>");
    BadTester::new(19, "Non-whitespace after document.").check("<!-- c1 --> <ha/> <!-- pika -->");
    BadTester::new(9, "Document has unclosed tags").check("<a><!-- x");
}

#[test]
fn bad_pi() {
    BadTester::new(6, "Non-whitespace after document.").check("<e/> <?xml ?>");
}

#[test]
fn bad_cdatas() {
    BadTester::new(3, "Non-whitespace before document.").check("  lala <a></a>");
    BadTester::new(11, "Non-whitespace after document.").check("  <a></a> lala");
    BadTester::new(9, "CDATA section outside of root element").check("<![CDATA[lala]]> <a/>");
    BadTester::new(12, "Inappropriately located doctype declaration")
        .check("<a><!DOCTYPE x></a>");
}

#[test]
fn bad_documents() {
    BadTester::new(0, "Document has no root element").check("");
    BadTester::new(3, "Document has no root element").check(" \n\t");
    BadTester::new(13, "Document has no root element").check("<!-- only -->");
    BadTester::new(6, "Document has unclosed tags").check("<a><b>");
}

#[test]
fn bad_utf8() {
    BadTester::new(4, "Invalid UTF-8 prefix byte").check_bytes(b"<a>\xff</a>");
    BadTester::new(4, "Invalid UTF-8 prefix byte").check_bytes(b"<a>\x80</a>");
    BadTester::new(5, "Invalid UTF-8 continuation byte").check_bytes(b"<a>\xc3(</a>");
    BadTester::new(5, "Overlong UTF-8 sequence").check_bytes(b"<a>\xc0\xaf</a>");
    BadTester::new(6, "Invalid XML character").check_bytes(b"<a>\xed\xa0\x80</a>");
    BadTester::new(4, "Invalid XML character").check_bytes(b"<a>\x01</a>");
    BadTester::new(4, "Incomplete UTF-8 sequence at the end of input").check_bytes(b"<a/>\xc3");
}

#[test]
fn text_before_error() {
    let mut names = Vec::new();
    let mut parser = SaxParser::new();
    let err = parser
        .parse_str(
            &mut |event: &SaxEvent| -> Result<(), SaxHandlerError> {
                names.push(event.to_string());
                Ok(())
            },
            "<a>b</c>",
        )
        .unwrap_err();
    assert_eq!(names, ["start_document", "start_element(a)", "text(\"b\", a)"]);
    assert_eq!(err.message(), "Illegal element structure, a & c");
    assert_eq!((err.line(), err.column()), (1, 8));
}

#[test]
fn error_lines() {
    let mut handler = sink;
    let mut parser = SaxParser::new();
    let err = parser
        .parse_str(&mut handler, "<a>\n  <b>\n  </c>\n</a>")
        .unwrap_err();
    assert_eq!((err.line(), err.column()), (3, 6));
}

#[test]
fn reuse_needs_reset() {
    let mut handler = sink;
    let mut parser = SaxParser::new();
    assert!(parser.parse_str(&mut handler, "<a><</a>").is_err());
    let err = parser.parse_str(&mut handler, "<a/>").unwrap_err();
    assert_eq!(
        err.message(),
        "Cannot continue after an error without a reset"
    );
    assert!(parser.parse_finish(&mut handler).is_err());
    assert!(!parser.is_finished());

    parser.reset();
    parser.parse_bytes_finish(&mut handler, b"<a/>").unwrap();
    assert!(parser.is_finished());
}

#[test]
fn handler_abort() {
    let mut count = 0;
    let mut parser = SaxParser::new();
    let result = parser.parse_str(
        &mut |event: &SaxEvent| {
            count += 1;
            match event {
                SaxEvent::Text { .. } => Err(SaxHandlerError::Abort),
                _ => Ok(()),
            }
        },
        "<a><b>stop</b><c/></a>",
    );
    match result {
        Err(SaxError::HandlerAbort { location }) => assert_eq!(location.bytes, 11),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(count, 4);
    assert_eq!(parser.depth(), 2);
}

#[test]
fn chunks() {
    let xml = "<doc a='1'>\n <x:item xmlns:x='urn:x'>ş&amp;t</x:item><![CDATA[c]]>\n</doc>";
    let whole = collect(xml);
    for size in 1..8 {
        let mut events = Vec::new();
        let mut parser = SaxParser::new();
        let mut handler = |event: &SaxEvent| -> Result<(), SaxHandlerError> {
            events.push(event.clone());
            Ok(())
        };
        for chunk in xml.as_bytes().chunks(size) {
            parser.parse_bytes(&mut handler, chunk).unwrap();
        }
        parser.parse_finish(&mut handler).unwrap();
        assert_eq!(events, whole);
    }
}
