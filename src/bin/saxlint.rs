/*
** This file is a part of Streamsax (incremental SAX tokenizer for XML)
** Copyright (C) 2025 The Streamsax Authors
**
** Streamsax is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::env;
use std::fs::File;
use std::io::Read;
use std::io::stdin;
use std::process::ExitCode;

use log::debug;

use streamsax::DEFAULT_BUFFER_SIZE;
use streamsax::ElementView;
use streamsax::ParserConfig;
use streamsax::SaxError;
use streamsax::SaxEvent;
use streamsax::SaxHandler;
use streamsax::SaxHandlerError;
use streamsax::SaxParser;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("saxlint (streamsax) v{}", VERSION);
}

fn print_usage() {
    println!(
        concat!(
            "Usage: saxlint [OPTIONS] [FILE.xml...]\n",
            "This tool checks the well-formedness of XML documents.\n",
            "Options:\n",
            "  -s, --stat               Overall statistics\n",
            "  -c, --count              Tag counts\n",
            "  -e, --events             Print every parse event\n",
            "  -n, --scoped-namespaces  Restore redeclared prefixes when the inner element closes\n",
            "  -b, --buffer <SIZE>      File read buffer size in bytes (default: {})\n",
            "  -h, --help               Display this help message and exit\n",
            "  -v, --version            Display the version and exit\n",
            "Set RUST_LOG=streamsax=trace to see the parser log."
        ),
        DEFAULT_BUFFER_SIZE
    );
}

#[derive(Default)]
struct Options {
    do_stats: bool,
    do_tag_count: bool,
    do_events: bool,
}

struct Handler {
    options: Options,
    max_depth: usize,
    nr_tags: usize,
    nr_empty_tags: usize,
    nr_text_size: usize,
    nr_mappings: usize,
    tag_map: BTreeMap<String, usize>,
    error: Option<String>,
}

impl Handler {
    fn new(options: Options) -> Self {
        Handler {
            options,
            max_depth: 0,
            nr_tags: 0,
            nr_empty_tags: 0,
            nr_text_size: 0,
            nr_mappings: 0,
            tag_map: BTreeMap::new(),
            error: None,
        }
    }

    fn check_attributes(&mut self, element: &ElementView) -> Result<(), SaxHandlerError> {
        let mut seen = HashSet::new();
        for attribute in element.attributes() {
            if !seen.insert(attribute.qname()) {
                self.error = Some(format!(
                    "duplicate attribute '{}' in element '{}'",
                    attribute.qname(),
                    element.qname()
                ));
                return Err(SaxHandlerError::Abort);
            }
        }
        Ok(())
    }

    fn report(&mut self) {
        if self.options.do_stats {
            println!(
                "Tags pairs: {}, empty element tags: {}, max depth: {}",
                self.nr_tags, self.nr_empty_tags, self.max_depth
            );
            println!(
                "Total size of character data: {} bytes, namespace declarations: {}.",
                self.nr_text_size, self.nr_mappings
            );
        }
        if self.options.do_tag_count {
            println!("Tag counts:");
            for (tag, count) in self.tag_map.iter() {
                println!("  {}: {}", tag, count);
            }
        }
        self.clear();
    }

    fn clear(&mut self) {
        self.max_depth = 0;
        self.nr_tags = 0;
        self.nr_empty_tags = 0;
        self.nr_text_size = 0;
        self.nr_mappings = 0;
        self.tag_map.clear();
        self.error = None;
    }
}

impl SaxHandler for Handler {
    fn handle_event(&mut self, event: &SaxEvent) -> Result<(), SaxHandlerError> {
        if self.options.do_events {
            println!("{}", event);
        }
        match event {
            SaxEvent::StartElement(element) => {
                self.check_attributes(element)?;
                if element.is_standalone() {
                    self.nr_empty_tags += 1;
                } else {
                    self.nr_tags += 1;
                }
                self.max_depth = self.max_depth.max(element.depth() + 1);
                if self.options.do_tag_count {
                    *self.tag_map.entry(element.qname().to_string()).or_insert(0) += 1;
                }
            }
            SaxEvent::StartPrefixMapping { .. } => self.nr_mappings += 1,
            SaxEvent::Text { content, .. } => self.nr_text_size += content.len(),
            _ => (),
        }
        Ok(())
    }
}

enum LinterError {
    IoError(std::io::Error),
    SaxError(SaxError),
}

impl From<std::io::Error> for LinterError {
    fn from(err: std::io::Error) -> Self {
        LinterError::IoError(err)
    }
}

impl From<SaxError> for LinterError {
    fn from(err: SaxError) -> Self {
        LinterError::SaxError(err)
    }
}

struct Linter {
    handler: Handler,
    parser: SaxParser,
}

impl Linter {
    fn new(options: Options, config: ParserConfig) -> Self {
        Linter {
            handler: Handler::new(options),
            parser: SaxParser::with_config(config),
        }
    }

    fn parse_file(&mut self, file: &str, is_stream: bool) -> Result<(), LinterError> {
        let mut f: Box<dyn Read> = if is_stream {
            Box::new(stdin())
        } else {
            Box::new(File::open(file)?)
        };
        let mut buffer = vec![0u8; self.parser.config().buffer_size.max(1)];
        loop {
            let bytes_read = f.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            self.parser
                .parse_bytes(&mut self.handler, &buffer[..bytes_read])?;
        }
        Ok(self.parser.parse_finish(&mut self.handler)?)
    }

    fn lint_file(&mut self, file: &str, is_stream: bool) -> bool {
        debug!("checking '{}'", file);
        self.parser.reset();
        self.handler.clear();
        match self.parse_file(file, is_stream) {
            Ok(()) => {
                self.handler.report();
                true
            }
            Err(LinterError::IoError(e)) => {
                eprintln!("Error reading file '{}': {}", file, e);
                false
            }
            Err(LinterError::SaxError(err @ SaxError::BadXml { .. })) => {
                eprintln!(
                    "Syntax error in file '{}' at line {} column {}: {}",
                    file,
                    err.line(),
                    err.column(),
                    err.message()
                );
                false
            }
            Err(LinterError::SaxError(err @ SaxError::HandlerAbort { .. })) => {
                eprintln!(
                    "Well-formedness error in file '{}' at line {} column {}: {}",
                    file,
                    err.line(),
                    err.column(),
                    self.handler.error.as_deref().unwrap_or(err.message())
                );
                false
            }
            Err(LinterError::SaxError(err)) => {
                eprintln!("Error parsing file '{}': {}", file, err);
                false
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args();

    let mut files = Vec::new();
    let mut options = Options::default();
    let mut config = ParserConfig::default();

    // Skip the first argument (program name)
    args.next();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-s" | "--stat" => {
                options.do_stats = true;
            }
            "-c" | "--count" => {
                options.do_tag_count = true;
            }
            "-cs" | "-sc" => {
                options.do_stats = true;
                options.do_tag_count = true;
            }
            "-e" | "--events" => {
                options.do_events = true;
            }
            "-n" | "--scoped-namespaces" => {
                config = config.with_scoped_namespaces(true);
            }
            "-b" | "--buffer" => {
                if let Some(size) = args.next() {
                    if let Ok(size) = size.parse::<usize>() {
                        config = config.with_buffer_size(size);
                    } else {
                        eprintln!("Invalid buffer size");
                        return ExitCode::FAILURE;
                    }
                } else {
                    eprintln!("Missing buffer size");
                    return ExitCode::FAILURE;
                }
            }
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                print_version();
                return ExitCode::SUCCESS;
            }
            _ => {
                files.push(arg);
            }
        }
    }

    let mut linter = Linter::new(options, config);
    if files.is_empty() {
        if !linter.lint_file("stdin", true) {
            return ExitCode::FAILURE;
        }
    } else {
        for file in files {
            if !linter.lint_file(&file, false) {
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
