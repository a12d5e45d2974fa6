//! Source-annotated error reports

use crate::parser::ParseError;
use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};
use std::ops::Range;

/// Render a parse error as a plain-text report pointing into `source`.
pub fn render_parse_error(source_name: &str, source: &str, error: &ParseError) -> String {
    let span = error_span(source, error);

    let label = match error {
        ParseError::MalformedSectionHeader { .. } => "section type missing here",
        ParseError::Lex { .. } => "unexpected character",
    };

    let report = Report::build(ReportKind::Error, (source_name, span.clone()))
        .with_config(
            Config::default()
                .with_color(false)
                .with_index_type(IndexType::Byte),
        )
        .with_message(error.to_string())
        .with_label(Label::new((source_name, span)).with_message(label))
        .with_help("a section header looks like: config <type> '<name>'")
        .finish();

    let mut out = Vec::new();
    if report.write((source_name, Source::from(source)), &mut out).is_err() {
        return error.to_string();
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn error_span(source: &str, error: &ParseError) -> Range<usize> {
    match error {
        ParseError::MalformedSectionHeader { span, .. } => span.start..span.end,
        ParseError::Lex { line, .. } => line_span(source, *line),
    }
}

/// Byte range of a 1-based line, without its newline
fn line_span(source: &str, line: usize) -> Range<usize> {
    let mut start = 0;
    for (i, text) in source.split('\n').enumerate() {
        if i + 1 == line {
            return start..start + text.len();
        }
        start += text.len() + 1;
    }
    source.len()..source.len()
}
