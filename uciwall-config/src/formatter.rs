//! UCI Formatter
//!
//! Serializes sections back to UCI text.
//!
//! Option values are always wrapped in single quotes. A literal `'` is
//! written as `\'`, but only when the value contains a space or a quote.
//! The parser does not undo that escape, so values holding `'` do not
//! survive a format/parse round trip unchanged (`O'Brien` comes back as
//! `O\'Brien`). Output must stay byte-identical to what routers already hold.

use crate::section::Section;

/// Format sections as UCI text.
///
/// Sections are separated by a blank line; the result has no leading or
/// trailing whitespace, so an empty slice formats to an empty string.
pub fn format(sections: &[Section]) -> String {
    let mut lines = Vec::with_capacity(sections.len() * 8);

    for section in sections {
        lines.push(String::new());

        if section.name().is_empty() {
            lines.push(format!("config {}", section.section_type()));
        } else {
            lines.push(format!("config {} '{}'", section.section_type(), section.name()));
        }

        for (key, value) in section.options() {
            lines.push(format!("\toption {} '{}'", key, escape(value)));
        }
    }

    lines.join("\n").trim().to_string()
}

fn escape(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([' ', '\'', '"']) {
        value.replace('\'', "\\'").into()
    } else {
        value.into()
    }
}
