//! Markdown → HTML rendering.
//!
//! Content authors are trusted: raw HTML embedded in Markdown is passed
//! through untouched and the result is injected into pages unescaped. Tables,
//! strikethrough, footnotes and task lists are enabled on top of CommonMark.

use pulldown_cmark::{Options, Parser, html};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
}

/// Render a Markdown body to an HTML fragment.
pub fn render(body: &str) -> String {
    let parser = Parser::new_ext(body, options());
    let mut out = String::with_capacity(body.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Plain-text rendering of a Markdown fragment, used for excerpts and
/// descriptions derived from a body.
pub fn plain_text(body: &str) -> String {
    use pulldown_cmark::{Event, TagEnd};

    let mut out = String::new();
    for event in Parser::new_ext(body, options()) {
        match event {
            Event::Text(t) | Event::Code(t) => out.push_str(&t),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                if !out.ends_with(' ') && !out.is_empty() {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
    out.trim().to_string()
}
