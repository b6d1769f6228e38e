//! Markdown rendering for task descriptions
//!
//! pulldown-cmark with tables, strikethrough and task lists. Raw HTML in the
//! source is shown as text, never injected.

use pulldown_cmark::{html::push_html, Event, Options, Parser};

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

pub fn render_markdown(text: &str) -> String {
    let events = Parser::new_ext(text, options()).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        other => other,
    });
    let mut html = String::new();
    push_html(&mut html, events);
    html
}
