//! Markdown → HTML for the markdown block preview.
//!
//! Uses pulldown-cmark (the same parser as rustdoc). Raw HTML in the source
//! is demoted to text so a note cannot inject markup into the page.

use pulldown_cmark::{html, CowStr, Event, Options, Parser};

/// Render markdown source to an HTML fragment.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(CowStr::from(raw.into_string())),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_emphasis() {
        let out = render_markdown("# Title\n\nSome **bold** and *italic* text.");
        assert!(out.contains("<h1>Title</h1>"));
        assert!(out.contains("<strong>bold</strong>"));
        assert!(out.contains("<em>italic</em>"));
    }

    #[test]
    fn test_code_and_links() {
        let out = render_markdown("Use `cargo`.\n\n```\nfn main() {}\n```\n\n[docs](https://docs.rs)");
        assert!(out.contains("<code>cargo</code>"));
        assert!(out.contains("<pre><code>fn main() {}\n</code></pre>"));
        assert!(out.contains("<a href=\"https://docs.rs\">docs</a>"));
    }

    #[test]
    fn test_lists() {
        let out = render_markdown("- one\n- two\n");
        assert!(out.contains("<ul>"));
        assert!(out.contains("<li>one</li>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let out = render_markdown("hi <script>alert(1)</script>");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }
}
