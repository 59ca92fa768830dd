//! Block → HTML fragments.

use std::fmt::Write;

use blocknote_types::{Block, BlockBody, BlockId};

use crate::text::list_items;

/// Fallback alt text for images without one.
const DEFAULT_IMAGE_ALT: &str = "Generated image";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the inner content of one block.
pub fn render_block(block: &Block) -> String {
    let content = block.content();
    match block.body() {
        BlockBody::Heading { .. } => {
            let level = block.body().heading_level().unwrap_or(1);
            format!("<h{level}>{}</h{level}>", escape_html(content))
        }
        BlockBody::List => {
            let mut out = String::from("<ul>");
            for item in list_items(content) {
                let _ = write!(out, "<li>{}</li>", escape_html(item));
            }
            out.push_str("</ul>");
            out
        }
        BlockBody::Code { language } => {
            let mut out = String::from("<div class=\"code\">");
            if let Some(lang) = language {
                let _ = write!(out, "<span class=\"language\">{}</span>", escape_html(lang));
            }
            let _ = write!(out, "<pre><code>{}</code></pre></div>", escape_html(content));
            out
        }
        BlockBody::Image { alt, url } => {
            let src = url.as_deref().unwrap_or(content);
            let mut out = format!(
                "<figure><img src=\"{}\" alt=\"{}\">",
                escape_html(src),
                escape_html(alt.as_deref().unwrap_or(DEFAULT_IMAGE_ALT)),
            );
            if let Some(alt) = alt {
                let _ = write!(out, "<figcaption>{}</figcaption>", escape_html(alt));
            }
            out.push_str("</figure>");
            out
        }
        BlockBody::Text => format!("<p>{}</p>", escape_html(content)),
    }
}

/// Render every block in order, each wrapped in a container that carries its
/// id and kind. The selected block gets a `selected` class.
pub fn render_document(blocks: &[Block], selected: Option<BlockId>) -> String {
    let mut out = String::from("<article class=\"document\">");
    if blocks.is_empty() {
        out.push_str("<p class=\"empty\">Your canvas awaits</p>");
    }
    for block in blocks {
        let class = if selected == Some(block.id()) {
            "block selected"
        } else {
            "block"
        };
        let _ = write!(
            out,
            "<section class=\"{class}\" data-block-id=\"{}\" data-kind=\"{}\">{}</section>",
            block.id(),
            block.kind(),
            render_block(block),
        );
    }
    out.push_str("</article>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocknote_types::{BlockDraft, BlockKind};

    fn block(draft: BlockDraft) -> Block {
        Block::new(draft)
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let out = render_block(&block(BlockDraft::text("<script>alert(1)</script>")));
        assert_eq!(out, "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>");
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            render_block(&block(BlockDraft::heading(2, "Title"))),
            "<h2>Title</h2>"
        );
        let bare = BlockDraft::new(BlockBody::Heading { level: None }, "Untitled");
        assert_eq!(render_block(&block(bare)), "<h1>Untitled</h1>");
        let deep = BlockDraft::new(BlockBody::Heading { level: Some(12) }, "Deep");
        assert_eq!(render_block(&block(deep)), "<h6>Deep</h6>");
    }

    #[test]
    fn test_list_items() {
        let out = render_block(&block(BlockDraft::list("• one\n• two\n\n- three")));
        assert_eq!(out, "<ul><li>one</li><li>two</li><li>three</li></ul>");
    }

    #[test]
    fn test_code_with_and_without_language() {
        let out = render_block(&block(BlockDraft::code(Some("rust"), "a < b")));
        assert!(out.contains("<span class=\"language\">rust</span>"));
        assert!(out.contains("<pre><code>a &lt; b</code></pre>"));

        let out = render_block(&block(BlockDraft::code(None, "x")));
        assert!(!out.contains("language"));
    }

    #[test]
    fn test_image_falls_back_to_content_and_default_alt() {
        let draft = BlockDraft::template(BlockKind::Image);
        let out = render_block(&block(draft));
        assert!(out.contains("src=\"https://via.placeholder.com/400x200\""));
        assert!(out.contains("alt=\"Generated image\""));
        assert!(!out.contains("figcaption"));

        let out = render_block(&block(BlockDraft::image("https://x/cat.png", Some("a cat"))));
        assert!(out.contains("src=\"https://x/cat.png\""));
        assert!(out.contains("<figcaption>a cat</figcaption>"));
    }

    #[test]
    fn test_every_kind_renders_without_metadata() {
        for kind in BlockKind::ALL {
            let b = block(BlockDraft::new(BlockBody::bare(kind), "content"));
            assert!(!render_block(&b).is_empty());
        }
    }

    #[test]
    fn test_document_marks_selected() {
        let a = block(BlockDraft::text("a"));
        let b = block(BlockDraft::text("b"));
        let out = render_document(&[a.clone(), b.clone()], Some(b.id()));
        assert!(out.contains(&format!(
            "<section class=\"block\" data-block-id=\"{}\"",
            a.id()
        )));
        assert!(out.contains(&format!(
            "<section class=\"block selected\" data-block-id=\"{}\"",
            b.id()
        )));
    }

    #[test]
    fn test_empty_document() {
        assert!(render_document(&[], None).contains("Your canvas awaits"));
    }
}
