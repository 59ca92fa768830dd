//! Plain-text rendering for terminals.

use blocknote_types::{Block, BlockBody, BlockId};

/// Split list content into items: one per non-blank line, with a leading
/// `•`, `-`, or `*` bullet removed.
pub fn list_items(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.strip_prefix(['•', '-', '*'])
                .map(str::trim_start)
                .unwrap_or(line)
        })
        .collect()
}

/// Render a block the way it would read in a plain-text note.
pub fn render_text(block: &Block) -> String {
    let content = block.content();
    match block.body() {
        BlockBody::Heading { .. } => {
            let level = block.body().heading_level().unwrap_or(1) as usize;
            format!("{} {}", "#".repeat(level), content)
        }
        BlockBody::List => list_items(content)
            .into_iter()
            .map(|item| format!("  • {item}"))
            .collect::<Vec<_>>()
            .join("\n"),
        BlockBody::Code { language } => {
            format!("```{}\n{}\n```", language.as_deref().unwrap_or(""), content)
        }
        BlockBody::Image { alt, url } => {
            let src = url.as_deref().unwrap_or(content);
            match alt {
                Some(alt) => format!("[image: {alt}] {src}"),
                None => format!("[image] {src}"),
            }
        }
        BlockBody::Text => content.to_string(),
    }
}

/// Render a whole document, marking the selected block with `>`.
pub fn render_text_document(blocks: &[Block], selected: Option<BlockId>) -> String {
    blocks
        .iter()
        .map(|block| {
            let rendered = render_text(block);
            if selected == Some(block.id()) {
                rendered
                    .lines()
                    .map(|l| format!("> {l}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                rendered
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocknote_types::BlockDraft;

    #[test]
    fn test_list_items_strip_bullets_and_blanks() {
        let items = list_items("• one\n\n- two\n  * three\nfour\n   ");
        assert_eq!(items, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_heading_uses_level() {
        let block = Block::new(BlockDraft::heading(3, "Section"));
        assert_eq!(render_text(&block), "### Section");
    }

    #[test]
    fn test_code_fence_without_language() {
        let block = Block::new(BlockDraft::code(None, "x = 1"));
        assert_eq!(render_text(&block), "```\nx = 1\n```");
    }

    #[test]
    fn test_document_marks_selection() {
        let a = Block::new(BlockDraft::text("a"));
        let b = Block::new(BlockDraft::text("b"));
        let out = render_text_document(&[a.clone(), b], Some(a.id()));
        assert_eq!(out, "> a\n\nb");
    }
}
