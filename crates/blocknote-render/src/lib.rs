//! Rendering for blocknote blocks.
//!
//! Pure functions from blocks to output. Nothing here can fail: missing
//! metadata falls back to sensible defaults, and all user content is
//! escaped before it reaches HTML.
//!
//! - [`render_block`] / [`render_document`]: block → HTML fragment
//! - [`render_text`]: block → terminal-friendly plain text
//! - [`render_markdown`]: markdown source → HTML (markdown block preview)

mod html;
mod markdown;
mod text;

pub use html::{escape_html, render_block, render_document};
pub use markdown::render_markdown;
pub use text::{list_items, render_text, render_text_document};
