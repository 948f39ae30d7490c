//! Markdown to rich text conversion
//!
//! Only a practical subset is understood: `**bold**`, `*italic*`,
//! `# headings` (levels 1-6), `[label](url)` links and `` `code` `` spans.
//! Conversion is pure and infallible: anything that does not form a
//! complete construct stays literal, unstyled text.

mod document;
mod html;
mod parser;

pub use document::{RichDocument, RunStyle, TextRun};
pub use parser::{contains_markdown, convert, convert_if_markdown};
