//! Outline file provider.
//!
//! Parses the blank-line-delimited outline format where `* <YYYY-MM-DD Ddd>`
//! heading lines date the paragraphs that follow them.

mod parser;
mod provider;

pub use parser::OutlineParser;
pub use provider::OutlineProvider;
