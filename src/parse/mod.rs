pub mod chapter_parser;
pub mod chapter_serializer;
pub mod marker;

pub use chapter_parser::{parse_chapter, parse_date};
pub use chapter_serializer::{RewriteOutcome, rewrite_chapter};
