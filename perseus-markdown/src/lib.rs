//! # perseus-markdown
//!
//! Parser for the markdown-like content format used by perseus exercises
//! and articles. Content is plain markdown text interleaved with widget
//! placeholders of the form `[[☃ input-number 1]]`, inline TeX delimited
//! by `$`, and images.
//!
//! The parser produces a tree of [`ast::Node`] values. Block structure is
//! recovered first (paragraphs split on blank lines, with fenced code
//! blocks kept whole), then each paragraph is lexed for inline elements.
//!
//! The renderer in `perseus-core` consumes this AST; it never constructs
//! nodes itself except through the linter hook, which may wrap nodes in
//! [`ast::Node::Lint`] annotations in place.

pub mod ast;
pub mod jipt;
pub mod lexer;
pub mod parser;
pub mod url;

pub use ast::Node;
pub use parser::{parse, ParseOptions};
