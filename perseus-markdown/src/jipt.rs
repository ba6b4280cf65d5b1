//! JIPT paragraph bookkeeping
//!
//! "Just In Place Translation" replaces content one paragraph at a time,
//! so the paragraph structure of a document must be derivable without a
//! full parse, and splitting then joining must round-trip the paragraph
//! count. Fenced code blocks count as a single paragraph even when they
//! contain blank lines.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a paragraph that is an entire fenced code block. Paragraphs
/// matching this are treated as indivisible during translation.
pub static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*(`{3,}|~{3,})\s*(\S+)?\s*\n(.+?)\s*(`{3,}|~{3,})\s*$")
        .expect("static regex")
});

/// The marker crowdin embeds in untranslated JIPT content.
pub const CROWDIN_MARKER: &str = "crwdns";

/// Split content into translation paragraphs.
pub fn parse_to_array(content: &str) -> Vec<String> {
    crate::parser::split_blocks(content)
}

/// Reassemble translation paragraphs into content.
pub fn join_from_array(paragraphs: &[String]) -> String {
    paragraphs.join("\n\n")
}
