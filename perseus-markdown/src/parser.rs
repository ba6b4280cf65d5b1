//! Block and inline parsing
//!
//! Parsing runs in two stages, mirroring how the lexing pipeline feeds the
//! builder stages elsewhere in this workspace:
//!
//! 1. The source is split into block-level chunks on blank lines, keeping
//!    fenced code blocks whole.
//! 2. Each chunk is classified (heading, list, table, code fence, block
//!    math, paragraph) and its text content is lexed for inline elements.
//!
//! A chunk consisting solely of `===` acts as a column break: the document
//! becomes a single [`Node::Columns`] with the blocks on either side.

use crate::ast::Node;
use crate::lexer::{tokenize, InlineToken};
use once_cell::sync::Lazy;
use regex::Regex;

static WIDGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\[☃ ([a-zA-Z0-9-]+) ([0-9]+)\]\]$").expect("static regex"));
static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^!\[([^\]]*)\]\(\s*([^)\s]+)(?:\s+"([^"]*)")?\s*\)$"#).expect("static regex")
});
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").expect("static regex"));
static ORDERED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("static regex"));

/// Options influencing a parse pass.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// True while translators interact with the content through JIPT.
    /// Crowdin placeholder ids are ordinary text either way; the flag is
    /// carried so paragraph counts stay stable across translation passes.
    pub is_jipt: bool,
}

/// Parse content into a list of block-level nodes.
pub fn parse(content: &str, _options: &ParseOptions) -> Vec<Node> {
    let chunks = split_blocks(content);

    // A `===` chunk splits the document into two columns.
    if let Some(split) = chunks.iter().position(|c| c.trim() == "===") {
        let left: Vec<Node> = chunks[..split].iter().map(|c| parse_block(c)).collect();
        let right: Vec<Node> = chunks[split + 1..].iter().map(|c| parse_block(c)).collect();
        return vec![Node::Columns {
            columns: vec![left, right],
        }];
    }

    chunks.iter().map(|c| parse_block(c)).collect()
}

/// Split source into block chunks on blank lines, keeping fenced code
/// blocks together even when they contain blank lines.
pub fn split_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    let mut fence: Option<String> = None;

    for line in content.lines() {
        let trimmed = line.trim_start();
        match &fence {
            Some(marker) => {
                push_line(&mut current, line);
                if trimmed.starts_with(marker.as_str()) {
                    fence = None;
                }
            }
            None => {
                if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                    push_line(&mut current, line);
                    fence = Some(trimmed[..3].to_string());
                } else if line.trim().is_empty() {
                    if !current.is_empty() {
                        blocks.push(std::mem::take(&mut current));
                    }
                } else {
                    push_line(&mut current, line);
                }
            }
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn push_line(buf: &mut String, line: &str) {
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(line);
}

/// Classify and parse a single block chunk.
fn parse_block(chunk: &str) -> Node {
    let trimmed = chunk.trim();

    if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
        return parse_code_block(trimmed);
    }

    if let Some(caps) = HEADING_RE.captures(trimmed) {
        let level = caps[1].len() as u8;
        return Node::Heading {
            level,
            content: parse_inlines(&caps[2]),
        };
    }

    let lines: Vec<&str> = trimmed.lines().collect();

    if lines.iter().all(|l| l.trim_start().starts_with('|')) {
        return parse_table(&lines);
    }

    if lines.iter().all(|l| l.trim_start().starts_with("- ")) {
        let items = lines
            .iter()
            .map(|l| parse_inlines(l.trim_start().trim_start_matches("- ")))
            .collect();
        return Node::List {
            ordered: false,
            items,
        };
    }

    if lines.iter().all(|l| ORDERED_ITEM_RE.is_match(l.trim_start())) {
        let items = lines
            .iter()
            .map(|l| {
                let caps = ORDERED_ITEM_RE
                    .captures(l.trim_start())
                    .expect("lines were checked above");
                parse_inlines(&caps[1])
            })
            .collect();
        return Node::List {
            ordered: true,
            items,
        };
    }

    // A paragraph that is exactly one math span renders as display math.
    let inlines = parse_inlines(trimmed);
    if let [Node::Math { content }] = inlines.as_slice() {
        return Node::BlockMath {
            content: content.clone(),
        };
    }

    Node::Paragraph { content: inlines }
}

fn parse_code_block(trimmed: &str) -> Node {
    let mut lines = trimmed.lines();
    let opener = lines.next().unwrap_or_default();
    let lang = opener
        .trim_start_matches(['`', '~'])
        .trim()
        .to_string();
    let mut body: Vec<&str> = lines.collect();
    if body
        .last()
        .map(|l| l.trim_start().starts_with("```") || l.trim_start().starts_with("~~~"))
        .unwrap_or(false)
    {
        body.pop();
    }
    Node::CodeBlock {
        lang: if lang.is_empty() { None } else { Some(lang) },
        content: body.join("\n"),
    }
}

fn parse_table(lines: &[&str]) -> Node {
    let mut parsed_rows: Vec<Vec<Vec<Node>>> = Vec::new();
    for line in lines {
        let trimmed = line.trim().trim_matches('|');
        // Alignment separator rows like |---|:--:| carry no content.
        if trimmed
            .chars()
            .all(|c| matches!(c, '-' | ':' | '|' | ' '))
        {
            continue;
        }
        let cells = trimmed
            .split('|')
            .map(|cell| parse_inlines(cell.trim()))
            .collect();
        parsed_rows.push(cells);
    }

    let header = if parsed_rows.is_empty() {
        Vec::new()
    } else {
        parsed_rows.remove(0)
    };
    Node::Table {
        header,
        rows: parsed_rows,
    }
}

/// Parse inline elements out of a run of paragraph text.
pub fn parse_inlines(source: &str) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();

    for (token, span) in tokenize(source) {
        let slice = &source[span];
        match token {
            InlineToken::Widget => {
                let caps = WIDGET_RE.captures(slice).expect("lexer matched shape");
                nodes.push(Node::Widget {
                    id: format!("{} {}", &caps[1], &caps[2]),
                    widget_type: caps[1].to_string(),
                });
            }
            InlineToken::Math => {
                let content = slice[1..slice.len() - 1].to_string();
                nodes.push(Node::Math { content });
            }
            InlineToken::Image => {
                let caps = IMAGE_RE.captures(slice).expect("lexer matched shape");
                let alt = caps.get(1).map(|m| m.as_str().to_string()).filter(|s| !s.is_empty());
                let title = caps.get(3).map(|m| m.as_str().to_string());
                nodes.push(Node::Image {
                    target: caps[2].to_string(),
                    alt,
                    title,
                });
            }
            InlineToken::Text
            | InlineToken::Dollar
            | InlineToken::Bang
            | InlineToken::OpenBracket => append_text(&mut nodes, slice),
        }
    }

    nodes
}

/// Group adjacent text pieces into a single text node.
fn append_text(nodes: &mut Vec<Node>, piece: &str) {
    if let Some(Node::Text { content }) = nodes.last_mut() {
        content.push_str(piece);
    } else {
        nodes.push(Node::Text {
            content: piece.to_string(),
        });
    }
}
