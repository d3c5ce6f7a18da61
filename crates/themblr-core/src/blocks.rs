//! Template block token scanning and balanced-pair matching
//!
//! Tumblr template blocks are flat `{block:Name}` / `{/block:Name}` tokens that
//! may nest, including inside a block of the same name. Matching a block means
//! counting depth over every open/close token of that name in document order;
//! a plain "find the next close tag" would pair the wrong tokens.
//!
//! All offsets are byte offsets into the source string.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any block token, open or close, of any name
    static ref BLOCK_TOKEN: Regex = Regex::new(r"\{(/?)block:([A-Za-z0-9]+)[^}]*\}").unwrap();
}

/// Whether a token opens or closes a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTokenKind {
    Open,
    Close,
}

/// One `{block:Name ...}` or `{/block:Name}` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockToken<'a> {
    pub name: &'a str,
    pub kind: BlockTokenKind,
    pub start: usize,
    pub end: usize,
    /// Name is followed directly by `}` or by whitespace and attributes
    pub exact: bool,
}

impl BlockToken<'_> {
    /// True for an exact token of `name`; `{block:Name-x}` is not one
    pub fn is_named(&self, name: &str) -> bool {
        self.exact && self.name == name
    }
}

/// Byte range of a balanced block and of its body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// Start of the open token
    pub start: usize,
    /// End of the matching close token
    pub end: usize,
    /// End of the open token
    pub inner_start: usize,
    /// Start of the matching close token
    pub inner_end: usize,
}

impl BlockRange {
    /// The whole block, tokens included
    pub fn outer<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// The block body between the tokens
    pub fn inner<'a>(&self, source: &'a str) -> &'a str {
        &source[self.inner_start..self.inner_end]
    }
}

/// Scan every block token, of every name, in document order
pub fn tokenize_blocks(source: &str) -> Vec<BlockToken<'_>> {
    BLOCK_TOKEN
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?;
            let kind = if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
                BlockTokenKind::Close
            } else {
                BlockTokenKind::Open
            };
            let rest = &source[name.end()..whole.end()];
            Some(BlockToken {
                name: name.as_str(),
                kind,
                start: whole.start(),
                end: whole.end(),
                exact: rest == "}" || rest.starts_with(char::is_whitespace),
            })
        })
        .collect()
}

/// Check that all block tokens nest correctly using one shared stack.
///
/// Returns one message per defect; an empty list means balanced.
pub fn check_block_balance(source: &str) -> Vec<String> {
    let mut stack: Vec<&str> = Vec::new();
    let mut errors = Vec::new();

    for token in tokenize_blocks(source) {
        match token.kind {
            BlockTokenKind::Open => stack.push(token.name),
            BlockTokenKind::Close => {
                let popped = stack.pop();
                if popped != Some(token.name) {
                    errors.push(format!(
                        "block mismatch: expected close for {}, got {}",
                        popped.unwrap_or("<none>"),
                        token.name
                    ));
                }
            }
        }
    }

    if !stack.is_empty() {
        errors.push(format!("unclosed blocks: {}", stack.join(", ")));
    }

    errors
}

/// Names with at least one exact open token
pub fn open_block_names(source: &str) -> BTreeSet<&str> {
    tokenize_blocks(source)
        .into_iter()
        .filter(|token| token.exact && token.kind == BlockTokenKind::Open)
        .map(|token| token.name)
        .collect()
}

/// Find the first balanced `name` block whose open token starts at or after `from`.
///
/// Returns `None` when no open token exists or when its depth never returns
/// to zero; a malformed block is never partially matched.
pub fn find_balanced_block(source: &str, name: &str, from: usize) -> Option<BlockRange> {
    let tokens = tokenize_blocks(source);
    let first = tokens.iter().position(|token| {
        token.start >= from && token.kind == BlockTokenKind::Open && token.is_named(name)
    })?;
    let open = &tokens[first];

    let mut depth: usize = 0;
    for token in tokens[first..].iter().filter(|token| token.is_named(name)) {
        match token.kind {
            BlockTokenKind::Open => depth += 1,
            BlockTokenKind::Close => {
                depth -= 1;
                if depth == 0 {
                    return Some(BlockRange {
                        start: open.start,
                        end: token.end,
                        inner_start: open.end,
                        inner_end: token.start,
                    });
                }
            }
        }
    }

    None
}

/// Replace the first balanced `name` block, tokens included
pub fn replace_first_balanced_block(source: &str, name: &str, replacement: &str) -> String {
    match find_balanced_block(source, name, 0) {
        Some(range) => format!(
            "{}{}{}",
            &source[..range.start],
            replacement,
            &source[range.end..]
        ),
        None => source.to_string(),
    }
}

/// Replace every balanced `name` block with `transform(body)`.
///
/// Scanning resumes after each replacement, so output produced by `transform`
/// is never re-examined.
pub fn replace_all_balanced_blocks<F>(source: &str, name: &str, mut transform: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut html = source.to_string();
    let mut cursor = 0;

    while let Some(range) = find_balanced_block(&html, name, cursor) {
        let replacement = transform(range.inner(&html));
        html = format!(
            "{}{}{}",
            &html[..range.start],
            replacement,
            &html[range.end..]
        );
        cursor = range.start + replacement.len();
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_finds_simple_block() {
        let src = "a{block:Text}body{/block:Text}b";
        let range = find_balanced_block(src, "Text", 0).unwrap();

        assert_eq!(range.outer(src), "{block:Text}body{/block:Text}");
        assert_eq!(range.inner(src), "body");
    }

    #[test]
    fn test_handles_self_nesting() {
        let src = "{block:If}x{block:If}y{/block:If}z{/block:If}tail";
        let range = find_balanced_block(src, "If", 0).unwrap();

        assert_eq!(range.inner(src), "x{block:If}y{/block:If}z");
        assert_eq!(&src[range.end..], "tail");
    }

    #[test]
    fn test_open_token_with_attributes() {
        let src = r#"{block:Posts inlineMediaWidth="500"}p{/block:Posts}"#;
        let range = find_balanced_block(src, "Posts", 0).unwrap();
        assert_eq!(range.inner(src), "p");
    }

    #[test]
    fn test_name_prefix_is_not_a_match() {
        let src = "{block:Photoset}x{/block:Photoset}";
        assert!(find_balanced_block(src, "Photo", 0).is_none());

        let names = open_block_names(src);
        assert!(!names.contains("Photo"));
        assert!(names.contains("Photoset"));
    }

    #[test]
    fn test_suffixed_token_is_not_an_exact_match() {
        let src = "{block:A-x}{block:A}b{/block:A}";
        let range = find_balanced_block(src, "A", 0).unwrap();

        assert_eq!(range.inner(src), "b");
        assert!(open_block_names("{block:A-x}").is_empty());
    }

    #[test]
    fn test_unclosed_block_is_no_match() {
        let src = "{block:Text}{block:Text}{/block:Text}";
        assert!(find_balanced_block(src, "Text", 0).is_none());
    }

    #[test]
    fn test_from_index_skips_earlier_blocks() {
        let src = "{block:A}1{/block:A}{block:A}2{/block:A}";
        let first = find_balanced_block(src, "A", 0).unwrap();
        let second = find_balanced_block(src, "A", first.end).unwrap();

        assert_eq!(second.inner(src), "2");
        assert!(find_balanced_block(src, "A", second.end).is_none());
    }

    #[test]
    fn test_replace_all_keeps_or_drops_bodies() {
        let src = "<{block:A}keep{/block:A}|{block:A}me{/block:A}>";

        let unwrapped = replace_all_balanced_blocks(src, "A", |inner| inner.to_string());
        assert_eq!(unwrapped, "<keep|me>");

        let removed = replace_all_balanced_blocks(src, "A", |_| String::new());
        assert_eq!(removed, "<|>");
    }

    #[test]
    fn test_replace_all_does_not_rescan_replacement() {
        let src = "{block:A}x{/block:A}";
        let out = replace_all_balanced_blocks(src, "A", |inner| format!("{{block:A}}{}{{/block:A}}!", inner));
        assert_eq!(out, "{block:A}x{/block:A}!");
    }

    #[test]
    fn test_replace_first_only_touches_first() {
        let src = "{block:A}1{/block:A}{block:A}2{/block:A}";
        assert_eq!(
            replace_first_balanced_block(src, "A", "-"),
            "-{block:A}2{/block:A}"
        );
        assert_eq!(replace_first_balanced_block(src, "B", "-"), src);
    }

    #[test]
    fn test_tokenize_reports_kinds_in_order() {
        let tokens = tokenize_blocks("{block:A}{block:B x=\"1\"}{/block:B}{/block:A}");
        let summary: Vec<(&str, BlockTokenKind)> =
            tokens.iter().map(|t| (t.name, t.kind)).collect();

        assert_eq!(
            summary,
            vec![
                ("A", BlockTokenKind::Open),
                ("B", BlockTokenKind::Open),
                ("B", BlockTokenKind::Close),
                ("A", BlockTokenKind::Close),
            ]
        );
    }

    #[test]
    fn test_balance_detects_mismatch_and_unclosed() {
        assert!(check_block_balance("{block:A}{block:B}{/block:B}{/block:A}").is_empty());

        let errors = check_block_balance("{block:A}{block:B}{/block:A}");
        assert_eq!(
            errors,
            vec![
                "block mismatch: expected close for B, got A".to_string(),
                "unclosed blocks: A".to_string(),
            ]
        );

        let errors = check_block_balance("{/block:A}");
        assert_eq!(
            errors,
            vec!["block mismatch: expected close for <none>, got A".to_string()]
        );
    }

    #[test]
    fn test_from_index_inside_multibyte_char() {
        let src = "é{block:A}x{/block:A}";
        let range = find_balanced_block(src, "A", 1).unwrap();
        assert_eq!(range.inner(src), "x");
    }
}
