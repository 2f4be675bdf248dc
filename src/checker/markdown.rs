// src/checker/markdown.rs
// =============================================================================
// This module extracts links from Markdown text.
//
// Three independent regexes run over the whole document:
// - inline links:          [label](target)      (images ![alt](x) skipped)
// - reference definitions: [id]: target         (at the start of a line)
// - bare URLs:             https://example.com  (anywhere)
//
// The same physical link can be matched by more than one pattern, e.g. the
// URL inside [Rust](https://www.rust-lang.org) is also a bare URL. We keep
// every match; duplicates are folded later, when remote URLs are grouped.
//
// This is NOT a full Markdown parser. Links inside code fences or HTML
// comments are extracted like any other.
// =============================================================================

use regex::Regex;
use std::sync::LazyLock;

use super::normalize::normalize;

// `(!?)` captures an image marker so we can skip images; the regex crate has
// no look-behind. The target is either <angle bracketed> or a lazy run up to
// the closing paren, optionally followed by a "title".
static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?)\[([^\]]+)\]\(\s*(<[^>\n]+>|[^)\n]+?)(?:\s+"[^"\n]*")?\s*\)"#).unwrap()
});

static REFERENCE_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\[[^\]]+\]:\s*(<[^>\n]+>|\S+)").unwrap());

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s)<>\[\]]+").unwrap());

// Sentence punctuation that commonly trails a bare URL in prose
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// One concrete appearance of a link target in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    /// The target exactly as written in the source
    pub raw: String,
    /// The target after entity decoding and trimming
    pub normalized: String,
    /// The [label] of an inline link; None for reference definitions and bare URLs
    pub label: Option<String>,
    /// 1-based line of the target's first character
    pub line: usize,
}

/// Extracts every link occurrence from Markdown text, in pattern order
/// (inline links, then reference definitions, then bare URLs).
///
/// Example:
///   "See [docs](./docs/README.md)\nand https://example.com"
///   -> ./docs/README.md on line 1, https://example.com on line 2
pub fn extract_links(markdown: &str) -> Vec<LinkOccurrence> {
    let newlines = newline_offsets(markdown);
    let mut occurrences = Vec::new();

    for caps in INLINE_LINK.captures_iter(markdown) {
        // caps[1] is "!" for images
        if &caps[1] == "!" {
            continue;
        }
        let Some(target) = caps.get(3) else { continue };
        occurrences.push(occurrence(
            target.as_str(),
            Some(caps[2].to_string()),
            line_for_offset(&newlines, target.start()),
        ));
    }

    for caps in REFERENCE_DEF.captures_iter(markdown) {
        let Some(target) = caps.get(1) else { continue };
        occurrences.push(occurrence(
            target.as_str(),
            None,
            line_for_offset(&newlines, target.start()),
        ));
    }

    for m in BARE_URL.find_iter(markdown) {
        let url = m.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        occurrences.push(occurrence(url, None, line_for_offset(&newlines, m.start())));
    }

    occurrences
}

fn occurrence(raw: &str, label: Option<String>, line: usize) -> LinkOccurrence {
    LinkOccurrence {
        raw: raw.to_string(),
        normalized: normalize(raw),
        label,
        line,
    }
}

// Byte offsets of every '\n', ascending. Regex match offsets are byte
// offsets too, so the two agree even for multi-byte text.
fn newline_offsets(text: &str) -> Vec<usize> {
    text.match_indices('\n').map(|(index, _)| index).collect()
}

// Number of newlines at or before `offset`, plus one
fn line_for_offset(newlines: &[usize], offset: usize) -> usize {
    newlines.partition_point(|&nl| nl <= offset) + 1
}
