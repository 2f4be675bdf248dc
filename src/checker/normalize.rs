// src/checker/normalize.rs
// =============================================================================
// Cleaning up and classifying raw link targets.
//
// normalize() -> is_ignored() -> classify()
//
// Links in Markdown are often escaped (&amp;) or wrapped in angle brackets
// so they can contain spaces. normalize() undoes both so the rest of the
// checker works with the target the author meant.
// =============================================================================

use url::Url;

/// What kind of check a link needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A path in the repository, optionally with a #anchor
    Local,
    /// An http:// or https:// URL
    Remote,
    /// Any other scheme (ftp:, javascript:, ...)
    Unsupported,
}

// Prefixes of links we never check. Compared case-insensitively.
const IGNORED_PREFIXES: &[&str] = &["#", "mailto:", "tel:", "data:"];

/// Decodes HTML character references, trims whitespace and unwraps `<...>`.
pub fn normalize(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let trimmed = decoded.trim();
    let unwrapped = trimmed
        .strip_prefix('<')
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(trimmed);
    unwrapped.trim().to_string()
}

/// Returns true for links that are skipped entirely: empty links, in-page
/// anchors and mailto:/tel:/data: links.
pub fn is_ignored(link: &str) -> bool {
    let lowered = link.to_lowercase();
    link.is_empty() || IGNORED_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix))
}

/// Classifies a normalized link by its scheme.
pub fn classify(link: &str) -> LinkKind {
    let scheme = match Url::parse(link) {
        Ok(url) => Some(url.scheme().to_string()),
        // No scheme at all: a plain relative path
        Err(url::ParseError::RelativeUrlWithoutBase) => None,
        // Has a scheme but is otherwise malformed, e.g. "https://"
        Err(_) => scheme_of(link).map(str::to_ascii_lowercase),
    };

    match scheme.as_deref() {
        None => LinkKind::Local,
        Some("http") | Some("https") => LinkKind::Remote,
        Some(_) => LinkKind::Unsupported,
    }
}

// RFC 3986: scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"
fn scheme_of(link: &str) -> Option<&str> {
    let (scheme, _) = link.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    let valid = first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}
