use once_cell::sync::Lazy;
use regex::Regex;

static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+?)\]\]").expect("valid wiki link regex"));

/// Extracts every `[[target]]` reference from a note body, in document order.
/// Unbalanced or empty brackets simply produce no match for that occurrence.
pub(super) fn extract_links(content: &str) -> Vec<String> {
    WIKI_LINK_RE
        .captures_iter(content)
        .map(|capture| capture[1].to_owned())
        .collect()
}
