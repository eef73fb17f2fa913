/// Characters of context kept on each side of a keyword in a snippet.
pub const SNIPPET_CONTEXT_CHARS: usize = 50;

/// Maximum number of characters in a snippet, excluding ellipses.
pub const SNIPPET_MAX_CHARS: usize = 160;

/// Marker added where a snippet was cut from a longer text.
pub const ELLIPSIS: &str = "...";

/// Case-fold text the same way keywords are folded.
///
/// Folding is per character so that positions in the folded text can be
/// mapped back to the source (see [`find_folded`]).
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Case-insensitive substring test against an already folded keyword.
pub fn contains_folded(text: &str, keyword: &str) -> bool {
    fold_case(text).contains(keyword)
}

/// Locate the first case-insensitive occurrence of a folded `keyword`.
///
/// Returns the `(start, end)` character range in the original `text`.
pub fn find_folded(text: &str, keyword: &str) -> Option<(usize, usize)> {
    if keyword.is_empty() {
        return None;
    }

    // origin[b] is the source character index that produced folded byte b.
    let mut folded = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (idx, c) in text.chars().enumerate() {
        for lower in c.to_lowercase() {
            let before = folded.len();
            folded.push(lower);
            origin.extend(std::iter::repeat_n(idx, folded.len() - before));
        }
    }

    let start = folded.find(keyword)?;
    let end = start + keyword.len();
    Some((origin[start], origin[end - 1] + 1))
}

/// Extract an excerpt of `text` around the earliest occurrence of any of
/// the folded `keywords`.
///
/// Texts of at most [`SNIPPET_MAX_CHARS`] characters are returned whole.
/// Longer texts are cut to a window of [`SNIPPET_CONTEXT_CHARS`] on each
/// side of the keyword, capped at [`SNIPPET_MAX_CHARS`], with [`ELLIPSIS`]
/// marking each cut edge. The keyword itself is never cut and keeps its
/// original casing. Returns `None` if no keyword occurs in `text`.
pub fn extract_snippet<S: AsRef<str>>(
    text: &str,
    keywords: &[S],
) -> Option<String> {
    let (start, end) = keywords
        .iter()
        .filter_map(|k| find_folded(text, k.as_ref()))
        .min_by_key(|&(start, _)| start)?;

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= SNIPPET_MAX_CHARS {
        return Some(text.to_string());
    }

    let from = start.saturating_sub(SNIPPET_CONTEXT_CHARS);
    let mut to = (end + SNIPPET_CONTEXT_CHARS).min(chars.len());
    if to - from > SNIPPET_MAX_CHARS {
        to = (from + SNIPPET_MAX_CHARS).max(end);
    }

    let mut snippet = String::new();
    if from > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[from..to]);
    if to < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    Some(snippet)
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
