use crate::{
    error::{Error, Result},
    text_util::fold_case,
};

/// Turn raw query terms into distinct, case-folded keywords.
///
/// Each term is split on whitespace, so `["file security"]` and
/// `["file", "security"]` normalize identically. Order of first
/// appearance is kept; repeats are dropped so they cannot inflate scores.
pub fn normalize_keywords<S: AsRef<str>>(terms: &[S]) -> Result<Vec<String>> {
    let mut keywords: Vec<String> = Vec::new();
    for token in terms.iter().flat_map(|t| t.as_ref().split_whitespace()) {
        let keyword = fold_case(token);
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    if keywords.is_empty() {
        return Err(Error::EmptyQuery);
    }
    Ok(keywords)
}

/// Convenience wrapper for a single raw query string.
pub fn parse_query(query: &str) -> Result<Vec<String>> {
    normalize_keywords(&[query])
}
