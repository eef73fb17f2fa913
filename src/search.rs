use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Write as _,
    io,
};

use serde::Serialize;
use tracing::{debug, trace};

use crate::{
    error::Result,
    field::Field,
    lesson::{Corpus, Lesson},
    level::Level,
    query::normalize_keywords,
    text_util::{contains_folded, extract_snippet, fold_case, squash_whitespace},
};

/// Snippets printed per result in human output.
pub const MAX_SNIPPETS_PER_RESULT: usize = 2;

/// Snippet fields in display priority, with their headings.
const SNIPPET_DISPLAY: [(Field, &str); 4] = [
    (Field::Description, "Description"),
    (Field::SectionTitle, "Section"),
    (Field::Text, "Content"),
    (Field::CommandDesc, "Command"),
];

/// What to search for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Query keywords; normalized again before matching.
    pub keywords: Vec<String>,
    /// Only consider lessons at exactly this level.
    pub level: Option<Level>,
    /// Keep at most this many results.
    pub limit: Option<usize>,
}

impl SearchParams {
    /// Build parameters from raw query terms.
    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Result<Self> {
        Ok(Self {
            keywords: normalize_keywords(terms)?,
            ..Self::default()
        })
    }

    pub fn with_level(mut self, level: Option<Level>) -> Self {
        self.level = level;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// A lesson that matched every keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub lesson_id: String,
    pub title: String,
    pub level: Level,
    pub duration_minutes: u32,
    pub score: u32,
    pub matched_fields: BTreeSet<Field>,
    pub snippets: BTreeMap<Field, String>,
    pub description: String,
}

/// Which fields each keyword matched in one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonMatch {
    /// Parallel to the keyword list.
    pub per_keyword: Vec<BTreeSet<Field>>,
}

impl LessonMatch {
    /// Union of matched fields across all keywords.
    pub fn matched_fields(&self) -> BTreeSet<Field> {
        self.per_keyword.iter().flatten().copied().collect()
    }

    /// Sum of field weights over every (keyword, field) match.
    ///
    /// A field counts once per keyword no matter how many sections or
    /// commands contain it.
    pub fn score(&self) -> u32 {
        self.per_keyword.iter().flatten().map(|f| f.weight()).sum()
    }
}

/// Match every keyword against every field of `lesson`.
///
/// Returns `None` as soon as one keyword matches no field at all.
pub fn match_lesson<S: AsRef<str>>(
    lesson: &Lesson,
    keywords: &[S],
) -> Option<LessonMatch> {
    let folded: Vec<(Field, Vec<String>)> = Field::ALL
        .into_iter()
        .map(|field| {
            let values =
                field.values(lesson).into_iter().map(fold_case).collect();
            (field, values)
        })
        .collect();

    let mut per_keyword = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.as_ref();
        let fields: BTreeSet<Field> = folded
            .iter()
            .filter(|(_, values)| values.iter().any(|v| v.contains(keyword)))
            .map(|(field, _)| *field)
            .collect();
        if fields.is_empty() {
            trace!(lesson = %lesson.id, keyword, "keyword not found");
            return None;
        }
        per_keyword.push(fields);
    }

    Some(LessonMatch { per_keyword })
}

/// Build one snippet per matched field, skipping the title.
///
/// Free-text fields get an excerpt around the first keyword; short fields
/// are returned whole. Either way the value comes from the first section
/// or command that contains one of the keywords matched for that field.
fn build_snippets<S: AsRef<str>>(
    lesson: &Lesson,
    keywords: &[S],
    matched: &LessonMatch,
) -> BTreeMap<Field, String> {
    let mut snippets = BTreeMap::new();

    for field in matched.matched_fields() {
        if field == Field::Title {
            continue;
        }

        let field_keywords: Vec<&str> = keywords
            .iter()
            .zip(&matched.per_keyword)
            .filter(|(_, fields)| fields.contains(&field))
            .map(|(keyword, _)| keyword.as_ref())
            .collect();

        let Some(value) = field.values(lesson).into_iter().find(|value| {
            field_keywords.iter().any(|k| contains_folded(value, k))
        }) else {
            continue;
        };

        let snippet = if field.is_free_text() {
            extract_snippet(value, field_keywords.as_slice())
        } else {
            Some(value.to_string())
        };
        if let Some(snippet) = snippet {
            snippets.insert(field, snippet);
        }
    }

    snippets
}

/// Execute a keyword search over `corpus`.
///
/// 1. Restrict to lessons at `params.level` (exact match), if given
/// 2. Keep lessons where every keyword matches some field
/// 3. Score by field weight and attach snippets
/// 4. Sort by score, highest first; equal scores keep corpus order
/// 5. Truncate to `params.limit`, if given
///
/// No matches is an empty vector, not an error.
pub fn execute_search(
    params: &SearchParams,
    corpus: &Corpus,
) -> Result<Vec<SearchResult>> {
    let keywords = normalize_keywords(params.keywords.as_slice())?;
    debug!(
        ?keywords,
        level = ?params.level,
        lessons = corpus.len(),
        "searching lessons"
    );

    let mut results: Vec<SearchResult> = corpus
        .iter()
        .filter(|lesson| params.level.is_none_or(|level| lesson.level == level))
        .filter_map(|lesson| {
            let matched = match_lesson(lesson, keywords.as_slice())?;
            let score = matched.score();
            (score > 0).then(|| SearchResult {
                lesson_id: lesson.id.clone(),
                title: lesson.title.clone(),
                level: lesson.level,
                duration_minutes: lesson.duration_minutes,
                score,
                matched_fields: matched.matched_fields(),
                snippets: build_snippets(lesson, keywords.as_slice(), &matched),
                description: lesson.description.clone(),
            })
        })
        .collect();

    // Stable sort: ties stay in corpus order.
    results.sort_by(|a, b| b.score.cmp(&a.score));

    if let Some(limit) = params.limit {
        results.truncate(limit);
    }

    debug!(results = results.len(), "search complete");
    Ok(results)
}

/// Search `corpus` with a raw query string.
pub fn search(
    corpus: &Corpus,
    query: &str,
    level: Option<Level>,
) -> Result<Vec<SearchResult>> {
    let params = SearchParams::from_terms(&[query])?.with_level(level);
    execute_search(&params, corpus)
}

/// Render results for a terminal.
///
/// Lessons in `completed` are marked with a check.
pub fn render_human(
    results: &[SearchResult],
    params: &SearchParams,
    completed: &BTreeSet<String>,
) -> String {
    let mut out = String::new();
    let query = params.keywords.join(", ");

    if results.is_empty() {
        let _ = writeln!(out, "No lessons found matching: {query}");
        let _ = writeln!(out, "\nTry:");
        let _ = writeln!(out, "  - Using fewer or different keywords");
        if params.level.is_some() {
            let _ = writeln!(out, "  - Searching without the --level filter");
        }
        let _ = writeln!(
            out,
            "  - Running 'linuxtutor lessons' to browse all lessons"
        );
        return out;
    }

    let plural = if results.len() == 1 { "" } else { "s" };
    let _ = writeln!(
        out,
        "Found {} lesson{plural} matching: {query}\n",
        results.len()
    );

    for (i, r) in results.iter().enumerate() {
        let done = if completed.contains(&r.lesson_id) {
            " ✓"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{}. [{}] {} (Score: {}){done}",
            i + 1,
            r.level.title(),
            r.title,
            r.score
        );
        let _ = writeln!(out, "   Lesson: {}", r.lesson_id);
        let _ = writeln!(out, "   Duration: {} minutes", r.duration_minutes);
        let matched: Vec<&str> =
            r.matched_fields.iter().map(|f| f.name()).collect();
        let _ = writeln!(out, "   Matched in: {}", matched.join(", "));

        for (snippet, heading) in SNIPPET_DISPLAY
            .iter()
            .filter_map(|(field, heading)| {
                r.snippets.get(field).map(|s| (s, heading))
            })
            .take(MAX_SNIPPETS_PER_RESULT)
        {
            let _ = writeln!(out, "\n   {heading}:");
            let _ = writeln!(out, "   \"{}\"", squash_whitespace(snippet));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "To start a lesson, run: linuxtutor lesson <lesson-id>");
    out
}

/// Format results for human-readable terminal output.
pub fn format_human(
    results: &[SearchResult],
    params: &SearchParams,
    completed: &BTreeSet<String>,
) {
    print!("{}", render_human(results, params, completed));
}

#[derive(Debug, Serialize)]
struct SearchResponse<'a> {
    keywords: &'a [String],
    level: Option<Level>,
    result_count: usize,
    results: &'a [SearchResult],
}

/// Render results as a JSON document.
pub fn render_json(
    results: &[SearchResult],
    params: &SearchParams,
) -> Result<String> {
    Ok(serde_json::to_string_pretty(&SearchResponse {
        keywords: &params.keywords,
        level: params.level,
        result_count: results.len(),
        results,
    })?)
}

/// Format results as JSON output.
pub fn format_json(results: &[SearchResult], params: &SearchParams) -> Result<()> {
    write_json(&mut std::io::stdout().lock(), results, params)
}

/// Write the JSON response to `out`, followed by a newline.
pub fn write_json<W: io::Write>(
    out: &mut W,
    results: &[SearchResult],
    params: &SearchParams,
) -> Result<()> {
    writeln!(out, "{}", render_json(results, params)?)?;
    out.flush()?;
    Ok(())
}
