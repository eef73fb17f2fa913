//! Lesson selection: what to study next and what is still locked.

use std::collections::BTreeSet;

use crate::{
    lesson::{Corpus, Lesson},
    level::Level,
};

/// How many similar ids to suggest for an unknown lesson name.
pub const MAX_SIMILAR_LESSONS: usize = 3;

/// Ids of all lessons at `level`, sorted alphabetically.
pub fn lessons_by_level(corpus: &Corpus, level: Level) -> Vec<&str> {
    let mut ids: Vec<&str> = corpus
        .iter()
        .filter(|l| l.level == level)
        .map(|l| l.id.as_str())
        .collect();
    ids.sort_unstable();
    ids
}

/// Prerequisites of `lesson` not yet in `completed`, in declared order.
pub fn missing_prerequisites<'a>(
    lesson: &'a Lesson,
    completed: &BTreeSet<String>,
) -> Vec<&'a str> {
    lesson
        .prerequisites
        .iter()
        .filter(|p| !completed.contains(p.as_str()))
        .map(String::as_str)
        .collect()
}

/// First uncompleted lesson at `level` (alphabetically) whose
/// prerequisites are all completed.
pub fn next_available_lesson<'a>(
    corpus: &'a Corpus,
    level: Level,
    completed: &BTreeSet<String>,
) -> Option<&'a Lesson> {
    lessons_by_level(corpus, level)
        .into_iter()
        .filter(|id| !completed.contains(*id))
        .filter_map(|id| corpus.get(id))
        .find(|lesson| missing_prerequisites(lesson, completed).is_empty())
}

/// Lesson ids containing `name`, case-insensitively, in corpus order.
pub fn find_similar_lessons<'a>(
    corpus: &'a Corpus,
    name: &str,
    max_results: usize,
) -> Vec<&'a str> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    corpus
        .iter()
        .map(|l| l.id.as_str())
        .filter(|id| id.to_lowercase().contains(&needle))
        .take(max_results)
        .collect()
}

/// Uncompleted lessons at `level` that still have missing prerequisites,
/// as `(title, missing)` pairs.
pub fn blocked_lessons<'a>(
    corpus: &'a Corpus,
    level: Level,
    completed: &BTreeSet<String>,
) -> Vec<(&'a str, Vec<&'a str>)> {
    corpus
        .iter()
        .filter(|l| l.level == level && !completed.contains(&l.id))
        .filter_map(|l| {
            let missing = missing_prerequisites(l, completed);
            (!missing.is_empty()).then_some((l.title.as_str(), missing))
        })
        .collect()
}

/// Whether every lesson at `level` is completed.
pub fn level_complete(
    corpus: &Corpus,
    level: Level,
    completed: &BTreeSet<String>,
) -> bool {
    corpus
        .iter()
        .filter(|l| l.level == level)
        .all(|l| completed.contains(&l.id))
}
