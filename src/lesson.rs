//! The lesson corpus: lessons, their sections, and practice commands.
//!
//! The corpus is read-only once loaded. Lessons keep the order they were
//! declared in, which is also the tie-break order for search ranking.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    level::Level,
};

const BUILTIN_LESSONS: &str = include_str!("../data/lessons.json");

/// Whether a section is read-only explanation or a hands-on exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    #[default]
    Explanation,
    Exercise,
}

/// A practice or reference command inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Command {
    /// The literal command line, e.g. `ls -la`.
    pub command: String,
    /// What the command does.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub kind: SectionKind,
    pub title: String,
    /// Prose body; for exercises this is the instructions line.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub level: Level,
    pub duration_minutes: u32,
    pub description: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Lesson {
    /// Number of exercise sections, credited when the lesson is completed.
    pub fn exercise_count(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| s.kind == SectionKind::Exercise)
            .count()
    }

    /// The id rendered as a heading, e.g. `file-permissions` -> `File Permissions`.
    pub fn display_name(id: &str) -> String {
        id.split('-')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().chain(chars).collect::<String>()
                    }
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Deserialize)]
struct CorpusFile {
    lessons: Vec<Lesson>,
}

/// An ordered, validated collection of lessons.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    lessons: Vec<Lesson>,
}

impl Corpus {
    /// Build a corpus from lessons, checking ids and prerequisites.
    pub fn new(lessons: Vec<Lesson>) -> Result<Self> {
        let corpus = Self { lessons };
        corpus.validate()?;
        Ok(corpus)
    }

    /// Parse and validate a corpus from its JSON form.
    ///
    /// The document is an object with a `lessons` array; see
    /// `data/lessons.json` for the layout.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CorpusFile = serde_json::from_str(json)?;
        Self::new(file.lessons)
    }

    /// The lessons bundled with the binary.
    pub fn builtin() -> Result<Self> {
        let corpus = Self::from_json(BUILTIN_LESSONS)?;
        debug!(lessons = corpus.len(), "loaded builtin corpus");
        Ok(corpus)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for lesson in &self.lessons {
            if lesson.id.trim().is_empty() {
                return Err(Error::Corpus(format!(
                    "lesson '{}' has an empty id",
                    lesson.title
                )));
            }
            if !seen.insert(lesson.id.as_str()) {
                return Err(Error::Corpus(format!(
                    "duplicate lesson id '{}'",
                    lesson.id
                )));
            }
            if lesson.duration_minutes == 0 {
                return Err(Error::Corpus(format!(
                    "lesson '{}' has a zero duration",
                    lesson.id
                )));
            }
        }

        for lesson in &self.lessons {
            if let Some(missing) = lesson
                .prerequisites
                .iter()
                .find(|p| !seen.contains(p.as_str()))
            {
                return Err(Error::Corpus(format!(
                    "lesson '{}' requires unknown lesson '{missing}'",
                    lesson.id
                )));
            }
        }

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lesson> {
        self.lessons.iter()
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Lesson;
    type IntoIter = std::slice::Iter<'a, Lesson>;

    fn into_iter(self) -> Self::IntoIter {
        self.lessons.iter()
    }
}
