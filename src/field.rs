use std::fmt;

use serde::Serialize;

use crate::lesson::Lesson;

/// A searchable text component of a lesson.
///
/// Variants are declared in display order, so ordered collections of
/// fields list them from most to least prominent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Description,
    SectionTitle,
    Text,
    Command,
    CommandDesc,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Description,
        Field::SectionTitle,
        Field::Text,
        Field::Command,
        Field::CommandDesc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::SectionTitle => "section_title",
            Field::Text => "text",
            Field::Command => "command",
            Field::CommandDesc => "command_desc",
        }
    }

    /// Relevance weight added once per keyword that matches this field.
    pub fn weight(self) -> u32 {
        match self {
            Field::Title => 10,
            Field::Description => 6,
            Field::SectionTitle => 5,
            Field::Command => 4,
            Field::CommandDesc => 3,
            Field::Text => 2,
        }
    }

    /// Long prose fields get an excerpt; short fields are shown whole.
    pub fn is_free_text(self) -> bool {
        matches!(self, Field::Description | Field::Text | Field::CommandDesc)
    }

    /// Every value this field takes in `lesson`, in section/command order.
    pub fn values(self, lesson: &Lesson) -> Vec<&str> {
        match self {
            Field::Title => vec![lesson.title.as_str()],
            Field::Description => vec![lesson.description.as_str()],
            Field::SectionTitle => {
                lesson.sections.iter().map(|s| s.title.as_str()).collect()
            }
            Field::Text => lesson
                .sections
                .iter()
                .map(|s| s.text.as_str())
                .filter(|t| !t.is_empty())
                .collect(),
            Field::Command => lesson
                .sections
                .iter()
                .flat_map(|s| &s.commands)
                .map(|c| c.command.as_str())
                .collect(),
            Field::CommandDesc => lesson
                .sections
                .iter()
                .flat_map(|s| &s.commands)
                .map(|c| c.description.as_str())
                .collect(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
