use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Difficulty tier of a lesson, ordered from easiest to hardest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Beginner,
        Level::Intermediate,
        Level::Advanced,
        Level::Expert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
            Level::Expert => "expert",
        }
    }

    /// Capitalized name for headings, e.g. "Intermediate".
    pub fn title(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
            Level::Expert => "Expert",
        }
    }

    /// The level that follows this one, or `None` at the top.
    pub fn next(self) -> Option<Level> {
        match self {
            Level::Beginner => Some(Level::Intermediate),
            Level::Intermediate => Some(Level::Advanced),
            Level::Advanced => Some(Level::Expert),
            Level::Expert => None,
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|l| l.as_str()).collect()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == wanted)
            .ok_or_else(|| Error::InvalidLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("beginner".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!(
            "Intermediate".parse::<Level>().unwrap(),
            Level::Intermediate
        );
        assert_eq!(" EXPERT ".parse::<Level>().unwrap(), Level::Expert);
    }

    #[test]
    fn unknown_name_is_invalid_level() {
        let err = "guru".parse::<Level>().unwrap_err();
        assert!(matches!(err, Error::InvalidLevel(ref s) if s == "guru"));
        let msg = err.to_string();
        for name in Level::names() {
            assert!(msg.contains(name), "message should list {name}: {msg}");
        }
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Level::Beginner < Level::Intermediate);
        assert!(Level::Intermediate < Level::Advanced);
        assert!(Level::Advanced < Level::Expert);
    }

    #[test]
    fn next_walks_the_progression() {
        assert_eq!(Level::Beginner.next(), Some(Level::Intermediate));
        assert_eq!(Level::Advanced.next(), Some(Level::Expert));
        assert_eq!(Level::Expert.next(), None);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
    }
}
