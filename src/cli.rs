use std::{num::NonZeroUsize, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "linuxtutor",
    about = "An interactive command-line tutor for learning Linux"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start or resume learning
    Start,
    /// Show current progress and level
    Status,
    /// List lessons for the current or a given level
    Lessons(LessonsArgs),
    /// Show a lesson and make it the current one
    Lesson(LessonArgs),
    /// Mark a lesson as completed
    Complete(CompleteArgs),
    /// Set the current learning level
    Level(LevelArgs),
    /// Search lessons by keyword (all keywords must match)
    Search(SearchArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Lessons --

#[derive(Debug, Parser)]
pub struct LessonsArgs {
    /// Level to list (beginner, intermediate, advanced, expert)
    pub level: Option<String>,
}

// -- Lesson --

#[derive(Debug, Parser)]
pub struct LessonArgs {
    /// Lesson id, e.g. intro-to-terminal
    pub name: String,

    /// Start even if prerequisites are not completed
    #[arg(long)]
    pub force: bool,
}

// -- Complete --

#[derive(Debug, Parser)]
pub struct CompleteArgs {
    /// Lesson id to mark as completed
    pub name: String,
}

// -- Level --

#[derive(Debug, Parser)]
pub struct LevelArgs {
    /// Learning level (beginner, intermediate, advanced, expert)
    pub level: String,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Keywords to search for
    #[arg(required = true, num_args = 1..)]
    pub keywords: Vec<String>,

    /// Only show lessons at this level
    #[arg(short = 'l', long)]
    pub level: Option<String>,

    /// Maximum number of results to show
    #[arg(short = 'n', long)]
    pub limit: Option<NonZeroUsize>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "linuxtutor",
            &mut std::io::stdout(),
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_search_defaults() {
        let cli = Cli::parse_from(["linuxtutor", "search", "file", "security"]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.keywords, ["file", "security"]);
                assert_eq!(args.level, None);
                assert_eq!(args.limit, None);
                assert!(!args.json);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn parse_search_level_short_flag() {
        let cli = Cli::parse_from([
            "linuxtutor",
            "search",
            "process",
            "-l",
            "intermediate",
        ]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.keywords, ["process"]);
                assert_eq!(args.level.as_deref(), Some("intermediate"));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn search_limit_must_be_positive() {
        assert!(
            Cli::try_parse_from(["linuxtutor", "search", "file", "-n", "0"])
                .is_err()
        );
        let cli = Cli::parse_from(["linuxtutor", "search", "file", "-n", "2"]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.limit.map(NonZeroUsize::get), Some(2));
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn search_requires_a_keyword() {
        assert!(Cli::try_parse_from(["linuxtutor", "search"]).is_err());
    }

    #[test]
    fn parse_lesson_force_and_global_flags() {
        let cli = Cli::parse_from([
            "linuxtutor",
            "lesson",
            "shell-scripting",
            "--force",
            "-vv",
            "--data-dir",
            "/tmp/lt",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/lt")));
        match cli.command {
            Command::Lesson(args) => {
                assert_eq!(args.name, "shell-scripting");
                assert!(args.force);
            }
            _ => panic!("expected lesson command"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
