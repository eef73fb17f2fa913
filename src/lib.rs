//! linuxtutor - an interactive command-line tutor for learning Linux.
//!
//! Lessons are bundled with the binary and grouped into four levels.
//! Learner progress is kept in a small [redb](https://github.com/cberner/redb)
//! database, and lesson content can be searched by keyword.
//!
//! # Quick start
//!
//! ```
//! use linuxtutor::{Corpus, Level};
//! use linuxtutor::search::{self, SearchParams};
//!
//! let corpus = Corpus::builtin().unwrap();
//!
//! let params = SearchParams::from_terms(&["file", "security"])
//!     .unwrap()
//!     .with_level(Some(Level::Advanced));
//!
//! let results = search::execute_search(&params, &corpus).unwrap();
//! for r in &results {
//!     println!("{} (score: {})", r.lesson_id, r.score);
//! }
//! assert!(results.iter().any(|r| r.lesson_id == "security-basics"));
//! ```

pub mod cli;
pub mod data_dir;
pub mod error;
pub mod field;
pub mod lesson;
pub mod level;
pub mod progress_db;
pub mod query;
pub mod search;
pub mod selector;
pub mod text_util;

pub use data_dir::DataDir;
pub use error::{Error, Result};
pub use field::Field;
pub use lesson::{Corpus, Lesson};
pub use level::Level;
pub use progress_db::ProgressDb;
pub use search::{SearchParams, SearchResult};
