use std::{
    collections::BTreeSet,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use tracing::debug;

use crate::{error::Result, level::Level};

/// Completed lesson id -> completion time in unix seconds.
const COMPLETED: TableDefinition<&str, u64> = TableDefinition::new("completed");
const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");
const STATS: TableDefinition<&str, u64> = TableDefinition::new("stats");

const CURRENT_LEVEL: &str = "current_level";
const CURRENT_LESSON: &str = "current_lesson";
const FIRST_TIME: &str = "first_time";
const EXERCISES_COMPLETED: &str = "exercises_completed";

/// Persistent learner progress.
pub struct ProgressDb {
    db: Database,
}

impl ProgressDb {
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path)?;

        // Ensure all tables exist by opening them in a write transaction.
        let txn = db.begin_write()?;
        txn.open_table(COMPLETED)?;
        txn.open_table(SETTINGS)?;
        txn.open_table(STATS)?;
        txn.commit()?;

        Ok(Self { db })
    }

    // -- Settings --

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SETTINGS)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    fn remove_setting(&self, key: &str) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(SETTINGS)?;
            table.remove(key)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    /// The learner's level; beginner until one is chosen.
    pub fn current_level(&self) -> Result<Level> {
        match self.get_setting(CURRENT_LEVEL)? {
            Some(name) => name.parse(),
            None => Ok(Level::default()),
        }
    }

    pub fn set_level(&self, level: Level) -> Result<()> {
        debug!(%level, "setting current level");
        self.set_setting(CURRENT_LEVEL, level.as_str())
    }

    pub fn current_lesson(&self) -> Result<Option<String>> {
        self.get_setting(CURRENT_LESSON)
    }

    pub fn set_current_lesson(&self, lesson_id: &str) -> Result<()> {
        self.set_setting(CURRENT_LESSON, lesson_id)
    }

    pub fn clear_current_lesson(&self) -> Result<bool> {
        self.remove_setting(CURRENT_LESSON)
    }

    pub fn is_first_time(&self) -> Result<bool> {
        Ok(self.get_setting(FIRST_TIME)?.is_none_or(|v| v != "false"))
    }

    pub fn mark_not_first_time(&self) -> Result<()> {
        self.set_setting(FIRST_TIME, "false")
    }

    // -- Completed lessons --

    /// Record a lesson as completed and clear the current lesson.
    ///
    /// Returns `true` if the lesson was not already completed.
    pub fn mark_complete(&self, lesson_id: &str) -> Result<bool> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        let txn = self.db.begin_write()?;
        let newly = {
            let mut table = txn.open_table(COMPLETED)?;
            let known = table.get(lesson_id)?.is_some();
            if !known {
                table.insert(lesson_id, now)?;
            }
            !known
        };
        {
            let mut settings = txn.open_table(SETTINGS)?;
            settings.remove(CURRENT_LESSON)?;
        }
        txn.commit()?;

        debug!(lesson = lesson_id, newly, "lesson marked complete");
        Ok(newly)
    }

    pub fn is_completed(&self, lesson_id: &str) -> Result<bool> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(COMPLETED)?;
        Ok(table.get(lesson_id)?.is_some())
    }

    pub fn completed_lessons(&self) -> Result<BTreeSet<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(COMPLETED)?;
        let mut result = BTreeSet::new();
        for entry in table.iter()? {
            let (k, _v) = entry?;
            result.insert(k.value().to_string());
        }
        Ok(result)
    }

    // -- Stats --

    /// Add to the exercise counter, returning the new total.
    pub fn add_exercises(&self, count: u64) -> Result<u64> {
        let txn = self.db.begin_write()?;
        let total = {
            let mut table = txn.open_table(STATS)?;
            let current = table
                .get(EXERCISES_COMPLETED)?
                .map(|v| v.value())
                .unwrap_or(0);
            let total = current.saturating_add(count);
            table.insert(EXERCISES_COMPLETED, total)?;
            total
        };
        txn.commit()?;
        Ok(total)
    }

    pub fn exercises_completed(&self) -> Result<u64> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(STATS)?;
        Ok(table
            .get(EXERCISES_COMPLETED)?
            .map(|v| v.value())
            .unwrap_or(0))
    }
}

impl std::fmt::Debug for ProgressDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressDb").finish_non_exhaustive()
    }
}
