use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

/// Browser-style key/value store, kept in a small SQLite file.
pub struct LocalStorage {
    conn: Connection,
    path: PathBuf,
}

impl LocalStorage {
    pub fn open(data_dir: Option<&Path>) -> Result<Self> {
        let path = match data_dir {
            Some(dir) => dir.join("storage.db"),
            None => Self::default_path(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("Failed to open storage at {}", path.display()))?;
        let storage = Self { conn, path };
        storage.init()?;
        Ok(storage)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let storage = Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        };
        storage.init()?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_path() -> PathBuf {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "seekjob") {
            proj_dirs.data_dir().join("storage.db")
        } else {
            PathBuf::from("seekjob.db")
        }
    }

    fn init(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
            )
            .context("Failed to initialize local storage")?;
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read '{}'", key))
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                params![key, value],
            )
            .with_context(|| format!("Failed to write '{}'", key))?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])
            .with_context(|| format!("Failed to remove '{}'", key))?;
        Ok(removed > 0)
    }
}
