/// SQLite-backed key/value store, the client's stand-in for browser local storage.
///
/// Holds display hints only (e.g. the last seen transfer count); the contract
/// stays the source of truth.
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Key under which the mirrored contract counter is kept.
pub const TRANSACTION_COUNT_KEY: &str = "transactionCount";

pub struct LocalStore {
    conn: Mutex<Connection>,
}

/// Default DB location: platform data directory + `krypt/storage.db`
fn default_db_path() -> Result<PathBuf> {
    Ok(crate::data_dir()?.join("storage.db"))
}

/// Directory that has to exist before the DB file is opened. A bare file name
/// lives in the working directory and needs none.
fn storage_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

impl LocalStore {
    /// Open (or create) the store in the data directory.
    pub fn open() -> Result<Self> {
        Self::open_at(&default_db_path()?)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = storage_dir(path) {
            std::fs::create_dir_all(parent).context("Failed to create storage directory")?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }
        let conn = Connection::open(path).context("Failed to open local storage database")?;
        Self::init(conn)
    }

    /// Open an in-memory store (nothing survives the process).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key    TEXT PRIMARY KEY,
                value  TEXT NOT NULL
            );",
        )
        .context("Failed to initialize storage schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("Local storage lock poisoned"))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn()?
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read '{key}' from local storage"))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn()?
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT (key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("Failed to write '{key}' to local storage"))?;
        Ok(())
    }

    /// The mirrored transfer count. Unparseable values read as absent.
    pub fn transaction_count(&self) -> Result<Option<u64>> {
        Ok(self
            .get(TRANSACTION_COUNT_KEY)?
            .and_then(|v| v.trim().parse::<u64>().ok()))
    }

    pub fn set_transaction_count(&self, count: u64) -> Result<()> {
        self.set(TRANSACTION_COUNT_KEY, &count.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_has_no_storage_dir() {
        assert_eq!(storage_dir(Path::new("storage.db")), None);
        assert_eq!(
            storage_dir(Path::new("data/storage.db")),
            Some(Path::new("data"))
        );
    }

    #[test]
    fn missing_key_is_none() {
        let store = LocalStore::open_in_memory().unwrap();
        assert_eq!(store.get("nope").unwrap(), None);
        assert_eq!(store.transaction_count().unwrap(), None);
    }

    #[test]
    fn set_overwrites() {
        let store = LocalStore::open_in_memory().unwrap();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn count_is_stored_as_decimal_string() {
        let store = LocalStore::open_in_memory().unwrap();
        store.set_transaction_count(42).unwrap();
        assert_eq!(store.get(TRANSACTION_COUNT_KEY).unwrap().as_deref(), Some("42"));
        assert_eq!(store.transaction_count().unwrap(), Some(42));
    }

    #[test]
    fn garbage_count_reads_as_absent() {
        let store = LocalStore::open_in_memory().unwrap();
        store.set(TRANSACTION_COUNT_KEY, "null").unwrap();
        assert_eq!(store.transaction_count().unwrap(), None);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.db");
        LocalStore::open_at(&path)
            .unwrap()
            .set_transaction_count(7)
            .unwrap();
        let reopened = LocalStore::open_at(&path).unwrap();
        assert_eq!(reopened.transaction_count().unwrap(), Some(7));
    }
}
