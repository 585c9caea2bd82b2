//! List/Command persistence using SQLite
//!
//! Two tables: `users` maps a Telegram id to its pending command tag
//! (empty string = idle), `lists` holds one row per stored value. A
//! list is the multiset of values sharing `(telegram_id, key)`;
//! retrieval order is unspecified.

use std::sync::Mutex;

use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::{Error, Result};

/// What the user's next free-text message will be interpreted as.
///
/// Stored in the `users` table as a stable string tag; unknown tags
/// decode to [`PendingCommand::Idle`], so a stray command never leaves
/// a user wedged in an unreachable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingCommand {
    /// No pending command
    #[default]
    Idle,
    /// Awaiting "name value" input for a list append
    Save,
    /// Awaiting a list name to fetch
    GetList,
    /// Awaiting text to encode as a QR code
    QrCode,
    /// Awaiting text to echo back
    Ping,
}

impl PendingCommand {
    /// Stable tag stored in the database
    pub fn as_tag(self) -> &'static str {
        match self {
            PendingCommand::Idle => "",
            PendingCommand::Save => "save",
            PendingCommand::GetList => "getlist",
            PendingCommand::QrCode => "qrcode",
            PendingCommand::Ping => "ping",
        }
    }

    /// Decode a stored tag; anything unrecognized is `Idle`
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "save" => PendingCommand::Save,
            "getlist" => PendingCommand::GetList,
            "qrcode" => PendingCommand::QrCode,
            "ping" => PendingCommand::Ping,
            _ => PendingCommand::Idle,
        }
    }
}

/// SQLite-based store for pending commands and named lists
pub struct ListStore {
    // Mutex rather than a pool: every query here is a point read or a
    // single-row write, and handlers never hold the lock across an await.
    conn: Mutex<Connection>,
}

impl ListStore {
    /// Open (or create) the store at the given database path
    pub fn new(db_path: &str) -> Result<Self> {
        debug!("Opening list database at: {}", db_path);
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_tables()?;
        info!("ListStore initialized successfully");
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_tables()?;
        Ok(store)
    }

    /// Initialize database tables (idempotent)
    fn init_tables(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                telegram_id INTEGER NOT NULL UNIQUE,
                command TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS lists (
                id INTEGER PRIMARY KEY,
                telegram_id INTEGER NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Read the pending command for a user; a user with no row is idle
    pub fn pending_command(&self, user_id: i64) -> Result<PendingCommand> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT command FROM users WHERE telegram_id = ?1")?;
        match stmt.query_row(params![user_id], |row| row.get::<_, String>(0)) {
            Ok(tag) => Ok(PendingCommand::from_tag(&tag)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(PendingCommand::Idle),
            Err(e) => Err(e.into()),
        }
    }

    /// Set the pending command for a user (idempotent upsert)
    pub fn set_pending_command(&self, user_id: i64, command: PendingCommand) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO users (telegram_id, command) VALUES (?1, ?2)",
            params![user_id, command.as_tag()],
        )?;
        debug!("Set pending command {:?} for user {}", command, user_id);
        Ok(())
    }

    /// Clear the pending command for a user
    pub fn clear_pending_command(&self, user_id: i64) -> Result<()> {
        self.set_pending_command(user_id, PendingCommand::Idle)
    }

    /// Append one value to a named list. Does not deduplicate; empty
    /// keys and values are stored as-is.
    pub fn append_value(&self, user_id: i64, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO lists (telegram_id, key, value) VALUES (?1, ?2, ?3)",
            params![user_id, key, value],
        )?;
        debug!("Appended to list '{}' for user {}", key, user_id);
        Ok(())
    }

    /// All values of a named list; fails with [`Error::EmptyList`]
    /// when no rows match
    pub fn list_values(&self, user_id: i64, key: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT value FROM lists WHERE telegram_id = ?1 AND key = ?2")?;
        let values = stmt
            .query_map(params![user_id, key], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if values.is_empty() {
            return Err(Error::EmptyList);
        }
        Ok(values)
    }

    /// The distinct list names a user has; fails with
    /// [`Error::EmptyList`] when the user has no lists at all
    pub fn list_keys(&self, user_id: i64) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt =
            conn.prepare("SELECT key FROM lists WHERE telegram_id = ?1 GROUP BY key")?;
        let keys = stmt
            .query_map(params![user_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        if keys.is_empty() {
            return Err(Error::EmptyList);
        }
        Ok(keys)
    }

    /// Delete every value of a named list; succeeds when none existed
    pub fn delete_list(&self, user_id: i64, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM lists WHERE telegram_id = ?1 AND key = ?2",
            params![user_id, key],
        )?;
        debug!("Deleted list '{}' ({} rows) for user {}", key, deleted, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_command_roundtrip() {
        let store = ListStore::in_memory().unwrap();

        store.set_pending_command(7, PendingCommand::Save).unwrap();
        assert_eq!(store.pending_command(7).unwrap(), PendingCommand::Save);

        // Upsert overwrites
        store.set_pending_command(7, PendingCommand::Ping).unwrap();
        assert_eq!(store.pending_command(7).unwrap(), PendingCommand::Ping);
    }

    #[test]
    fn test_missing_user_is_idle() {
        let store = ListStore::in_memory().unwrap();
        assert_eq!(store.pending_command(99).unwrap(), PendingCommand::Idle);
    }

    #[test]
    fn test_clear_equals_set_idle() {
        let store = ListStore::in_memory().unwrap();

        store.set_pending_command(1, PendingCommand::QrCode).unwrap();
        store.clear_pending_command(1).unwrap();
        assert_eq!(store.pending_command(1).unwrap(), PendingCommand::Idle);

        store.set_pending_command(2, PendingCommand::QrCode).unwrap();
        store.set_pending_command(2, PendingCommand::Idle).unwrap();
        assert_eq!(store.pending_command(2).unwrap(), PendingCommand::Idle);
    }

    #[test]
    fn test_tag_roundtrip() {
        for cmd in [
            PendingCommand::Idle,
            PendingCommand::Save,
            PendingCommand::GetList,
            PendingCommand::QrCode,
            PendingCommand::Ping,
        ] {
            assert_eq!(PendingCommand::from_tag(cmd.as_tag()), cmd);
        }
        assert_eq!(PendingCommand::from_tag("garbage"), PendingCommand::Idle);
    }

    #[test]
    fn test_append_and_fetch_values() {
        let store = ListStore::in_memory().unwrap();

        store.append_value(1, "groceries", "milk").unwrap();
        store.append_value(1, "groceries", "eggs").unwrap();
        store.append_value(1, "groceries", "milk").unwrap();

        let mut values = store.list_values(1, "groceries").unwrap();
        values.sort();
        assert_eq!(values, vec!["eggs", "milk", "milk"]);
    }

    #[test]
    fn test_empty_list_fails() {
        let store = ListStore::in_memory().unwrap();
        assert!(matches!(
            store.list_values(1, "nothing"),
            Err(Error::EmptyList)
        ));
    }

    #[test]
    fn test_delete_then_fetch_fails() {
        let store = ListStore::in_memory().unwrap();

        store.append_value(1, "groceries", "milk").unwrap();
        store.delete_list(1, "groceries").unwrap();
        assert!(matches!(
            store.list_values(1, "groceries"),
            Err(Error::EmptyList)
        ));

        // Deleting a list that never existed is fine
        store.delete_list(1, "groceries").unwrap();
    }

    #[test]
    fn test_list_keys_distinct_per_user() {
        let store = ListStore::in_memory().unwrap();

        store.append_value(1, "groceries", "milk").unwrap();
        store.append_value(1, "groceries", "eggs").unwrap();
        store.append_value(1, "movies", "alien").unwrap();
        store.append_value(2, "books", "dune").unwrap();

        let mut keys = store.list_keys(1).unwrap();
        keys.sort();
        assert_eq!(keys, vec!["groceries", "movies"]);

        assert!(matches!(store.list_keys(3), Err(Error::EmptyList)));
    }

    #[test]
    fn test_empty_key_and_value_allowed() {
        let store = ListStore::in_memory().unwrap();

        store.append_value(1, "", "").unwrap();
        assert_eq!(store.list_values(1, "").unwrap(), vec![""]);
    }
}
