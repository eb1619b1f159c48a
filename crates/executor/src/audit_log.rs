use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditLogError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One persisted row of the audit trail.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    pub args: String,
    pub status: String,
    pub message: String,
}

/// Append-only action log. Every dispatch attempt lands here,
/// denials included; rows are never updated or deleted.
pub struct AuditLog {
    conn: Mutex<Connection>,
}

impl AuditLog {
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, AuditLogError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS actions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                action TEXT NOT NULL,
                args TEXT NOT NULL,
                status TEXT NOT NULL,
                message TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn append(
        &self,
        action: &str,
        args: &Map<String, Value>,
        status: &str,
        message: &str,
    ) -> Result<(), AuditLogError> {
        let timestamp = chrono::Utc::now().to_rfc3339();
        let args = serde_json::to_string(args).unwrap_or_else(|_| "{}".to_string());
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO actions (timestamp, action, args, status, message)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![timestamp, action, args, status, message],
        )?;
        Ok(())
    }

    /// Most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, AuditLogError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, action, args, status, message
             FROM actions ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(AuditEntry {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                action: row.get(2)?,
                args: row.get(3)?,
                status: row.get(4)?,
                message: row.get(5)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn args() -> Map<String, Value> {
        json!({ "path": "/tmp/x" }).as_object().cloned().unwrap()
    }

    #[test]
    fn rows_accumulate_in_order() {
        let temp = TempDir::new().unwrap();
        let log = AuditLog::open(temp.path().join("hana.db")).unwrap();

        log.append("file.open", &args(), "success", "OK").unwrap();
        log.append("file.delete", &args(), "denied", "protected").unwrap();

        let entries = log.recent(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "file.delete");
        assert_eq!(entries[0].status, "denied");
        assert_eq!(entries[1].action, "file.open");
        assert!(entries[1].id < entries[0].id);
    }

    #[test]
    fn args_are_serialized_json() {
        let temp = TempDir::new().unwrap();
        let log = AuditLog::open(temp.path().join("hana.db")).unwrap();
        log.append("file.open", &args(), "success", "OK").unwrap();

        let entry = &log.recent(1).unwrap()[0];
        let parsed: Value = serde_json::from_str(&entry.args).unwrap();
        assert_eq!(parsed["path"], "/tmp/x");
        assert!(!entry.timestamp.is_empty());
    }

    #[test]
    fn reopening_preserves_rows() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("hana.db");
        {
            let log = AuditLog::open(&db).unwrap();
            log.append("file.open", &args(), "success", "OK").unwrap();
        }
        let log = AuditLog::open(&db).unwrap();
        assert_eq!(log.recent(10).unwrap().len(), 1);
    }

    #[test]
    fn creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("data").join("hana.db");
        let log = AuditLog::open(&db).unwrap();
        log.append("file.open", &args(), "success", "OK").unwrap();
        assert!(db.exists());
    }
}
