//! Local fallback stores for paper details
//!
//! Two shapes, both read-tolerant: a JSON-file key-value store (the site's
//! persistent "DataManager") and a SQLite database holding one detail
//! record per paper. Either being unavailable means "no data", never an
//! error the caller sees.

use rusqlite::{params, Connection};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSON-file key-value store. The whole file is one JSON object; `load`
/// returns the value under a key or the supplied default.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the value stored under `key`, or `default` when the file is
    /// missing, unreadable or does not contain the key
    pub fn load(&self, key: &str, default: Value) -> Value {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(_) => return default,
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map.get(key).cloned().unwrap_or(default),
            Ok(_) => default,
            Err(e) => {
                eprintln!("[Store] Corrupt store file {:?}: {}", self.path, e);
                default
            }
        }
    }

    /// Store `value` under `key`, preserving other keys in the file
    pub fn save(&self, key: &str, value: Value) -> Result<(), String> {
        let mut root = match fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.as_object().cloned())
                .unwrap_or_default(),
            Err(_) => Default::default(),
        };
        root.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create store directory: {}", e))?;
        }
        let text = serde_json::to_string_pretty(&Value::Object(root))
            .map_err(|e| format!("Failed to serialize store: {}", e))?;
        fs::write(&self.path, text).map_err(|e| format!("Failed to write store: {}", e))
    }
}

/// SQLite-backed detail database: one JSON detail record per paper id
pub struct DetailDatabase {
    conn: Mutex<Connection>,
}

impl DetailDatabase {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let conn = Connection::open(&path)
            .map_err(|e| format!("Failed to open detail database: {}", e))?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory()
            .map_err(|e| format!("Failed to open in-memory database: {}", e))?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<(), String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS paper_details (
                paper_id TEXT PRIMARY KEY,
                detail TEXT NOT NULL
            );",
        )
        .map_err(|e| format!("Failed to initialize detail database: {}", e))
    }

    /// All stored records as (paper id, detail JSON) pairs
    pub fn get_all(&self) -> Result<Vec<(String, Value)>, String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        let mut stmt = conn
            .prepare("SELECT paper_id, detail FROM paper_details")
            .map_err(|e| e.to_string())?;
        let rows = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let detail: String = row.get(1)?;
                Ok((id, detail))
            })
            .map_err(|e| e.to_string())?;

        let mut records = Vec::new();
        for row in rows {
            let (id, detail) = row.map_err(|e| e.to_string())?;
            match serde_json::from_str(&detail) {
                Ok(value) => records.push((id, value)),
                Err(e) => eprintln!("[Store] Skipping corrupt record for paper {}: {}", id, e),
            }
        }
        Ok(records)
    }

    /// Insert or replace one paper's detail record
    pub fn put(&self, paper_id: &str, detail: &Value) -> Result<(), String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        let text = serde_json::to_string(detail).map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT OR REPLACE INTO paper_details (paper_id, detail) VALUES (?1, ?2)",
            params![paper_id, text],
        )
        .map_err(|e| format!("Failed to store record for paper {}: {}", paper_id, e))?;
        Ok(())
    }
}
