use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// A place where the visit count can live.
pub trait CounterStore {
    fn name(&self) -> &'static str;
    fn get(&self, key: &str) -> Result<u64>;
    /// Adds one visit and returns the new total.
    fn increment(&mut self, key: &str) -> Result<u64>;
    fn reset(&mut self, key: &str) -> Result<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_value(key: &str, visits: u64) -> Self {
        let mut s = MemoryStore::new();
        s.values.insert(key.to_string(), visits);
        s
    }
}

impl CounterStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<u64> {
        Ok(self.values.get(key).copied().unwrap_or(0))
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        let v = self.values.entry(key.to_string()).or_insert(0);
        *v = v.saturating_add(1);
        Ok(*v)
    }

    fn reset(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Parses a stored counter value; anything unreadable counts as zero.
pub fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
}

/// Backends tried in order; the first one that answers wins.
#[derive(Default)]
pub struct Cascade {
    stores: Vec<Box<dyn CounterStore>>,
}

impl Cascade {
    pub fn new() -> Self {
        Cascade::default()
    }

    pub fn push(&mut self, store: Box<dyn CounterStore>) -> &mut Self {
        self.stores.push(store);
        self
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    pub fn get_with_source(&self, key: &str) -> Result<(u64, &'static str)> {
        for s in &self.stores {
            match s.get(key) {
                Ok(v) => return Ok((v, s.name())),
                Err(e) => log::warn!("visit counter: {} unavailable: {}", s.name(), e),
            }
        }
        Err(Error::AllBackendsFailed)
    }

    pub fn increment_with_source(&mut self, key: &str) -> Result<(u64, &'static str)> {
        for s in self.stores.iter_mut() {
            match s.increment(key) {
                Ok(v) => return Ok((v, s.name())),
                Err(e) => log::warn!("visit counter: {} unavailable: {}", s.name(), e),
            }
        }
        Err(Error::AllBackendsFailed)
    }
}

impl CounterStore for Cascade {
    fn name(&self) -> &'static str {
        "cascade"
    }

    fn get(&self, key: &str) -> Result<u64> {
        self.get_with_source(key).map(|(v, _)| v)
    }

    fn increment(&mut self, key: &str) -> Result<u64> {
        self.increment_with_source(key).map(|(v, _)| v)
    }

    /// Resets every backend that answers; fails only if none did.
    fn reset(&mut self, key: &str) -> Result<()> {
        let mut any = false;
        for s in self.stores.iter_mut() {
            match s.reset(key) {
                Ok(()) => any = true,
                Err(e) => log::warn!("visit counter: reset on {} failed: {}", s.name(), e),
            }
        }
        if any { Ok(()) } else { Err(Error::AllBackendsFailed) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub visits: u64,
    /// Whether this call added a visit.
    pub counted: bool,
}

/// Counts a page view at most once per browser session.
pub fn session_visit(store: &mut dyn CounterStore, key: &str, already_counted: bool) -> Result<Visit> {
    if already_counted {
        return Ok(Visit { visits: store.get(key)?, counted: false });
    }
    Ok(Visit { visits: store.increment(key)?, counted: true })
}

/// In-process session flag around [`session_visit`].
#[derive(Clone, Debug, Default)]
pub struct SessionGate {
    counted: bool,
}

impl SessionGate {
    pub fn new() -> Self {
        SessionGate::default()
    }

    pub fn is_counted(&self) -> bool {
        self.counted
    }

    pub fn visit(&mut self, store: &mut dyn CounterStore, key: &str) -> Result<Visit> {
        let v = session_visit(store, key, self.counted)?;
        self.counted = true;
        Ok(v)
    }
}

pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Option<Value>,
}

impl ApiResponse {
    fn new(status: u16, body: Option<Value>) -> Self {
        ApiResponse { status, headers: CORS_HEADERS.to_vec(), body }
    }
}

/// The `/api/visits` endpoint: `GET` reads, `POST` counts a visit.
pub fn visits_handler(method: &str, store: &mut dyn CounterStore, key: &str) -> ApiResponse {
    let result = match method.to_ascii_uppercase().as_str() {
        "OPTIONS" => return ApiResponse::new(200, None),
        "GET" => store.get(key).map(|v| json!({ "visits": v })),
        "POST" => store.increment(key).map(|v| json!({ "visits": v, "success": true })),
        _ => {
            return ApiResponse::new(
                405,
                Some(json!({ "error": "Method not allowed", "allowed": ["GET", "POST"] })),
            )
        }
    };
    match result {
        Ok(body) => ApiResponse::new(200, Some(body)),
        Err(e) => {
            log::error!("visits api ({}): {}", store.name(), e);
            ApiResponse::new(500, Some(json!({ "error": "Erro interno do servidor", "fallback": true })))
        }
    }
}

/// Reads the `visits` field of an endpoint response body.
pub fn visits_from_body(body: &Value) -> Result<u64> {
    body.get("visits")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::backend("http", "response has no visits field"))
}

#[cfg(feature = "sqlite")]
pub use self::sqlite::SqliteStore;

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::CounterStore;
    use crate::error::{Error, Result};
    use rusqlite::{params, Connection, OptionalExtension};
    use std::path::Path;

    fn db_err(e: rusqlite::Error) -> Error {
        Error::backend("sqlite", e.to_string())
    }

    /// Relational counter table, one row per key.
    pub struct SqliteStore {
        conn: Connection,
    }

    impl SqliteStore {
        pub fn open(path: impl AsRef<Path>) -> Result<Self> {
            Self::init(Connection::open(path).map_err(db_err)?)
        }

        pub fn open_in_memory() -> Result<Self> {
            Self::init(Connection::open_in_memory().map_err(db_err)?)
        }

        fn init(conn: Connection) -> Result<Self> {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS visit_counter (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    key VARCHAR(50) UNIQUE NOT NULL,
                    visits INTEGER NOT NULL DEFAULT 0,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );",
            )
            .map_err(db_err)?;
            Ok(SqliteStore { conn })
        }

        fn seed(&self, key: &str) -> Result<()> {
            self.conn
                .execute(
                    "INSERT INTO visit_counter (key, visits) VALUES (?1, 0) ON CONFLICT (key) DO NOTHING",
                    params![key],
                )
                .map_err(db_err)?;
            Ok(())
        }
    }

    impl CounterStore for SqliteStore {
        fn name(&self) -> &'static str {
            "sqlite"
        }

        fn get(&self, key: &str) -> Result<u64> {
            let v: Option<i64> = self
                .conn
                .query_row("SELECT visits FROM visit_counter WHERE key = ?1", params![key], |r| r.get(0))
                .optional()
                .map_err(db_err)?;
            Ok(v.unwrap_or(0).max(0) as u64)
        }

        fn increment(&mut self, key: &str) -> Result<u64> {
            self.seed(key)?;
            let v: i64 = self
                .conn
                .query_row(
                    "UPDATE visit_counter SET visits = visits + 1, updated_at = CURRENT_TIMESTAMP
                     WHERE key = ?1 RETURNING visits",
                    params![key],
                    |r| r.get(0),
                )
                .map_err(db_err)?;
            Ok(v.max(0) as u64)
        }

        fn reset(&mut self, key: &str) -> Result<()> {
            self.conn
                .execute("DELETE FROM visit_counter WHERE key = ?1", params![key])
                .map_err(db_err)?;
            Ok(())
        }
    }
}
