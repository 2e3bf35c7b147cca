/// Tables of the trip store. Safe to run on every open.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS trips (
    trip_id TEXT PRIMARY KEY,
    trip_name TEXT NOT NULL,
    created_at TIMESTAMP
);

CREATE TABLE IF NOT EXISTS tasks (
    task_id INTEGER PRIMARY KEY AUTOINCREMENT,
    trip_id TEXT NOT NULL REFERENCES trips(trip_id),
    description TEXT NOT NULL,
    category TEXT,
    priority TEXT,
    due_date TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TIMESTAMP,
    completed_at TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_tasks_trip ON tasks(trip_id);
"#;

/// Persistent database settings, applied once when the store is opened.
pub const DATABASE_PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
"#;

/// Per-connection settings.
pub const CONNECTION_PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;
