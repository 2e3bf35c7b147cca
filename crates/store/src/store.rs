use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use rusqlite::{
    Connection, OptionalExtension, Row, TransactionBehavior, params,
};

use crate::error::{Result, StoreError};
use crate::model::*;
use crate::schema;

const TASK_COLUMNS: &str = "task_id, trip_id, description, category, \
                            priority, due_date, status, created_at, \
                            completed_at";

/// Handle to the trip database.
///
/// The handle only holds the location of the database. Cloning it is
/// cheap, and each operation connects on its own.
#[derive(Clone, Debug)]
pub struct TripStore {
    path: Arc<PathBuf>,
}

impl TripStore {
    /// Opens the database at `path`, creating the file, its parent
    /// directories and the schema as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(format!("create {}: {e}", parent.display()))
                })?;
            }
        }

        let store = Self {
            path: Arc::new(path.to_owned()),
        };
        let conn = store.connect()?;
        conn.execute_batch(schema::DATABASE_PRAGMAS)
            .map_err(|e| StoreError::Database(format!("pragmas: {e}")))?;
        conn.execute_batch(schema::CREATE_TABLES)
            .map_err(|e| StoreError::Database(format!("schema: {e}")))?;

        info!(path = %path.display(), "trip store opened");
        Ok(store)
    }

    /// Returns the path of the database file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(self.path.as_path())?;
        conn.execute_batch(schema::CONNECTION_PRAGMAS)?;
        Ok(conn)
    }

    /// Creates a trip, or returns the existing one if a trip with the same
    /// normalized id is already stored.
    pub fn create_trip(&self, trip_name: &str) -> Result<TripCreation> {
        if trip_name.trim().is_empty() {
            return Err(StoreError::MissingField("trip_name"));
        }
        let trip_id = trip_id_for(trip_name);

        let mut conn = self.connect()?;
        let tx =
            conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let inserted = tx.execute(
            "INSERT INTO trips (trip_id, trip_name, created_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(trip_id) DO NOTHING",
            params![trip_id, trip_name, now()],
        )?;
        let trip = find_trip(&tx, &trip_id)?
            .ok_or_else(|| StoreError::TripNotFound(trip_id.clone()))?;
        tx.commit()?;

        if inserted == 0 {
            debug!(trip_id = %trip_id, "trip already exists");
            Ok(TripCreation::Existing(trip))
        } else {
            debug!(trip_id = %trip_id, "trip created");
            Ok(TripCreation::Created(trip))
        }
    }

    /// Adds a pending task to an existing trip.
    pub fn add_task(&self, new_task: NewTask) -> Result<(Trip, Task)> {
        if new_task.trip_id.trim().is_empty() {
            return Err(StoreError::MissingField("trip_id"));
        }
        if new_task.description.trim().is_empty() {
            return Err(StoreError::MissingField("description"));
        }

        let mut conn = self.connect()?;
        let tx =
            conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let trip = find_trip(&tx, &new_task.trip_id)?.ok_or_else(|| {
            StoreError::TripNotFound(new_task.trip_id.clone())
        })?;

        let created_at = now();
        tx.execute(
            "INSERT INTO tasks
                (trip_id, description, category, priority, due_date, status,
                 created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new_task.trip_id,
                new_task.description,
                new_task.category,
                new_task.priority,
                new_task.due_date,
                TaskStatus::Pending,
                created_at,
            ],
        )?;
        let task_id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(task_id, trip_id = %trip.trip_id, "task added");
        let task = Task {
            task_id,
            trip_id: new_task.trip_id,
            description: new_task.description,
            category: new_task.category,
            priority: new_task.priority,
            due_date: new_task.due_date,
            status: TaskStatus::Pending,
            created_at,
            completed_at: None,
        };
        Ok((trip, task))
    }

    /// Lists the tasks of a trip in creation order.
    pub fn list_tasks(
        &self,
        trip_id: &str,
        filter: StatusFilter,
    ) -> Result<TaskList> {
        if trip_id.trim().is_empty() {
            return Err(StoreError::MissingField("trip_id"));
        }

        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let trip = find_trip(&tx, trip_id)?
            .ok_or_else(|| StoreError::TripNotFound(trip_id.to_owned()))?;

        let tasks = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks
                 WHERE trip_id = ?1 AND (?2 IS NULL OR status = ?2)
                 ORDER BY created_at, task_id"
            ))?;
            stmt.query_map(params![trip_id, filter.status()], task_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;

        Ok(TaskList {
            trip,
            filter,
            tasks,
        })
    }

    /// Returns a task by id.
    pub fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        let conn = self.connect()?;
        find_task(&conn, task_id)
    }

    /// Marks a task as completed.
    ///
    /// Completing a task twice is not an error; the completion timestamp
    /// of the first call is kept.
    pub fn complete_task(&self, task_id: i64) -> Result<Completion> {
        let mut conn = self.connect()?;
        let tx =
            conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut task = find_task(&tx, task_id)?
            .ok_or(StoreError::TaskNotFound(task_id))?;
        if task.status == TaskStatus::Completed {
            return Ok(Completion::AlreadyCompleted(task));
        }

        let completed_at = now();
        tx.execute(
            "UPDATE tasks SET status = ?1, completed_at = ?2
             WHERE task_id = ?3 AND status = ?4",
            params![
                TaskStatus::Completed,
                completed_at,
                task_id,
                TaskStatus::Pending
            ],
        )?;
        tx.commit()?;

        debug!(task_id, "task completed");
        task.status = TaskStatus::Completed;
        task.completed_at = Some(completed_at);
        Ok(Completion::Completed(task))
    }

    /// Applies a partial update and returns the updated task.
    pub fn update_task(
        &self,
        task_id: i64,
        update: TaskUpdate,
    ) -> Result<Task> {
        if update.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }

        let mut conn = self.connect()?;
        let tx =
            conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let updated = tx.execute(
            "UPDATE tasks SET
                description = COALESCE(?1, description),
                category = COALESCE(?2, category),
                priority = COALESCE(?3, priority),
                due_date = COALESCE(?4, due_date)
             WHERE task_id = ?5",
            params![
                update.description,
                update.category,
                update.priority,
                update.due_date,
                task_id
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::TaskNotFound(task_id));
        }
        let task = find_task(&tx, task_id)?
            .ok_or(StoreError::TaskNotFound(task_id))?;
        tx.commit()?;

        debug!(task_id, "task updated");
        Ok(task)
    }

    /// Deletes a task permanently and returns what was deleted.
    pub fn delete_task(&self, task_id: i64) -> Result<Task> {
        let mut conn = self.connect()?;
        let tx =
            conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let task = find_task(&tx, task_id)?
            .ok_or(StoreError::TaskNotFound(task_id))?;
        tx.execute("DELETE FROM tasks WHERE task_id = ?1", [task_id])?;
        tx.commit()?;

        debug!(task_id, "task deleted");
        Ok(task)
    }

    /// Lists all trips with task counts, newest first.
    pub fn list_trips(&self) -> Result<Vec<TripSummary>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT
                t.trip_id,
                t.trip_name,
                t.created_at,
                COUNT(CASE WHEN tk.status = 'pending' THEN 1 END),
                COUNT(CASE WHEN tk.status = 'completed' THEN 1 END),
                COUNT(tk.task_id)
             FROM trips t
             LEFT JOIN tasks tk ON t.trip_id = tk.trip_id
             GROUP BY t.rowid, t.trip_id, t.trip_name, t.created_at
             ORDER BY t.created_at DESC, t.rowid DESC",
        )?;
        let trips = stmt
            .query_map([], |row| {
                Ok(TripSummary {
                    trip: trip_from_row(row)?,
                    pending: row.get(3)?,
                    completed: row.get(4)?,
                    total: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(trips)
    }
}

#[inline]
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn find_trip(conn: &Connection, trip_id: &str) -> Result<Option<Trip>> {
    let trip = conn
        .query_row(
            "SELECT trip_id, trip_name, created_at FROM trips
             WHERE trip_id = ?1",
            [trip_id],
            trip_from_row,
        )
        .optional()?;
    Ok(trip)
}

fn find_task(conn: &Connection, task_id: i64) -> Result<Option<Task>> {
    let task = conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE task_id = ?1"),
            [task_id],
            task_from_row,
        )
        .optional()?;
    Ok(task)
}

fn trip_from_row(row: &Row<'_>) -> rusqlite::Result<Trip> {
    Ok(Trip {
        trip_id: row.get(0)?,
        trip_name: row.get(1)?,
        created_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        task_id: row.get(0)?,
        trip_id: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        priority: row.get(4)?,
        due_date: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
        completed_at: row.get(8)?,
    })
}
