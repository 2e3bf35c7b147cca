use std::fmt::{self, Display};
use std::str::FromStr;

use rusqlite::types::{
    FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef,
};

use crate::StoreError;

/// Derives the id of a trip from its display name.
///
/// The id is the lowercased name with spaces and hyphens replaced by
/// underscores, so `"My Trip"` and `"my-trip"` name the same trip.
pub fn trip_id_for(trip_name: &str) -> String {
    trip_name
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// A named planning container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    /// Normalized id, see [`trip_id_for`].
    pub trip_id: String,
    /// Display name as given on creation.
    pub trip_name: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Lifecycle state of a task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Not done yet.
    #[default]
    Pending,
    /// Done. Terminal.
    Completed,
}

impl TaskStatus {
    /// Returns the stored representation.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(StoreError::UnknownStatus(other.to_owned())),
        }
    }
}

impl ToSql for TaskStatus {
    #[inline]
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

/// Which tasks [`TripStore::list_tasks`](crate::TripStore::list_tasks)
/// returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Only pending tasks.
    Pending,
    /// Only completed tasks.
    Completed,
}

impl StatusFilter {
    /// Parses a filter leniently: matching is case-insensitive and any
    /// unrecognized value means [`StatusFilter::All`].
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => StatusFilter::Pending,
            "completed" => StatusFilter::Completed,
            _ => StatusFilter::All,
        }
    }

    /// Returns the status this filter selects, or `None` for all tasks.
    #[inline]
    pub fn status(self) -> Option<TaskStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(TaskStatus::Pending),
            StatusFilter::Completed => Some(TaskStatus::Completed),
        }
    }

    /// Returns the name of the filter.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self.status() {
            Some(status) => status.as_str(),
            None => "all",
        }
    }
}

/// An actionable planning item belonging to one trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned id, unique across all trips.
    pub task_id: i64,
    /// Owning trip.
    pub trip_id: String,
    /// What needs to be done.
    pub description: String,
    /// Free-text category, e.g. `accommodation` or `dining`.
    pub category: Option<String>,
    /// Free-text priority, e.g. `high`.
    pub priority: Option<String>,
    /// Free-text due date, conventionally `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// Lifecycle state.
    pub status: TaskStatus,
    /// Creation timestamp.
    pub created_at: String,
    /// Set once when the task is completed.
    pub completed_at: Option<String>,
}

/// Fields of a task to be created.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewTask {
    /// Owning trip, which must exist.
    pub trip_id: String,
    /// What needs to be done.
    pub description: String,
    /// Optional category.
    pub category: Option<String>,
    /// Optional priority.
    pub priority: Option<String>,
    /// Optional due date.
    pub due_date: Option<String>,
}

/// A partial update of a task. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New description.
    pub description: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New priority.
    pub priority: Option<String>,
    /// New due date.
    pub due_date: Option<String>,
}

impl TaskUpdate {
    /// Returns whether the update carries no field at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Outcome of [`TripStore::create_trip`](crate::TripStore::create_trip).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TripCreation {
    /// A new trip was inserted.
    Created(Trip),
    /// A trip with the same id already existed and was left as is.
    Existing(Trip),
}

impl TripCreation {
    /// Returns the created or existing trip.
    #[inline]
    pub fn trip(&self) -> &Trip {
        match self {
            TripCreation::Created(trip) | TripCreation::Existing(trip) => trip,
        }
    }
}

/// Outcome of [`TripStore::complete_task`](crate::TripStore::complete_task).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The task moved from pending to completed.
    Completed(Task),
    /// The task was completed before; nothing changed.
    AlreadyCompleted(Task),
}

impl Completion {
    /// Returns the task as it is now stored.
    #[inline]
    pub fn task(&self) -> &Task {
        match self {
            Completion::Completed(task) | Completion::AlreadyCompleted(task) => {
                task
            }
        }
    }
}

/// The tasks of one trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskList {
    /// The trip the tasks belong to.
    pub trip: Trip,
    /// The filter that was applied.
    pub filter: StatusFilter,
    /// Matching tasks in creation order.
    pub tasks: Vec<Task>,
}

/// A trip with task statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripSummary {
    /// The trip.
    pub trip: Trip,
    /// Number of pending tasks.
    pub pending: i64,
    /// Number of completed tasks.
    pub completed: i64,
    /// Number of tasks.
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_id_for() {
        assert_eq!(trip_id_for("My Trip"), "my_trip");
        assert_eq!(trip_id_for("my-trip"), "my_trip");
        assert_eq!(trip_id_for("Summer 2026 Marbella"), "summer_2026_marbella");
        assert_eq!(trip_id_for("Costa-del Sol"), "costa_del_sol");
    }

    #[test]
    fn test_status_filter_parse_lenient() {
        assert_eq!(StatusFilter::parse_lenient("pending"), StatusFilter::Pending);
        assert_eq!(
            StatusFilter::parse_lenient("COMPLETED"),
            StatusFilter::Completed
        );
        assert_eq!(StatusFilter::parse_lenient("all"), StatusFilter::All);
        assert_eq!(StatusFilter::parse_lenient("done"), StatusFilter::All);
        assert_eq!(StatusFilter::parse_lenient(""), StatusFilter::All);
    }

    #[test]
    fn test_task_status_round_trip() {
        for status in [TaskStatus::Pending, TaskStatus::Completed] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("archived".parse::<TaskStatus>().is_err());
    }
}
