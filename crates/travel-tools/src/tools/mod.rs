//! The tools offered to the orchestrator.

mod forecast;
mod tasks;
mod trips;

pub use forecast::WeatherForecastTool;
pub use tasks::{
    AddTaskTool, CompleteTaskTool, DeleteTaskTool, ListTasksTool,
    UpdateTaskTool,
};
pub use trips::{CreateTripTool, ListTripsTool};

use tokio::task::spawn_blocking;
use travel_tools_core::tool::Error as ToolError;
use travel_tools_store::{StoreError, TripStore};

/// Runs a store operation on the blocking pool.
///
/// `action` names the operation in database error messages, e.g.
/// `"adding task"`.
async fn with_store<T, F>(
    store: TripStore,
    action: &'static str,
    f: F,
) -> Result<T, ToolError>
where
    F: FnOnce(&TripStore) -> travel_tools_store::Result<T> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(move || f(&store))
        .await
        .map_err(|_| {
            ToolError::execution_error()
                .with_reason(format!("Error {action}: store task aborted"))
        })?
        .map_err(|err| store_error(err, action))
}

fn store_error(err: StoreError, action: &str) -> ToolError {
    match err {
        StoreError::MissingField(field) => ToolError::invalid_input()
            .with_reason(format!("Error: {field} is required")),
        StoreError::EmptyUpdate => ToolError::invalid_input().with_reason(
            "Error: At least one field to update must be provided \
             (description, category, priority, or due_date)",
        ),
        StoreError::TripNotFound(trip_id) => {
            ToolError::not_found().with_reason(format!(
                "Error: Trip '{trip_id}' not found. \
                 Create it first using create_trip."
            ))
        }
        StoreError::TaskNotFound(task_id) => ToolError::not_found()
            .with_reason(format!("Error: Task #{task_id} not found")),
        err => {
            warn!("store failure while {action}: {err}");
            ToolError::execution_error()
                .with_reason(format!("Error {action}: {err}"))
        }
    }
}

/// Treats blank optional strings as absent.
#[inline]
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use travel_tools_core::tool::ErrorKind;

    use super::*;

    #[test]
    fn test_store_error_kinds() {
        let err = store_error(StoreError::MissingField("trip_name"), "x");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.reason(), "Error: trip_name is required");

        let err = store_error(StoreError::TaskNotFound(42), "x");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.reason(), "Error: Task #42 not found");

        let err = store_error(
            StoreError::Database("disk I/O error".to_owned()),
            "adding task",
        );
        assert_eq!(err.kind(), ErrorKind::ExecutionError);
        assert_eq!(
            err.reason(),
            "Error adding task: database error: disk I/O error"
        );
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("  ".to_owned())), None);
        assert_eq!(non_blank(Some("high".to_owned())), Some("high".to_owned()));
    }
}
