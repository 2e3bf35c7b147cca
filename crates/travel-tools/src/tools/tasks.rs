use std::fmt::Write as _;

use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use travel_tools_core::tool::{Tool, ToolResult};
use travel_tools_store::{
    Completion, NewTask, StatusFilter, TaskList, TaskStatus, TaskUpdate,
    TripStore,
};

use super::{non_blank, with_store};

#[derive(Deserialize, JsonSchema)]
pub struct AddTaskParameters {
    #[schemars(description = "The trip ID to add the task to.")]
    trip_id: String,
    #[schemars(description = "Task description.")]
    description: String,
    #[schemars(description = "Optional category, e.g. accommodation, \
                              activities, dining, transport or other.")]
    category: Option<String>,
    #[schemars(description = "Optional priority: low, medium or high.")]
    priority: Option<String>,
    #[schemars(description = "Optional due date in ISO format (YYYY-MM-DD).")]
    due_date: Option<String>,
}

/// A tool for adding tasks to a trip.
pub struct AddTaskTool {
    store: TripStore,
    parameter_schema: Value,
}

impl AddTaskTool {
    /// Creates a new add task tool backed by `store`.
    #[inline]
    pub fn new(store: TripStore) -> Self {
        AddTaskTool {
            store,
            parameter_schema: schema_for!(AddTaskParameters).to_value(),
        }
    }
}

impl Tool for AddTaskTool {
    type Input = AddTaskParameters;

    fn name(&self) -> &str {
        "add_task"
    }

    fn description(&self) -> &str {
        "Add a task to a trip with optional category, priority, and due date."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: AddTaskParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        let new_task = NewTask {
            trip_id: input.trip_id,
            description: input.description,
            category: non_blank(input.category),
            priority: non_blank(input.priority),
            due_date: non_blank(input.due_date),
        };
        async move {
            let (trip, task) = with_store(store, "adding task", move |store| {
                store.add_task(new_task)
            })
            .await?;

            let mut text = format!(
                "✓ Added task #{}: {}\n",
                task.task_id, task.description
            );
            if let Some(category) = &task.category {
                writeln!(text, "  Category: {category}").ok();
            }
            if let Some(priority) = &task.priority {
                writeln!(text, "  Priority: {priority}").ok();
            }
            if let Some(due_date) = &task.due_date {
                writeln!(text, "  Due: {due_date}").ok();
            }
            write!(text, "  Trip: {}", trip.trip_name).ok();
            Ok(text)
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct ListTasksParameters {
    #[schemars(description = "The trip ID to list tasks for.")]
    trip_id: String,
    #[schemars(
        description = "Optional filter: all, pending or completed. Default: all."
    )]
    status: Option<String>,
}

/// A tool for listing the tasks of a trip.
pub struct ListTasksTool {
    store: TripStore,
    parameter_schema: Value,
}

impl ListTasksTool {
    /// Creates a new list tasks tool backed by `store`.
    #[inline]
    pub fn new(store: TripStore) -> Self {
        ListTasksTool {
            store,
            parameter_schema: schema_for!(ListTasksParameters).to_value(),
        }
    }
}

impl Tool for ListTasksTool {
    type Input = ListTasksParameters;

    fn name(&self) -> &str {
        "list_tasks"
    }

    fn description(&self) -> &str {
        "List all tasks for a trip, optionally filtered by status."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: ListTasksParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        let filter = input
            .status
            .as_deref()
            .map(StatusFilter::parse_lenient)
            .unwrap_or_default();
        async move {
            let list = with_store(store, "listing tasks", move |store| {
                store.list_tasks(&input.trip_id, filter)
            })
            .await?;
            Ok(render_task_list(&list))
        }
    }
}

fn render_task_list(list: &TaskList) -> String {
    let trip_name = &list.trip.trip_name;
    let filter = list.filter.as_str();
    if list.tasks.is_empty() {
        return format!("No {filter} tasks found for '{trip_name}'");
    }

    let mut text = format!("**Tasks for '{trip_name}'** ({filter})\n\n");
    let mut pending = 0;
    for task in &list.tasks {
        let icon = match task.status {
            TaskStatus::Pending => {
                pending += 1;
                "☐"
            }
            TaskStatus::Completed => "✓",
        };
        writeln!(text, "{icon} **#{}** {}", task.task_id, task.description)
            .ok();

        let details = [
            task.category.as_deref().map(|v| format!("Category: {v}")),
            task.priority.as_deref().map(|v| format!("Priority: {v}")),
            task.due_date.as_deref().map(|v| format!("Due: {v}")),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
        if !details.is_empty() {
            writeln!(text, "    {}", details.join(" | ")).ok();
        }
        if let Some(completed_at) = &task.completed_at {
            writeln!(text, "    Completed: {completed_at}").ok();
        }
        text.push('\n');
    }

    let total = list.tasks.len();
    write!(
        text,
        "---\nTotal: {total} tasks ({pending} pending, {} completed)",
        total - pending
    )
    .ok();
    text
}

#[derive(Deserialize, JsonSchema)]
pub struct TaskIdParameters {
    #[schemars(description = "The task ID.")]
    task_id: i64,
}

/// A tool for marking tasks as completed.
pub struct CompleteTaskTool {
    store: TripStore,
    parameter_schema: Value,
}

impl CompleteTaskTool {
    /// Creates a new complete task tool backed by `store`.
    #[inline]
    pub fn new(store: TripStore) -> Self {
        CompleteTaskTool {
            store,
            parameter_schema: schema_for!(TaskIdParameters).to_value(),
        }
    }
}

impl Tool for CompleteTaskTool {
    type Input = TaskIdParameters;

    fn name(&self) -> &str {
        "complete_task"
    }

    fn description(&self) -> &str {
        "Mark a task as completed."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: TaskIdParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        async move {
            let task_id = input.task_id;
            let completion =
                with_store(store, "completing task", move |store| {
                    store.complete_task(task_id)
                })
                .await?;

            Ok(match completion {
                Completion::Completed(task) => format!(
                    "✓ Completed task #{}: {}\nCompleted at: {}",
                    task.task_id,
                    task.description,
                    task.completed_at.as_deref().unwrap_or_default()
                ),
                Completion::AlreadyCompleted(task) => format!(
                    "Task #{} is already completed: {}",
                    task.task_id, task.description
                ),
            })
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct UpdateTaskParameters {
    #[schemars(description = "The task ID to update.")]
    task_id: i64,
    #[schemars(description = "New description.")]
    description: Option<String>,
    #[schemars(description = "New category.")]
    category: Option<String>,
    #[schemars(description = "New priority.")]
    priority: Option<String>,
    #[schemars(description = "New due date (YYYY-MM-DD).")]
    due_date: Option<String>,
}

/// A tool for changing the details of a task.
pub struct UpdateTaskTool {
    store: TripStore,
    parameter_schema: Value,
}

impl UpdateTaskTool {
    /// Creates a new update task tool backed by `store`.
    #[inline]
    pub fn new(store: TripStore) -> Self {
        UpdateTaskTool {
            store,
            parameter_schema: schema_for!(UpdateTaskParameters).to_value(),
        }
    }
}

impl Tool for UpdateTaskTool {
    type Input = UpdateTaskParameters;

    fn name(&self) -> &str {
        "update_task"
    }

    fn description(&self) -> &str {
        "Update task details (description, category, priority, or due date)."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: UpdateTaskParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        let task_id = input.task_id;
        let update = TaskUpdate {
            description: non_blank(input.description),
            category: non_blank(input.category),
            priority: non_blank(input.priority),
            due_date: non_blank(input.due_date),
        };
        async move {
            let changed = [
                ("description", &update.description),
                ("category", &update.category),
                ("priority", &update.priority),
                ("due_date", &update.due_date),
            ]
            .into_iter()
            .filter_map(|(field, value)| {
                value.as_ref().map(|value| format!("{field}: {value}"))
            })
            .collect::<Vec<_>>()
            .join(", ");

            with_store(store, "updating task", move |store| {
                store.update_task(task_id, update)
            })
            .await?;

            Ok(format!("✓ Updated task #{task_id}\nChanged: {changed}"))
        }
    }
}

/// A tool for deleting tasks.
pub struct DeleteTaskTool {
    store: TripStore,
    parameter_schema: Value,
}

impl DeleteTaskTool {
    /// Creates a new delete task tool backed by `store`.
    #[inline]
    pub fn new(store: TripStore) -> Self {
        DeleteTaskTool {
            store,
            parameter_schema: schema_for!(TaskIdParameters).to_value(),
        }
    }
}

impl Tool for DeleteTaskTool {
    type Input = TaskIdParameters;

    fn name(&self) -> &str {
        "delete_task"
    }

    fn description(&self) -> &str {
        "Delete a task permanently."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: TaskIdParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let store = self.store.clone();
        async move {
            let task_id = input.task_id;
            let task = with_store(store, "deleting task", move |store| {
                store.delete_task(task_id)
            })
            .await?;
            Ok(format!(
                "✓ Deleted task #{}: {}",
                task.task_id, task.description
            ))
        }
    }
}
