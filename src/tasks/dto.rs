use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::tasks::repo::Task;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    pub description: Option<String>,
    pub pomodoro: i32,
    pub pomodoro_completed: Option<i32>,
    #[serde(default)]
    pub completed: bool,
    pub reference_project: Option<Uuid>,
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pomodoro: Option<i32>,
    pub pomodoro_completed: Option<i32>,
    pub completed: Option<bool>,
    pub reference_project: Option<Uuid>,
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct TaskEnvelope {
    pub status: &'static str,
    pub task: Task,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_task_defaults_completed_to_false() {
        let body: CreateTaskRequest =
            serde_json::from_str(r#"{"name":"write intro","pomodoro":2}"#).unwrap();
        assert_eq!(body.name, "write intro");
        assert_eq!(body.pomodoro, 2);
        assert!(!body.completed);
        assert!(body.reference_project.is_none());
    }

    #[test]
    fn update_task_accepts_partial_camel_case_body() {
        let body: UpdateTaskRequest =
            serde_json::from_str(r#"{"pomodoroCompleted":1,"completed":true}"#).unwrap();
        assert_eq!(body.pomodoro_completed, Some(1));
        assert_eq!(body.completed, Some(true));
        assert!(body.name.is_none());
    }
}
