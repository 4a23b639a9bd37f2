use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::projects::repo::Project;
use crate::tasks::repo::Task;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub due_date: Option<OffsetDateTime>,
    pub contributors: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_cover: Option<String>,
    pub due_date: Option<OffsetDateTime>,
    pub contributors: Option<Vec<Uuid>>,
}

/// Body for creating a task from within a project, field names as the
/// project board sends them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProjectTaskRequest {
    pub task_name: String,
    pub task_description: Option<String>,
    pub task_pomodoro: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectTaskRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pomodoro: Option<i32>,
    pub completed: Option<bool>,
}

/// A project with its tasks, as returned by the detail endpoints.
#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize)]
pub struct ProjectData<T> {
    pub project: T,
}

#[derive(Debug, Serialize)]
pub struct ProjectsData {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    pub status: &'static str,
    pub results: usize,
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_details_flattens_project_fields() {
        let project = Project {
            id: Uuid::new_v4(),
            name: "Thesis".into(),
            description: None,
            image_cover: None,
            due_date: OffsetDateTime::now_utc(),
            owner: Uuid::new_v4(),
            contributors: vec![],
            created_at: OffsetDateTime::now_utc(),
        };
        let details = ProjectDetails {
            project,
            tasks: vec![],
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["name"], "Thesis");
        assert!(json["tasks"].as_array().unwrap().is_empty());
        // Flattened, not nested under "project".
        assert!(json.get("project").is_none());
    }

    #[test]
    fn add_task_body_uses_camel_case_names() {
        let body: AddProjectTaskRequest = serde_json::from_str(
            r#"{"taskName":"write intro","taskDescription":"ch. 1","taskPomodoro":3}"#,
        )
        .unwrap();
        assert_eq!(body.task_name, "write intro");
        assert_eq!(body.task_pomodoro, 3);
    }
}
