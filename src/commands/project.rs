#![allow(non_snake_case)]

use crate::commands::default_root;
use crate::error::Result;
use crate::project::{self, ProjectConfig, ProjectSummary};
use crate::settings::AppState;
use serde::Serialize;
use tauri::State;

#[derive(Debug, Serialize)]
pub struct CreateProjectResult {
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "projectPath")]
    pub project_path: String,
}

#[tauri::command]
pub fn create_project(
    state: State<'_, AppState>,
    name: String,
    description: Option<String>,
) -> Result<CreateProjectResult> {
    let root = default_root(&state)?;
    let (project_id, project_path) =
        project::create_project(&root, &name, description.as_deref().unwrap_or(""))
            .map_err(|e| e.to_string())?;

    Ok(CreateProjectResult {
        project_id,
        project_path: project_path.to_string_lossy().to_string(),
    })
}

#[tauri::command]
pub fn list_projects(state: State<'_, AppState>) -> Result<Vec<ProjectSummary>> {
    let root = default_root(&state)?;
    project::list_projects(&root).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_project(
    state: State<'_, AppState>,
    projectId: String,
    name: String,
    description: Option<String>,
) -> Result<ProjectConfig> {
    let root = default_root(&state)?;
    project::update_project(
        &root,
        &projectId,
        &name,
        description.as_deref().unwrap_or(""),
    )
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_project(state: State<'_, AppState>, projectId: String) -> Result<()> {
    let root = default_root(&state)?;
    project::delete_project(&root, &projectId).map_err(|e| e.to_string())
}
