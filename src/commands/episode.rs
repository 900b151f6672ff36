#![allow(non_snake_case)]

use crate::commands::default_root;
use crate::episode::{self, EpisodeConfig, NewEpisode};
use crate::error::Result;
use crate::settings::AppState;
use serde::Serialize;
use serde_json::{Map, Value};
use tauri::State;

#[derive(Debug, Serialize)]
pub struct CreateEpisodeResult {
    #[serde(rename = "episodeId")]
    pub episode_id: i64,
    #[serde(rename = "episodeConfig")]
    pub episode_config: EpisodeConfig,
}

#[derive(Debug, Serialize)]
pub struct EpisodeFileContent {
    pub content: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[tauri::command]
pub fn create_episode(
    state: State<'_, AppState>,
    projectId: String,
    episodeData: NewEpisode,
) -> Result<CreateEpisodeResult> {
    let root = default_root(&state)?;
    let config =
        episode::create_episode(&root, &projectId, episodeData).map_err(|e| e.to_string())?;

    Ok(CreateEpisodeResult {
        episode_id: config.id,
        episode_config: config,
    })
}

#[tauri::command]
pub fn list_episodes(state: State<'_, AppState>, projectId: String) -> Result<Vec<EpisodeConfig>> {
    let root = default_root(&state)?;
    episode::list_episodes(&root, &projectId).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_episode(
    state: State<'_, AppState>,
    projectId: String,
    episodeId: i64,
    episodeData: Map<String, Value>,
) -> Result<EpisodeConfig> {
    let root = default_root(&state)?;
    episode::update_episode(&root, &projectId, episodeId, episodeData).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_episode(state: State<'_, AppState>, projectId: String, episodeId: i64) -> Result<()> {
    let root = default_root(&state)?;
    episode::delete_episode(&root, &projectId, episodeId).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_episode_characters(
    state: State<'_, AppState>,
    projectId: String,
    episodeId: i64,
    characters: Vec<String>,
) -> Result<EpisodeConfig> {
    let root = default_root(&state)?;
    episode::set_characters(&root, &projectId, episodeId, characters).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_episode_characters(
    state: State<'_, AppState>,
    projectId: String,
    episodeId: i64,
) -> Result<Vec<String>> {
    let root = default_root(&state)?;
    episode::get_characters(&root, &projectId, episodeId).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn write_episode_file(
    state: State<'_, AppState>,
    projectId: String,
    episodeId: i64,
    fileName: String,
    content: String,
) -> Result<String> {
    let root = default_root(&state)?;
    let file_path =
        episode::write_episode_file(&root, &projectId, episodeId, &fileName, &content)
            .map_err(|e| e.to_string())?;
    Ok(file_path.to_string_lossy().to_string())
}

#[tauri::command]
pub fn read_episode_file(
    state: State<'_, AppState>,
    projectId: String,
    episodeId: i64,
    fileName: String,
) -> Result<EpisodeFileContent> {
    let root = default_root(&state)?;
    let (content, file_path) =
        episode::read_episode_file(&root, &projectId, episodeId, &fileName)
            .map_err(|e| e.to_string())?;

    Ok(EpisodeFileContent {
        content,
        file_path: file_path.to_string_lossy().to_string(),
    })
}
