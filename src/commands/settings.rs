use crate::error::Result;
use crate::settings::{AppState, LogEntry, Settings};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tauri::State;

#[tauri::command]
pub fn save_settings(state: State<'_, AppState>, settings: Settings) -> Result<()> {
    let mut store = state
        .store
        .lock()
        .map_err(|_| "设置存储不可用".to_string())?;
    store.set_settings(settings).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_settings(state: State<'_, AppState>) -> Result<Option<Settings>> {
    let store = state
        .store
        .lock()
        .map_err(|_| "设置存储不可用".to_string())?;
    Ok(store.settings().cloned())
}

/// 返回设置存储所在的配置目录
#[tauri::command]
pub fn get_config_path(state: State<'_, AppState>) -> Result<String> {
    let store = state
        .store
        .lock()
        .map_err(|_| "设置存储不可用".to_string())?;
    let dir = store
        .store_path()
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(dir)
}

/// 前端日志落入有界日志列表，同时转发到本地诊断日志
#[tauri::command]
pub fn write_log(
    state: State<'_, AppState>,
    level: String,
    message: String,
    data: Option<Value>,
) -> Result<()> {
    match level.as_str() {
        "error" => tracing::error!("[前端] {}", message),
        "warn" => tracing::warn!("[前端] {}", message),
        _ => tracing::info!("[前端] {}", message),
    }

    let entry = LogEntry {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        level,
        message,
        data,
    };

    let mut store = state
        .store
        .lock()
        .map_err(|_| "设置存储不可用".to_string())?;
    store.append_log(entry).map_err(|e| e.to_string())
}
