//! IPC 命令层：每个命令对应一个处理函数，做参数转发和错误降级，
//! 真正的逻辑在各仓库模块里。路由表见 main.rs 的 generate_handler!。

pub mod ai;
pub mod episode;
pub mod file_system;
pub mod project;
pub mod settings;

use crate::settings::AppState;
use std::path::PathBuf;
use tauri::State;

/// 取默认项目路径。未配置时在任何文件系统操作之前就失败。
pub(crate) fn default_root(state: &State<'_, AppState>) -> Result<PathBuf, String> {
    let store = state
        .store
        .lock()
        .map_err(|_| "设置存储不可用".to_string())?;
    store.default_project_path().map_err(|e| e.to_string())
}
