//! 通用文件读写命令（file:read / file:write 的对应物）。
//! 写操作限制在允许的目录内，防止前端拼出任意路径。

use crate::error::Result;
use crate::settings::AppState;
use std::fs;
use std::path::{Path, PathBuf};
use tauri::State;

/// 允许写入的根目录：默认项目路径（若已配置）、用户主目录、临时目录
fn allowed_directories(state: &State<'_, AppState>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(store) = state.store.lock() {
        if let Ok(root) = store.default_project_path() {
            dirs.push(root);
        }
    }

    if let Some(home) = dirs::home_dir() {
        dirs.push(home);
    }
    dirs.push(std::env::temp_dir());

    dirs
}

/// 对父目录做 canonicalize 后校验归属（文件本身可能尚不存在）
fn validate_parent_in_allowed_dirs(path: &Path, allowed_dirs: &[PathBuf]) -> Result<()> {
    let canonical_parent = path
        .parent()
        .ok_or_else(|| "路径无效: 无法获取父目录".to_string())?
        .canonicalize()
        .map_err(|e| format!("路径无效: {}", e))?;

    let is_allowed = allowed_dirs.iter().any(|dir| {
        dir.canonicalize()
            .map(|d| canonical_parent.starts_with(&d))
            .unwrap_or(false)
    });

    if is_allowed {
        Ok(())
    } else {
        Err("路径不在允许的目录内".to_string())
    }
}

#[tauri::command]
pub fn read_file(path: String) -> Result<String> {
    if !Path::new(&path).exists() {
        return Err(format!("文件不存在: {}", path));
    }
    fs::read_to_string(&path).map_err(|e| format!("读取文件失败: {}", e))
}

#[tauri::command]
pub fn write_file(state: State<'_, AppState>, path: String, content: String) -> Result<()> {
    let file_path = Path::new(&path);

    // 先建父目录，canonicalize 要求目录存在
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("创建目录失败: {}", e))?;
    }

    let allowed_dirs = allowed_directories(&state);
    validate_parent_in_allowed_dirs(file_path, &allowed_dirs)
        .map_err(|e| format!("写入文件失败: {}", e))?;

    fs::write(file_path, content).map_err(|e| format!("写入文件失败: {}", e))
}
