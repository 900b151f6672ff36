//! 项目仓库：默认项目路径下一个目录对应一个项目，
//! 目录名即项目 ID，`project.json` 是权威描述文件。

use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// project.json 描述文件。ID 不入文件，目录名即 ID。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "createTime", default)]
    pub create_time: String,
    #[serde(rename = "lastModified", default)]
    pub last_modified: String,
    // 旧数据里可能有未建模的字段，更新时原样保留
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// 项目列表条目，日期压缩到天（YYYY-MM-DD）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "createTime")]
    pub create_time: String,
    #[serde(rename = "lastModified")]
    pub last_modified: String,
}

pub fn project_dir(root: &Path, project_id: &str) -> PathBuf {
    root.join(project_id)
}

pub fn project_config_path(root: &Path, project_id: &str) -> PathBuf {
    project_dir(root, project_id).join("project.json")
}

fn write_config(path: &Path, config: &ProjectConfig) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

/// 把 RFC 3339 时间戳压缩到日历天；解析失败返回空串
fn to_date_only(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 创建项目：ID 取当前毫秒时间戳。目录创建用“不存在才成功”的原子原语，
/// 同一毫秒的并发创建只有一个能赢。
pub fn create_project(
    root: &Path,
    name: &str,
    description: &str,
) -> Result<(String, PathBuf), AppError> {
    fs::create_dir_all(root)?;

    let project_id = Utc::now().timestamp_millis().to_string();
    let project_path = project_dir(root, &project_id);

    if let Err(e) = fs::create_dir(&project_path) {
        if e.kind() == ErrorKind::AlreadyExists {
            return Err(AppError::Conflict("项目名称已存在".to_string()));
        }
        return Err(e.into());
    }

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let config = ProjectConfig {
        name: name.to_string(),
        description: description.to_string(),
        create_time: now.clone(),
        last_modified: now,
        extra: serde_json::Map::new(),
    };
    write_config(&project_config_path(root, &project_id), &config)?;

    tracing::info!("创建项目成功: {}", project_path.display());
    Ok((project_id, project_path))
}

/// 更新项目：只合并 name/description，其余字段（含 createTime）原样保留
pub fn update_project(
    root: &Path,
    project_id: &str,
    name: &str,
    description: &str,
) -> Result<ProjectConfig, AppError> {
    let config_path = project_config_path(root, project_id);
    if !config_path.exists() {
        return Err(AppError::NotFound("项目配置文件不存在".to_string()));
    }

    let json = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_json::from_str(&json)?;

    config.name = name.to_string();
    config.description = description.to_string();
    config.last_modified = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    write_config(&config_path, &config)?;
    Ok(config)
}

/// 删除项目：连同目录下所有剧集数据一并移除，不可恢复
pub fn delete_project(root: &Path, project_id: &str) -> Result<(), AppError> {
    let project_path = project_dir(root, project_id);
    if !project_path.exists() {
        return Err(AppError::NotFound("项目文件夹不存在".to_string()));
    }

    fs::remove_dir_all(&project_path)?;
    tracing::info!("删除项目成功: {}", project_id);
    Ok(())
}

/// 列出所有项目。根目录不存在视为空列表；
/// 没有描述文件或描述文件损坏的目录跳过，不中断整个列表。
pub fn list_projects(root: &Path) -> Result<Vec<ProjectSummary>, AppError> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut projects = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().to_string();
        let config_path = path.join("project.json");
        if !config_path.exists() {
            continue;
        }

        let config = fs::read_to_string(&config_path)
            .map_err(AppError::from)
            .and_then(|json| Ok(serde_json::from_str::<ProjectConfig>(&json)?));

        match config {
            Ok(config) => projects.push(ProjectSummary {
                id: dir_name,
                name: if config.name.is_empty() {
                    entry.file_name().to_string_lossy().to_string()
                } else {
                    config.name
                },
                description: config.description,
                create_time: to_date_only(&config.create_time),
                last_modified: to_date_only(&config.last_modified),
            }),
            Err(e) => {
                tracing::warn!("读取项目配置失败 {}: {}", config_path.display(), e);
            }
        }
    }

    Ok(projects)
}
