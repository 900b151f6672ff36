//! 剧集仓库：剧集嵌套在项目目录的 `episodes/` 子树下，
//! 目录名即剧集 ID，`episode.json` 是权威描述文件。
//! 同时提供剧集目录内任意命名文件的读写（脚本、生成的音频元数据等）。

use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// 创建剧集时固定生成的子目录
const EPISODE_SUB_DIRS: [&str; 3] = ["scripts", "audio", "temp"];

/// episode.json 描述文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeConfig {
    pub id: i64,
    pub title: String,
    #[serde(rename = "douyinUrl", default)]
    pub douyin_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "createTime", default)]
    pub create_time: String,
    #[serde(rename = "lastModified", default)]
    pub last_modified: String,
    // 角色列表整体替换，从未设置过时字段不落盘
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// episode.create 的入参
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEpisode {
    pub title: String,
    #[serde(rename = "douyinUrl", default)]
    pub douyin_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn episodes_dir(root: &Path, project_id: &str) -> PathBuf {
    crate::project::project_dir(root, project_id).join("episodes")
}

pub fn episode_dir(root: &Path, project_id: &str, episode_id: i64) -> PathBuf {
    episodes_dir(root, project_id).join(episode_id.to_string())
}

pub fn episode_config_path(root: &Path, project_id: &str, episode_id: i64) -> PathBuf {
    episode_dir(root, project_id, episode_id).join("episode.json")
}

fn write_raw_config(path: &Path, config: &Map<String, Value>) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_raw_config(path: &Path) -> Result<Map<String, Value>, AppError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str::<Map<String, Value>>(&json)?)
}

/// 创建剧集：ID 取当前毫秒时间戳，同时建好三个固定子目录
pub fn create_episode(
    root: &Path,
    project_id: &str,
    data: NewEpisode,
) -> Result<EpisodeConfig, AppError> {
    let project_path = crate::project::project_dir(root, project_id);
    if !project_path.exists() {
        return Err(AppError::NotFound("项目文件夹不存在".to_string()));
    }

    let episode_id = Utc::now().timestamp_millis();
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let config = EpisodeConfig {
        id: episode_id,
        title: data.title,
        douyin_url: data.douyin_url.unwrap_or_default(),
        description: data.description.unwrap_or_default(),
        create_time: now.clone(),
        last_modified: now,
        characters: None,
        extra: Map::new(),
    };

    let episode_path = episode_dir(root, project_id, episode_id);
    fs::create_dir_all(&episode_path)?;

    let config_path = episode_config_path(root, project_id, episode_id);
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, json)?;

    for sub in EPISODE_SUB_DIRS {
        fs::create_dir_all(episode_path.join(sub))?;
    }

    tracing::info!("创建剧集成功: {}", config_path.display());
    Ok(config)
}

/// 按 createTime 升序排序的键；时间相同按 ID 升序，
/// 不依赖平台相关的目录枚举顺序
fn sort_key(config: &EpisodeConfig) -> (i64, i64) {
    let millis = DateTime::parse_from_rfc3339(&config.create_time)
        .map(|d| d.timestamp_millis())
        .unwrap_or(0);
    (millis, config.id)
}

/// 列出项目下所有剧集。`episodes/` 不存在视为空列表；
/// 描述文件损坏的剧集跳过，不中断整个列表。
pub fn list_episodes(root: &Path, project_id: &str) -> Result<Vec<EpisodeConfig>, AppError> {
    let episodes_path = episodes_dir(root, project_id);
    if !episodes_path.exists() {
        return Ok(Vec::new());
    }

    let mut episodes = Vec::new();

    for entry in fs::read_dir(&episodes_path)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let config_path = path.join("episode.json");
        if !config_path.exists() {
            continue;
        }

        let config = fs::read_to_string(&config_path)
            .map_err(AppError::from)
            .and_then(|json| Ok(serde_json::from_str::<EpisodeConfig>(&json)?));

        match config {
            Ok(config) => episodes.push(config),
            Err(e) => {
                tracing::warn!("读取剧集配置失败 {}: {}", config_path.display(), e);
            }
        }
    }

    episodes.sort_by_key(sort_key);
    Ok(episodes)
}

/// 在描述文件上做 JSON 级合并：patch 覆盖现有字段，
/// 但 `id` 和 `createTime` 始终以存量记录为准，并加盖 lastModified。
fn merge_config(
    config_path: &Path,
    patch: Map<String, Value>,
) -> Result<EpisodeConfig, AppError> {
    let mut config = read_raw_config(config_path)?;

    let original_id = config.get("id").cloned();
    let original_create_time = config.get("createTime").cloned();

    for (key, value) in patch {
        config.insert(key, value);
    }

    if let Some(id) = original_id {
        config.insert("id".to_string(), id);
    }
    if let Some(create_time) = original_create_time {
        config.insert("createTime".to_string(), create_time);
    }
    config.insert(
        "lastModified".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    write_raw_config(config_path, &config)?;
    Ok(serde_json::from_value(Value::Object(config))?)
}

pub fn update_episode(
    root: &Path,
    project_id: &str,
    episode_id: i64,
    patch: Map<String, Value>,
) -> Result<EpisodeConfig, AppError> {
    let config_path = episode_config_path(root, project_id, episode_id);
    if !config_path.exists() {
        return Err(AppError::NotFound("剧集文件不存在".to_string()));
    }

    merge_config(&config_path, patch)
}

pub fn delete_episode(root: &Path, project_id: &str, episode_id: i64) -> Result<(), AppError> {
    let episode_path = episode_dir(root, project_id, episode_id);
    if !episode_path.exists() {
        return Err(AppError::NotFound("剧集文件夹不存在".to_string()));
    }

    fs::remove_dir_all(&episode_path)?;
    tracing::info!("删除剧集成功: {}/{}", project_id, episode_id);
    Ok(())
}

/// 整体替换剧集角色列表（不做增量合并）
pub fn set_characters(
    root: &Path,
    project_id: &str,
    episode_id: i64,
    characters: Vec<String>,
) -> Result<EpisodeConfig, AppError> {
    let config_path = episode_config_path(root, project_id, episode_id);
    if !config_path.exists() {
        return Err(AppError::NotFound("剧集配置文件不存在".to_string()));
    }

    let mut patch = Map::new();
    patch.insert(
        "characters".to_string(),
        Value::Array(characters.into_iter().map(Value::String).collect()),
    );
    merge_config(&config_path, patch)
}

/// 读取剧集角色列表；从未设置过时返回空列表而不是错误
pub fn get_characters(
    root: &Path,
    project_id: &str,
    episode_id: i64,
) -> Result<Vec<String>, AppError> {
    let config_path = episode_config_path(root, project_id, episode_id);
    if !config_path.exists() {
        return Err(AppError::NotFound("剧集配置文件不存在".to_string()));
    }

    let json = fs::read_to_string(&config_path)?;
    let config: EpisodeConfig = serde_json::from_str(&json)?;
    Ok(config.characters.unwrap_or_default())
}

/// 文件名必须是单个普通路径段：空串、分隔符、`.`、`..` 一律拒绝，
/// 防止拼接出剧集目录之外的路径
fn validate_file_name(name: &str) -> Result<(), AppError> {
    if name.contains('\\') {
        return Err(AppError::InvalidFileName(name.to_string()));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(AppError::InvalidFileName(name.to_string())),
    }
}

/// 写入剧集目录内的文件。剧集目录不存在时顺手创建（容忍性写入），
/// 已有内容直接覆盖。
pub fn write_episode_file(
    root: &Path,
    project_id: &str,
    episode_id: i64,
    file_name: &str,
    content: &str,
) -> Result<PathBuf, AppError> {
    validate_file_name(file_name)?;

    let episode_path = episode_dir(root, project_id, episode_id);
    fs::create_dir_all(&episode_path)?;

    let file_path = episode_path.join(file_name);
    fs::write(&file_path, content)?;

    tracing::info!("剧集文件写入成功: {}", file_path.display());
    Ok(file_path)
}

/// 读取剧集目录内的文件，按 UTF-8 文本返回
pub fn read_episode_file(
    root: &Path,
    project_id: &str,
    episode_id: i64,
    file_name: &str,
) -> Result<(String, PathBuf), AppError> {
    validate_file_name(file_name)?;

    let file_path = episode_dir(root, project_id, episode_id).join(file_name);
    if !file_path.exists() {
        return Err(AppError::NotFound("文件不存在".to_string()));
    }

    let content = fs::read_to_string(&file_path)?;
    Ok((content, file_path))
}
