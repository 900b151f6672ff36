//! 设置存储：设置对象 + 有界日志列表，持久化为应用配置目录下的单个 JSON 文件。
//!
//! 没有进程级单例，存储实例由 main.rs 注入 Tauri 托管状态，
//! 各个命令通过 `State<AppState>` 访问。

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 日志列表容量上限，超出后淘汰最旧的条目
pub const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathSettings {
    #[serde(
        rename = "defaultProjectPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_project_path: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepSeekSettings {
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(rename = "baseUrl", default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    // 前端可能传数字也可能传字符串，解析在 deepseek.rs 中完成
    #[serde(rename = "maxTokens", default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// 前端保存的完整设置对象。未建模的字段通过 flatten 原样保留，
/// 保证保存/读取往返不丢失 UI 自己的配置项。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub deepseek: DeepSeekSettings,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    settings: Option<Settings>,
    #[serde(default)]
    logs: Vec<LogEntry>,
}

pub struct SettingsStore {
    path: PathBuf,
    data: StoreData,
}

impl SettingsStore {
    /// 从指定文件加载存储。文件缺失或损坏时从空数据开始，不报错。
    pub fn load(path: PathBuf) -> Self {
        let data = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<StoreData>(&json) {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("设置存储文件解析失败，使用空数据: {}", e);
                    StoreData::default()
                }
            },
            Err(_) => StoreData::default(),
        };

        Self { path, data }
    }

    pub fn store_path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Option<&Settings> {
        self.data.settings.as_ref()
    }

    pub fn set_settings(&mut self, settings: Settings) -> Result<(), AppError> {
        self.data.settings = Some(settings);
        self.persist()
    }

    /// 所有项目/剧集操作的前置检查：默认项目路径未配置时直接失败，
    /// 不触碰文件系统。空字符串视同未配置。
    pub fn default_project_path(&self) -> Result<PathBuf, AppError> {
        self.data
            .settings
            .as_ref()
            .and_then(|s| s.paths.default_project_path.as_deref())
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| AppError::Config("未设置默认项目保存路径".to_string()))
    }

    /// 追加一条日志，容量满时先淘汰最旧的条目（FIFO）
    pub fn append_log(&mut self, entry: LogEntry) -> Result<(), AppError> {
        self.data.logs.push(entry);
        if self.data.logs.len() > MAX_LOG_ENTRIES {
            let overflow = self.data.logs.len() - MAX_LOG_ENTRIES;
            self.data.logs.drain(..overflow);
        }
        self.persist()
    }

    #[allow(dead_code)]
    pub fn logs(&self) -> &[LogEntry] {
        &self.data.logs
    }

    fn persist(&self) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

pub struct AppState {
    pub store: Mutex<SettingsStore>,
}

impl AppState {
    pub fn new(store: SettingsStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::load(dir.path().join("store.json"))
    }

    fn settings_with_path(path: &str) -> Settings {
        Settings {
            paths: PathSettings {
                default_project_path: Some(path.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_path_missing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let err = store.default_project_path().unwrap_err();
        assert_eq!(err.to_string(), "未设置默认项目保存路径");
    }

    #[test]
    fn test_default_path_empty_string_counts_as_unset() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_settings(settings_with_path("")).unwrap();
        assert!(store.default_project_path().is_err());
    }

    #[test]
    fn test_settings_round_trip_preserves_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let raw = json!({
            "paths": { "defaultProjectPath": "/tmp/projects", "exportPath": "/tmp/out" },
            "deepseek": { "apiKey": "sk-test", "maxTokens": "8000" },
            "ui": { "theme": "dark" }
        });
        let settings: Settings = serde_json::from_value(raw).unwrap();

        let mut store = SettingsStore::load(path.clone());
        store.set_settings(settings).unwrap();

        // 重新加载后未建模的字段仍然在
        let reloaded = SettingsStore::load(path);
        let s = reloaded.settings().unwrap();
        assert_eq!(
            s.paths.default_project_path.as_deref(),
            Some("/tmp/projects")
        );
        assert_eq!(s.paths.extra["exportPath"], json!("/tmp/out"));
        assert_eq!(s.extra["ui"]["theme"], json!("dark"));
        assert_eq!(s.deepseek.max_tokens, Some(json!("8000")));
    }

    #[test]
    fn test_corrupt_store_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json {{{").unwrap();

        let store = SettingsStore::load(path);
        assert!(store.settings().is_none());
        assert!(store.logs().is_empty());
    }

    #[test]
    fn test_log_ring_evicts_oldest() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        for i in 0..(MAX_LOG_ENTRIES + 5) {
            store
                .append_log(LogEntry {
                    timestamp: chrono::Utc::now().to_rfc3339(),
                    level: "info".to_string(),
                    message: format!("msg-{}", i),
                    data: None,
                })
                .unwrap();
        }

        assert_eq!(store.logs().len(), MAX_LOG_ENTRIES);
        // 最旧的 5 条被淘汰
        assert_eq!(store.logs()[0].message, "msg-5");
        assert_eq!(
            store.logs().last().unwrap().message,
            format!("msg-{}", MAX_LOG_ENTRIES + 4)
        );
    }
}
