//! DeepSeek Chat Completions 客户端。
//!
//! 单次请求/响应，不重试、不走流式（请求里显式 stream:false）。
//! 失败由调用方（前端）决定是否重试。

use crate::error::AppError;
use crate::settings::DeepSeekSettings;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_MAX_TOKENS: u32 = 6000;
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

/// 已知可用的模型名。不在列表内只告警，不拒绝请求
const VALID_MODELS: [&str; 2] = ["deepseek-chat", "deepseek-reasoner"];

/// 套用默认值之后的请求配置
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl ResolvedConfig {
    /// 从设置里解析出完整配置。API Key 缺失直接失败，
    /// maxTokens/temperature 接受数字或数字字符串，解析不了退回默认值。
    pub fn from_settings(settings: &DeepSeekSettings) -> Result<Self, AppError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::Config("未配置 DeepSeek API Key".to_string()))?;

        Ok(Self {
            api_key,
            base_url: settings
                .base_url
                .clone()
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: settings
                .model
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_int(settings.max_tokens.as_ref(), DEFAULT_MAX_TOKENS),
            temperature: parse_float(settings.temperature.as_ref(), DEFAULT_TEMPERATURE),
        })
    }
}

fn parse_int(value: Option<&Value>, default: u32) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v >= 1.0 => v.trunc() as u32,
        _ => default,
    }
}

fn parse_float(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// 响应体里的生成文本：choices[0].message.content。
/// 空字符串视同缺失。
pub fn extract_generated_text(body: &Value) -> Option<&str> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .filter(|s| !s.is_empty())
}

/// 发起一次对话补全请求并返回生成的文本
pub async fn chat_completion(
    prompt: &str,
    settings: &DeepSeekSettings,
) -> Result<String, AppError> {
    let config = ResolvedConfig::from_settings(settings)?;

    if !VALID_MODELS.contains(&config.model.as_str()) {
        tracing::warn!(
            "模型名称 \"{}\" 可能不正确，支持的模型: {:?}",
            config.model,
            VALID_MODELS
        );
    }

    let request_body = json!({
        "model": config.model,
        "messages": [{ "role": "user", "content": prompt }],
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "stream": false
    });

    let url = format!("{}/v1/chat/completions", config.base_url);
    tracing::info!(
        "调用 DeepSeek API: {} (模型 {}, 提示词长度 {})",
        url,
        config.model,
        prompt.chars().count()
    );

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", config.api_key))
        .json(&request_body)
        .timeout(Duration::from_secs(120))
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::Upstream(format!(
            "API 请求失败: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )));
    }

    let body: Value = response.json().await?;
    extract_generated_text(&body)
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::Upstream("API 响应格式错误".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key() -> DeepSeekSettings {
        DeepSeekSettings {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let config = ResolvedConfig::from_settings(&settings_with_key()).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_resolve_requires_api_key() {
        let err = ResolvedConfig::from_settings(&DeepSeekSettings::default()).unwrap_err();
        assert_eq!(err.to_string(), "未配置 DeepSeek API Key");

        let blank = DeepSeekSettings {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(ResolvedConfig::from_settings(&blank).is_err());
    }

    #[test]
    fn test_resolve_accepts_string_numbers() {
        let settings = DeepSeekSettings {
            api_key: Some("sk-test".to_string()),
            max_tokens: Some(json!("8000")),
            temperature: Some(json!("0.7")),
            ..Default::default()
        };
        let config = ResolvedConfig::from_settings(&settings).unwrap();
        assert_eq!(config.max_tokens, 8000);
        assert_eq!(config.temperature, 0.7);
    }

    #[test]
    fn test_resolve_falls_back_on_garbage() {
        let settings = DeepSeekSettings {
            api_key: Some("sk-test".to_string()),
            max_tokens: Some(json!("abc")),
            temperature: Some(json!({"nested": true})),
            ..Default::default()
        };
        let config = ResolvedConfig::from_settings(&settings).unwrap();
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_extract_generated_text() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "你好" } }]
        });
        assert_eq!(extract_generated_text(&body), Some("你好"));
    }

    #[test]
    fn test_extract_rejects_malformed_bodies() {
        // 缺 choices、choices 为空、content 为空串，一律视为格式错误
        assert_eq!(extract_generated_text(&json!({})), None);
        assert_eq!(extract_generated_text(&json!({ "choices": [] })), None);
        assert_eq!(
            extract_generated_text(&json!({
                "choices": [{ "message": { "content": "" } }]
            })),
            None
        );
        assert_eq!(
            extract_generated_text(&json!({
                "choices": [{ "message": {} }]
            })),
            None
        );
    }
}
