use crate::deepseek;
use crate::error::Result;
use crate::settings::Settings;

/// 对话补全：一次请求，失败由前端决定是否重试
#[tauri::command]
pub async fn call_deepseek(prompt: String, settings: Settings) -> Result<String> {
    deepseek::chat_completion(&prompt, &settings.deepseek)
        .await
        .map_err(|e| e.to_string())
}
