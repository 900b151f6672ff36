use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    Serde(#[from] serde_json::Error),

    /// 必需配置缺失（默认项目路径、API Key 等）
    #[error("{0}")]
    Config(String),

    /// 期望的文件或目录不存在
    #[error("{0}")]
    NotFound(String),

    /// 目标已存在（项目目录碰撞）
    #[error("{0}")]
    Conflict(String),

    /// 远程 API 返回非 2xx，或响应体缺少期望字段
    #[error("{0}")]
    Upstream(String),

    #[error("非法文件名: {0}")]
    InvalidFileName(String),

    #[error("网络请求失败: {0}")]
    Http(#[from] reqwest::Error),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// 命令边界返回给前端的结果类型：预期失败统一降级为字符串消息
pub type Result<T> = std::result::Result<T, String>;
