use std::time::Duration;

use thiserror::Error;

/// 浏览器会话错误
///
/// `Timeout` 与其他错误分开，调用方据此决定记 WARN 还是 ERROR。
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    /// 有界等待超时
    #[error("等待元素 '{selector}' 超时 ({waited:?})")]
    Timeout { selector: String, waited: Duration },
    /// 导航失败
    #[error("导航到 {url} 失败: {message}")]
    Navigation { url: String, message: String },
    /// 元素不存在
    #[error("找不到元素 '{selector}': {message}")]
    ElementNotFound { selector: String, message: String },
    /// 执行脚本或交互失败
    #[error("执行脚本失败: {0}")]
    Script(String),
    /// 启动或连接浏览器失败
    #[error("启动浏览器失败: {0}")]
    Launch(String),
    /// 会话已关闭
    #[error("浏览器会话已关闭")]
    Closed,
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }

    /// 创建超时错误
    pub fn timeout(selector: impl Into<String>, waited: Duration) -> Self {
        DriverError::Timeout {
            selector: selector.into(),
            waited,
        }
    }
}

impl From<chromiumoxide::error::CdpError> for DriverError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        DriverError::Script(err.to_string())
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(err: serde_json::Error) -> Self {
        DriverError::Script(format!("无法解析脚本返回值: {}", err))
    }
}

/// 进度文件错误
#[derive(Debug, Error)]
pub enum ProgressError {
    /// 读取文件失败
    #[error("读取进度文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入进度文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件不存在或不可读
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 字段取值非法
    #[error("配置项 {key} 非法: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// 浏览器操作结果类型
pub type DriverResult<T> = Result<T, DriverError>;
