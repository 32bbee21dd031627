use std::time::Duration;

use thiserror::Error;

use crate::workflow::FlowStep;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 门户登录失败
    #[error("登录错误: {0}")]
    Login(#[from] LoginError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 启动浏览器进程失败
    #[error("无法启动浏览器 {executable}: {source}")]
    LaunchFailed {
        executable: String,
        #[source]
        source: std::io::Error,
    },
    /// 浏览器启动后调试端口一直不可用
    #[error("浏览器调试端口 {port} 在 {waited:?} 内未就绪")]
    DebugPortUnavailable { port: u16, waited: Duration },
    /// 没有可用的标签页
    #[error("浏览器中没有可用的标签页")]
    NoPage,
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 超时配置文件无效
    #[error("超时配置文件无效 ({path}): {reason}")]
    InvalidTimeoutsFile { path: String, reason: String },
    /// 表格文件不存在
    #[error("表格文件不存在: {path}")]
    SpreadsheetNotFound { path: String },
    /// 表格中没有有效的案件编号
    #[error("表格中没有有效的案件编号: {path}")]
    NoValidProcessNumbers { path: String },
}

/// 登录流程错误
#[derive(Debug, Error)]
pub enum LoginError {
    /// 等待某个登录步骤超时
    #[error("登录超时 (当前 URL: {url}): {source}")]
    Timeout {
        url: String,
        #[source]
        source: WaitError,
    },
    /// 其他意外错误
    #[error("登录意外失败 (当前 URL: {url}): {source}")]
    Unexpected {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

/// 轮询等待错误
#[derive(Debug, Error)]
pub enum WaitError {
    /// 在规定时间内条件未满足
    #[error("等待 {what} 超时 ({timeout:?}){}", describe_last_error(.last_error))]
    Timeout {
        what: String,
        timeout: Duration,
        last_error: Option<String>,
    },
}

fn describe_last_error(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(", 最后一次错误: {e}"),
        None => String::new(),
    }
}

/// 单个案件流程中某一步骤的失败
#[derive(Debug, Error)]
#[error("步骤 {step} 失败: {source:#}")]
pub struct FlowError {
    pub step: FlowStep,
    #[source]
    pub source: anyhow::Error,
}

impl FlowError {
    pub fn new(step: FlowStep, source: impl Into<anyhow::Error>) -> Self {
        Self {
            step,
            source: source.into(),
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
