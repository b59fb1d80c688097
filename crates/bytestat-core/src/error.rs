//! 错误类型（配置与输入收集）
//!
//! 统计引擎本身没有错误路径；这里只覆盖外围的配置加载与输入路径校验。
use std::path::PathBuf;
use thiserror::Error;

/// 配置文件加载/校验错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// 单个输入路径无效（收集过程继续，仅记录）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{}' is not a valid file", .0.display())]
    NotAFile(PathBuf),
    #[error("'{}' is not a valid directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to list directory '{}': {}", .path.display(), .message)]
    Unreadable { path: PathBuf, message: String },
}
