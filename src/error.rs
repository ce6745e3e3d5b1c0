//! 卡组与本地存储的错误类型。

use std::path::PathBuf;

use thiserror::Error;

/// 读取/校验卡组数据时的错误。
#[derive(Debug, Error)]
pub enum CardError {
    #[error("读取卡组文件失败: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("卡组为空")]
    Empty,

    #[error("解析卡组 JSON 失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("卡片 id 重复: {0}")]
    DuplicateId(i64),

    /// question 或 answer 为空串（仅空白也算空）。
    #[error("卡片 {id} 的 {field} 为空")]
    EmptyField { id: i64, field: &'static str },
}

/// 键值存储读写错误。调用方只记录日志，不向用户展示。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("读写存储文件失败: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("存储内容不是合法 JSON: {0}")]
    Json(#[from] serde_json::Error),
}
