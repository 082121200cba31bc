use thiserror::Error;

/// 上传策略错误
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// 文件尺寸范围下限大于上限
    #[error("Invalid content length range: {lower} > {upper}")]
    InvalidRange {
        /// 范围下限
        lower: u64,
        /// 范围上限
        upper: u64,
    },

    /// 上传策略有效截止时间超出可表示范围（0000 年至 9999 年）
    #[error("Expiration is out of range")]
    InvalidExpiration,

    /// 上传策略 JSON 序列化错误
    #[error("Serialize policy as json error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 无法识别的条件字段名称
    #[error("Unknown condition key: {0}")]
    UnknownConditionKey(String),
}

/// 上传策略结果
pub type Result<T> = std::result::Result<T, Error>;
