use super::{
    base::{base64, iso8601::Iso8601},
    condition::{Condition, ConditionKey},
    error::{Error, Result},
    json,
};
use log::debug;
use serde::Serialize;
use std::{
    fmt,
    time::{Duration, SystemTime},
};

/// 签名算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningAlgorithm {
    /// `AWS4-HMAC-SHA256`
    HmacSha256,
}

impl SigningAlgorithm {
    /// 算法名称，即表单字段 `x-amz-algorithm` 的值
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            SigningAlgorithm::HmacSha256 => "AWS4-HMAC-SHA256",
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// POST 上传策略
///
/// 序列化后即为签名服务计算签名所用的策略文本，格式为
/// `{"conditions":[...],"expiration":"<ISO-8601>"}`。
/// 条件按照给出的顺序原样输出，不排序、不去重。
///
/// ### 生成上传策略
///
/// ```
/// use s3_post_policy::{Condition, ConditionKey, PolicyDocument};
/// use std::time::UNIX_EPOCH;
///
/// let policy = PolicyDocument::new(
///     UNIX_EPOCH,
///     vec![Condition::exact(ConditionKey::Bucket, "s3-bucket")],
/// );
/// assert_eq!(
///     policy.to_json().unwrap(),
///     r#"{"conditions":[{"bucket":"s3-bucket"}],"expiration":"1970-01-01T00:00:00Z"}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyDocument {
    conditions: Vec<Condition>,
    expiration: String,
}

impl PolicyDocument {
    /// 创建上传策略
    ///
    /// # Arguments
    ///
    /// * `expiration` - 上传策略有效截止时间
    /// * `conditions` - 上传条件列表
    pub fn new(expiration: SystemTime, conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            expiration: Iso8601::from_system_time(expiration).into_parts().0,
        }
    }

    /// 创建上传策略构建器
    #[inline]
    pub fn builder(expiration: SystemTime) -> PolicyDocumentBuilder {
        PolicyDocumentBuilder::new(expiration)
    }

    /// 上传策略有效截止时间
    #[inline]
    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// 上传条件列表
    #[inline]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// 序列化为 JSON 字符串
    ///
    /// 相同的上传策略总是得到完全相同的字节
    pub fn to_json(&self) -> Result<String> {
        let serialized = json::to_string(self)?;
        debug!("post policy: {}", serialized);
        Ok(serialized)
    }

    /// 序列化为 JSON 字符串后进行 Base64 编码，作为表单字段 `Policy` 的值
    #[inline]
    pub fn to_base64(&self) -> Result<String> {
        self.to_json().map(|serialized| base64::encode_str(&serialized))
    }
}

/// 上传策略构建器
///
/// 条件按照调用顺序排列
#[derive(Debug, Clone)]
pub struct PolicyDocumentBuilder {
    expiration: SystemTime,
    conditions: Vec<Condition>,
}

impl PolicyDocumentBuilder {
    /// 创建上传策略构建器
    ///
    /// # Arguments
    ///
    /// * `expiration` - 上传策略有效截止时间
    #[inline]
    pub fn new(expiration: SystemTime) -> Self {
        Self {
            expiration,
            conditions: vec![],
        }
    }

    /// 创建从当前时间起在 `lifetime` 后过期的上传策略构建器
    ///
    /// 如果截止时间超出可表示范围，返回 [`crate::Error::InvalidExpiration`]
    #[inline]
    pub fn expires_in(lifetime: Duration) -> Result<Self> {
        expiration_after(SystemTime::now(), lifetime).map(Self::new)
    }

    /// 追加上传条件
    #[inline]
    pub fn condition(mut self, condition: impl Into<Condition>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// 追加精确匹配条件
    #[inline]
    pub fn exact(self, key: ConditionKey, value: impl Into<String>) -> Self {
        self.condition(Condition::exact(key, value))
    }

    /// 追加前缀匹配条件
    #[inline]
    pub fn starts_with(self, key: ConditionKey, prefix: impl Into<String>) -> Self {
        self.condition(Condition::starts_with(key, prefix))
    }

    /// 追加文件尺寸范围条件
    ///
    /// 如果 `lower_bound` 大于 `upper_bound`，返回 [`crate::Error::InvalidRange`]
    #[inline]
    pub fn content_length_range(self, lower_bound: u64, upper_bound: u64) -> Result<Self> {
        Ok(self.condition(Condition::content_length_range(lower_bound, upper_bound)?))
    }

    /// 生成上传策略
    #[inline]
    pub fn build(self) -> PolicyDocument {
        PolicyDocument::new(self.expiration, self.conditions)
    }
}

/// 计算从 `now` 起在 `lifetime` 后的截止时间，截止时间必须能以四位年份表示
pub(crate) fn expiration_after(now: SystemTime, lifetime: Duration) -> Result<SystemTime> {
    now.checked_add(lifetime)
        .filter(|&expiration| Iso8601::checked_from_system_time(expiration).is_some())
        .ok_or(Error::InvalidExpiration)
}
