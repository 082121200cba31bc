use super::{
    condition::{ConditionKey, ContentLengthRange},
    error::Error as PolicyError,
    policy::{expiration_after, PolicyDocument, PolicyDocumentBuilder},
};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Error as IOError,
    path::Path,
    time::{Duration, SystemTime},
};
use tap::prelude::*;
use thiserror::Error;

const DEFAULT_LIFETIME_S: u64 = 3600;

/// 上传策略模板配置
///
/// 可以从 TOML 或 JSON 格式的配置文件中加载，描述浏览器直传时的默认上传条件
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    bucket: String,

    acl: Option<String>,

    #[serde(alias = "object_key")]
    key: Option<String>,

    #[serde(alias = "object_key_prefix")]
    key_prefix: Option<String>,

    success_action_redirect: Option<String>,

    #[serde(alias = "status")]
    success_action_status: Option<u16>,

    #[serde(alias = "mime_prefix")]
    content_type_prefix: Option<String>,

    #[serde(alias = "fsize_min")]
    min_size: Option<u64>,

    #[serde(alias = "fsize_limit")]
    max_size: Option<u64>,

    #[serde(alias = "lifetime")]
    lifetime_s: Option<u64>,
}

impl Config {
    /// 创建上传策略模板配置构建器
    #[inline]
    pub fn builder(bucket: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(bucket)
    }

    /// 解析 TOML 格式的配置
    #[inline]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigParseError> {
        Ok(toml::from_str(s)?)
    }

    /// 解析 JSON 格式的配置
    #[inline]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigParseError> {
        Ok(serde_json::from_str(s)?)
    }

    /// 从配置文件中加载配置
    ///
    /// 以 `.toml` 结尾的文件按照 TOML 格式解析，其余按照 JSON 格式解析
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigParseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .tap_err(|err| error!("Policy config file cannot be open: {:?}: {}", path, err))?;
        let config = if path.extension().map_or(false, |ext| ext == "toml") {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        config
            .tap_ok(|_| info!("Policy config was loaded from {:?}", path))
            .tap_err(|err| error!("Policy config file cannot be deserialized: {:?}: {}", path, err))
    }

    /// 存储空间
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// 上传策略有效期，默认为 1 小时
    #[inline]
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_s.unwrap_or(DEFAULT_LIFETIME_S))
    }

    /// 文件尺寸范围
    ///
    /// 仅设置上限时下限为 0，仅设置下限时上限不受限制，均未设置时返回 `None`
    pub fn content_length_range(&self) -> Result<Option<ContentLengthRange>, PolicyError> {
        match (self.min_size, self.max_size) {
            (None, None) => Ok(None),
            (min, max) => {
                ContentLengthRange::new(min.unwrap_or(0), max.unwrap_or(u64::MAX)).map(Some)
            }
        }
    }

    /// 以 `now` 为起始时间生成上传策略
    ///
    /// 截止时间超出可表示范围时返回 [`crate::Error::InvalidExpiration`]。
    /// 条件依次为 `bucket`、`key`（或对象名称前缀）、`acl`、`success_action_redirect`、
    /// `success_action_status`、`Content-Type` 前缀和文件尺寸范围
    pub fn policy_at(&self, now: SystemTime) -> Result<PolicyDocument, ConfigParseError> {
        let expiration = expiration_after(now, self.lifetime())?;
        let mut builder =
            PolicyDocumentBuilder::new(expiration).exact(ConditionKey::Bucket, &self.bucket);
        if let Some(key) = &self.key {
            builder = builder.exact(ConditionKey::Key, key);
        } else if let Some(prefix) = &self.key_prefix {
            builder = builder.starts_with(ConditionKey::Key, prefix);
        }
        if let Some(acl) = &self.acl {
            builder = builder.exact(ConditionKey::Acl, acl);
        }
        if let Some(redirect) = &self.success_action_redirect {
            builder = builder.exact(ConditionKey::SuccessActionRedirect, redirect);
        }
        if let Some(status) = self.success_action_status {
            builder = builder.exact(ConditionKey::SuccessActionStatus, status.to_string());
        }
        if let Some(prefix) = &self.content_type_prefix {
            builder = builder.starts_with(ConditionKey::ContentType, prefix);
        }
        if let Some(range) = self.content_length_range()? {
            builder = builder.condition(range);
        }
        Ok(builder.build())
    }

    /// 以当前时间为起始时间生成上传策略
    #[inline]
    pub fn policy(&self) -> Result<PolicyDocument, ConfigParseError> {
        self.policy_at(SystemTime::now())
    }
}

/// 上传策略模板配置构建器
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    inner: Config,
}

impl ConfigBuilder {
    /// 创建上传策略模板配置构建器
    #[inline]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            inner: Config {
                bucket: bucket.into(),
                ..Default::default()
            },
        }
    }

    /// 配置访问控制策略，例如 `private`
    #[inline]
    pub fn acl(mut self, acl: impl Into<String>) -> Self {
        self.inner.acl = Some(acl.into());
        self
    }

    /// 配置对象名称
    #[inline]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.inner.key = Some(key.into());
        self
    }

    /// 配置对象名称前缀，仅当未配置对象名称时生效
    #[inline]
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.key_prefix = Some(prefix.into());
        self
    }

    /// 配置上传成功后浏览器跳转的 URL
    #[inline]
    pub fn success_action_redirect(mut self, url: impl Into<String>) -> Self {
        self.inner.success_action_redirect = Some(url.into());
        self
    }

    /// 配置上传成功后返回的状态码
    #[inline]
    pub fn success_action_status(mut self, status: u16) -> Self {
        self.inner.success_action_status = Some(status);
        self
    }

    /// 配置 `Content-Type` 前缀，例如 `image/`
    #[inline]
    pub fn content_type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner.content_type_prefix = Some(prefix.into());
        self
    }

    /// 配置文件尺寸范围
    #[inline]
    pub fn size_range(mut self, min_size: Option<u64>, max_size: Option<u64>) -> Self {
        self.inner.min_size = min_size;
        self.inner.max_size = max_size;
        self
    }

    /// 配置上传策略有效期，默认为 1 小时
    #[inline]
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.inner.lifetime_s = Some(lifetime.as_secs());
        self
    }

    /// 生成上传策略模板配置
    #[inline]
    pub fn build(self) -> Config {
        self.inner
    }
}

/// 上传策略模板配置错误
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigParseError {
    /// 配置文件读取错误
    #[error("Read config error: {0}")]
    IOError(#[from] IOError),

    /// 配置 JSON 解析错误
    #[error("Parse config as json error: {0}")]
    JSONError(#[from] serde_json::Error),

    /// 配置 TOML 解析错误
    #[error("Parse config as toml error: {0}")]
    TOMLError(#[from] toml::de::Error),

    /// 配置无法生成合法的上传策略
    #[error("Build policy error: {0}")]
    Policy(#[from] PolicyError),
}
