#![warn(missing_docs)]

//! # s3-post-policy
//!
//! ## S3 POST 上传策略
//!
//! 负责生成浏览器表单直传所需的上传策略文本，交由签名服务计算签名
//!
//! ```
//! use s3_post_policy::{ConditionKey, PolicyDocument};
//! use std::time::UNIX_EPOCH;
//!
//! # fn main() -> Result<(), s3_post_policy::Error> {
//! let policy = PolicyDocument::builder(UNIX_EPOCH)
//!     .exact(ConditionKey::Bucket, "s3-bucket")
//!     .starts_with(ConditionKey::ContentType, "image/")
//!     .content_length_range(0, 5242880)?
//!     .build();
//! assert_eq!(
//!     policy.to_json()?,
//!     r#"{"conditions":[{"bucket":"s3-bucket"},["starts-with","$Content-Type","image\/"],["content-length-range",0,5242880]],"expiration":"1970-01-01T00:00:00Z"}"#,
//! );
//! # Ok(())
//! # }
//! ```

mod base;
mod condition;
mod config;
mod error;
mod json;
mod policy;

pub use base::{base64, iso8601::Iso8601};
pub use condition::{Condition, ConditionKey, ContentLengthRange};
pub use config::{Config, ConfigBuilder, ConfigParseError};
pub use error::{Error, Result};
pub use policy::{PolicyDocument, PolicyDocumentBuilder, SigningAlgorithm};
