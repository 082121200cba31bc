use super::error::{Error, Result};
use serde::{
    de::{Deserialize, Deserializer, Error as DeserializeError},
    ser::{Serialize, SerializeMap, SerializeTuple, Serializer},
};
use std::{
    convert::TryFrom,
    fmt,
    ops::RangeInclusive,
    str::FromStr,
};

const STARTS_WITH_OPERATION: &str = "starts-with";
const EXACT_OPERATION: &str = "eq";

/// 上传条件可以引用的表单字段
///
/// 每个字段对应唯一的字段名称，大小写与通配符均按原样输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKey {
    /// `acl`
    Acl,
    /// `bucket`
    Bucket,
    /// `content-length-range`
    ContentLengthRange,
    /// `key`
    Key,
    /// `success_action_redirect`
    SuccessActionRedirect,
    /// `redirect`
    Redirect,
    /// `Cache-Control`
    CacheControl,
    /// `Content-Type`
    ContentType,
    /// `Content-Disposition`
    ContentDisposition,
    /// `Content-Encoding`
    ContentEncoding,
    /// `Expires`
    Expires,
    /// `success_action_status`
    SuccessActionStatus,
    /// `x-amz-algorithm`
    XAmzAlgorithm,
    /// `x-amz-credential`
    XAmzCredential,
    /// `x-amz-date`
    XAmzDate,
    /// `x-amz-security-token`
    XAmzSecurityToken,
    /// `x-amz-meta-*`
    XAmzMeta,
    /// `x-amz-*`
    XAmz,
}

impl ConditionKey {
    /// 所有字段
    pub const ALL: [ConditionKey; 18] = [
        ConditionKey::Acl,
        ConditionKey::Bucket,
        ConditionKey::ContentLengthRange,
        ConditionKey::Key,
        ConditionKey::SuccessActionRedirect,
        ConditionKey::Redirect,
        ConditionKey::CacheControl,
        ConditionKey::ContentType,
        ConditionKey::ContentDisposition,
        ConditionKey::ContentEncoding,
        ConditionKey::Expires,
        ConditionKey::SuccessActionStatus,
        ConditionKey::XAmzAlgorithm,
        ConditionKey::XAmzCredential,
        ConditionKey::XAmzDate,
        ConditionKey::XAmzSecurityToken,
        ConditionKey::XAmzMeta,
        ConditionKey::XAmz,
    ];

    /// 字段名称
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionKey::Acl => "acl",
            ConditionKey::Bucket => "bucket",
            ConditionKey::ContentLengthRange => "content-length-range",
            ConditionKey::Key => "key",
            ConditionKey::SuccessActionRedirect => "success_action_redirect",
            ConditionKey::Redirect => "redirect",
            ConditionKey::CacheControl => "Cache-Control",
            ConditionKey::ContentType => "Content-Type",
            ConditionKey::ContentDisposition => "Content-Disposition",
            ConditionKey::ContentEncoding => "Content-Encoding",
            ConditionKey::Expires => "Expires",
            ConditionKey::SuccessActionStatus => "success_action_status",
            ConditionKey::XAmzAlgorithm => "x-amz-algorithm",
            ConditionKey::XAmzCredential => "x-amz-credential",
            ConditionKey::XAmzDate => "x-amz-date",
            ConditionKey::XAmzSecurityToken => "x-amz-security-token",
            ConditionKey::XAmzMeta => "x-amz-meta-*",
            ConditionKey::XAmz => "x-amz-*",
        }
    }
}

impl fmt::Display for ConditionKey {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ConditionKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownConditionKey(s.to_owned()))
    }
}

impl Serialize for ConditionKey {
    #[inline]
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConditionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeserializeError::custom)
    }
}

/// 上传文件尺寸范围，单位为字节，包含上下限
///
/// 构造时保证下限不大于上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentLengthRange {
    lower_bound: u64,
    upper_bound: u64,
}

impl ContentLengthRange {
    /// 创建文件尺寸范围
    ///
    /// 如果 `lower_bound` 大于 `upper_bound`，返回 [`Error::InvalidRange`]
    pub fn new(lower_bound: u64, upper_bound: u64) -> Result<Self> {
        if lower_bound > upper_bound {
            return Err(Error::InvalidRange {
                lower: lower_bound,
                upper: upper_bound,
            });
        }
        Ok(Self {
            lower_bound,
            upper_bound,
        })
    }

    /// 最小尺寸
    #[inline]
    pub fn lower_bound(&self) -> u64 {
        self.lower_bound
    }

    /// 最大尺寸
    #[inline]
    pub fn upper_bound(&self) -> u64 {
        self.upper_bound
    }

    /// 判断尺寸是否在范围内
    #[inline]
    pub fn contains(&self, size: u64) -> bool {
        (self.lower_bound..=self.upper_bound).contains(&size)
    }
}

impl TryFrom<RangeInclusive<u64>> for ContentLengthRange {
    type Error = Error;

    #[inline]
    fn try_from(range: RangeInclusive<u64>) -> Result<Self> {
        Self::new(*range.start(), *range.end())
    }
}

impl From<ContentLengthRange> for RangeInclusive<u64> {
    #[inline]
    fn from(range: ContentLengthRange) -> Self {
        range.lower_bound..=range.upper_bound
    }
}

/// 上传条件
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// 字段值必须与给出的字符串完全相同，编码为 `{"<key>": "<value>"}`
    Exact(ConditionKey, String),
    /// 字段值必须以给出的字符串开头，编码为 `["starts-with", "$<key>", "<prefix>"]`
    StartsWith(ConditionKey, String),
    /// 上传文件尺寸范围，编码为 `["content-length-range", <lower>, <upper>]`
    ContentLengthRange(ContentLengthRange),
}

impl Condition {
    /// 创建精确匹配条件
    #[inline]
    pub fn exact(key: ConditionKey, value: impl Into<String>) -> Self {
        Condition::Exact(key, value.into())
    }

    /// 创建前缀匹配条件
    #[inline]
    pub fn starts_with(key: ConditionKey, prefix: impl Into<String>) -> Self {
        Condition::StartsWith(key, prefix.into())
    }

    /// 创建文件尺寸范围条件
    #[inline]
    pub fn content_length_range(lower_bound: u64, upper_bound: u64) -> Result<Self> {
        ContentLengthRange::new(lower_bound, upper_bound).map(Condition::ContentLengthRange)
    }

    /// 条件的匹配操作名称
    pub fn operation(&self) -> &'static str {
        match self {
            Condition::Exact(..) => EXACT_OPERATION,
            Condition::StartsWith(..) => STARTS_WITH_OPERATION,
            Condition::ContentLengthRange(_) => ConditionKey::ContentLengthRange.as_str(),
        }
    }

    /// 条件引用的字段
    pub fn key(&self) -> ConditionKey {
        match self {
            Condition::Exact(key, _) | Condition::StartsWith(key, _) => *key,
            Condition::ContentLengthRange(_) => ConditionKey::ContentLengthRange,
        }
    }
}

impl From<ContentLengthRange> for Condition {
    #[inline]
    fn from(range: ContentLengthRange) -> Self {
        Condition::ContentLengthRange(range)
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Condition::Exact(key, value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key.as_str(), value)?;
                map.end()
            }
            Condition::StartsWith(key, prefix) => {
                let mut tuple = serializer.serialize_tuple(3)?;
                tuple.serialize_element(self.operation())?;
                tuple.serialize_element(&format!("${}", key))?;
                tuple.serialize_element(prefix)?;
                tuple.end()
            }
            Condition::ContentLengthRange(range) => {
                let mut tuple = serializer.serialize_tuple(3)?;
                tuple.serialize_element(self.operation())?;
                tuple.serialize_element(&range.lower_bound)?;
                tuple.serialize_element(&range.upper_bound)?;
                tuple.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{super::json, *};
    use std::{collections::HashSet, error::Error, result::Result};

    #[test]
    fn test_condition_key_fidelity() -> Result<(), Box<dyn Error>> {
        assert_eq!(ConditionKey::CacheControl.as_str(), "Cache-Control");
        assert_eq!(ConditionKey::XAmzMeta.as_str(), "x-amz-meta-*");
        assert_eq!(ConditionKey::XAmz.to_string(), "x-amz-*");
        assert_eq!(
            ConditionKey::SuccessActionStatus.as_str(),
            "success_action_status"
        );

        let names: HashSet<_> = ConditionKey::ALL.iter().map(|key| key.as_str()).collect();
        assert_eq!(names.len(), ConditionKey::ALL.len());

        for key in ConditionKey::ALL.iter().copied() {
            assert_eq!(key.as_str().parse::<ConditionKey>()?, key);
            assert_eq!(
                json::to_string(&Condition::exact(key, "v"))?,
                format!(r#"{{"{}":"v"}}"#, key.as_str())
            );
            assert_eq!(
                json::to_string(&Condition::starts_with(key, ""))?,
                format!(r#"["starts-with","${}",""]"#, key.as_str())
            );
        }
        Ok(())
    }

    #[test]
    fn test_condition_key_parse_is_case_sensitive() {
        assert!(matches!(
            "cache-control".parse::<ConditionKey>(),
            Err(super::Error::UnknownConditionKey(key)) if key == "cache-control"
        ));
        assert!("BUCKET".parse::<ConditionKey>().is_err());
        assert!("x-amz-meta-uuid".parse::<ConditionKey>().is_err());
    }

    #[test]
    fn test_condition_key_deserialize() -> Result<(), Box<dyn Error>> {
        let keys: Vec<ConditionKey> = serde_json::from_str(r#"["Content-Type","x-amz-*"]"#)?;
        assert_eq!(keys, vec![ConditionKey::ContentType, ConditionKey::XAmz]);
        assert!(serde_json::from_str::<ConditionKey>(r#""content-type""#).is_err());
        Ok(())
    }

    #[test]
    fn test_encode_exact() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            json::to_string(&Condition::exact(ConditionKey::Bucket, "s3-bucket"))?,
            r#"{"bucket":"s3-bucket"}"#
        );
        assert_eq!(
            json::to_string(&Condition::exact(
                ConditionKey::SuccessActionRedirect,
                "http://localhost/"
            ))?,
            r#"{"success_action_redirect":"http:\/\/localhost\/"}"#
        );
        assert_eq!(
            json::to_string(&Condition::exact(ConditionKey::Key, "say \"hi\""))?,
            r#"{"key":"say \"hi\""}"#
        );
        Ok(())
    }

    #[test]
    fn test_encode_starts_with() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            json::to_string(&Condition::starts_with(ConditionKey::ContentType, "image/"))?,
            r#"["starts-with","$Content-Type","image\/"]"#
        );
        assert_eq!(
            json::to_string(&Condition::starts_with(ConditionKey::XAmzMeta, ""))?,
            r#"["starts-with","$x-amz-meta-*",""]"#
        );
        Ok(())
    }

    #[test]
    fn test_encode_content_length_range() -> Result<(), Box<dyn Error>> {
        assert_eq!(
            json::to_string(&Condition::content_length_range(0, 5242880)?)?,
            r#"["content-length-range",0,5242880]"#
        );
        assert_eq!(
            json::to_string(&Condition::content_length_range(7, 7)?)?,
            r#"["content-length-range",7,7]"#
        );
        assert_eq!(
            json::to_string(&Condition::content_length_range(0, u64::MAX)?)?,
            r#"["content-length-range",0,18446744073709551615]"#
        );
        Ok(())
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            ContentLengthRange::new(2, 1),
            Err(super::Error::InvalidRange { lower: 2, upper: 1 })
        ));
        assert!(matches!(
            Condition::content_length_range(u64::MAX, 0),
            Err(super::Error::InvalidRange { .. })
        ));
        assert!(ContentLengthRange::try_from(10..=9).is_err());
    }

    #[test]
    fn test_range_accessors() -> Result<(), Box<dyn Error>> {
        let range = ContentLengthRange::try_from(1..=1024)?;
        assert_eq!(range.lower_bound(), 1);
        assert_eq!(range.upper_bound(), 1024);
        assert!(range.contains(1));
        assert!(range.contains(1024));
        assert!(!range.contains(0));
        assert!(!range.contains(1025));
        assert_eq!(RangeInclusive::from(range), 1..=1024);

        let condition = Condition::from(range);
        assert_eq!(condition.key(), ConditionKey::ContentLengthRange);
        assert_eq!(condition.operation(), "content-length-range");
        Ok(())
    }

    #[test]
    fn test_operation() {
        assert_eq!(Condition::exact(ConditionKey::Acl, "private").operation(), "eq");
        assert_eq!(
            Condition::starts_with(ConditionKey::Key, "user/").operation(),
            "starts-with"
        );
        assert_eq!(
            Condition::starts_with(ConditionKey::Key, "user/").key(),
            ConditionKey::Key
        );
    }
}
