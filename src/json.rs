use super::error::{Error, Result};
use serde::{ser::Error as _, Serialize};
use serde_json::{ser::Formatter, Serializer};
use std::io::{Result as IOResult, Write};

/// 紧凑格式的 JSON 格式化器，额外将字符串中的 `/` 转义为 `\/`
///
/// 签名服务按字节计算签名，输出必须与既有的策略文本逐字节一致
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SlashEscapingFormatter;

impl Formatter for SlashEscapingFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> IOResult<()>
    where
        W: ?Sized + Write,
    {
        let mut parts = fragment.split('/');
        if let Some(first) = parts.next() {
            writer.write_all(first.as_bytes())?;
        }
        for part in parts {
            writer.write_all(b"\\/")?;
            writer.write_all(part.as_bytes())?;
        }
        Ok(())
    }
}

pub(crate) fn to_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut buf, SlashEscapingFormatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

pub(crate) fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let buf = to_vec(value)?;
    String::from_utf8(buf).map_err(|err| Error::Serialization(serde_json::Error::custom(err)))
}
