/// 使用标准字符表（含填充）对数据进行 Base64 编码
#[inline]
pub fn encode(data: impl AsRef<[u8]>) -> String {
    ::base64::encode_config(data.as_ref(), ::base64::STANDARD)
}

/// 对字符串的 UTF-8 字节进行 Base64 编码
///
/// 常用于将上传策略 JSON 嵌入表单字段 `Policy`
#[inline]
pub fn encode_str(s: &str) -> String {
    encode(s.as_bytes())
}
