/// Base64 编码
pub mod base64;
pub mod iso8601;
