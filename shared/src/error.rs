//! 错误类型
//!
//! 传输层和服务端的失败统一归一化为 `ApiError`。
//! 校验错误不在此列，它们停留在表单字段上，永远不会发起请求。

use std::fmt;

/// 归一化之后的请求失败
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 连接层失败（DNS、断网、CORS 等）
    Network(String),
    /// 请求超时（由客户端主动中止，区别于服务端错误）
    Timeout,
    /// 服务端返回非 2xx。message 优先取响应体里的 `{ message }`
    Http { status: u16, message: String },
    /// 2xx 但响应体无法按约定形状解析
    Decode(String),
}

/// 缺省的用户可见文案，与服务端约定保持一致
const FALLBACK_MESSAGE: &str = "Something went wrong";

impl ApiError {
    /// 从非 2xx 响应构造错误，尽量提取响应体里的 `{ message }`
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        ApiError::Http { status, message }
    }

    /// 展示给用户的文案。服务端给出的消息原样透出，
    /// 连接类失败只给通用提示。
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Timeout => "Request timed out. Please try again.".to_string(),
            ApiError::Network(_) | ApiError::Decode(_) => FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {}", msg),
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::Http { status, message } => write!(f, "http {}: {}", status, message),
            ApiError::Decode(msg) => write!(f, "decode error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_body_is_used_verbatim() {
        let err = ApiError::from_response(401, r#"{"message":"Invalid credentials"}"#);
        assert_eq!(
            err,
            ApiError::Http {
                status: 401,
                message: "Invalid credentials".to_string()
            }
        );
        assert_eq!(err.user_message(), "Invalid credentials");
    }

    #[test]
    fn missing_or_malformed_body_falls_back_to_generic() {
        let html = ApiError::from_response(500, "<html>Internal Server Error</html>");
        assert_eq!(html.user_message(), "Something went wrong");

        let empty = ApiError::from_response(502, "");
        assert_eq!(empty.user_message(), "Something went wrong");

        let no_message = ApiError::from_response(400, r#"{"error":"nope"}"#);
        assert_eq!(no_message.user_message(), "Something went wrong");
    }

    #[test]
    fn timeout_is_not_a_server_error() {
        assert_eq!(ApiError::Timeout.status(), None);
        assert_ne!(
            ApiError::Timeout.user_message(),
            ApiError::from_response(504, "").user_message()
        );
    }
}
