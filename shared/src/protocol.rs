//! 接口协议类型
//!
//! 每个端点的请求/响应都有显式的 serde 类型，在边界处解析，
//! 不信任隐式的响应形状。

use serde::{Deserialize, Serialize};

// =========================================================
// 通用响应信封 (Response Envelope)
// =========================================================

/// 后端统一的 `{ data, message?, status? }` 信封
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

// =========================================================
// 认证 (Authentication)
// =========================================================

/// 认证端点返回的用户信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 注册请求。确认密码只存在于表单层，不会上送。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

// =========================================================
// 聊天 (Chatbot)
// =========================================================

/// 对话角色。助手侧的线格式是 `model`，UI 层显示为 "Assistant"。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPart {
    pub text: String,
}

/// 一轮对话：`{ role, parts: [{ text }] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub parts: Vec<ChatPart>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![ChatPart { text: text.into() }],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            parts: vec![ChatPart { text: text.into() }],
        }
    }

    /// 第一个分段的文本（渲染用）
    pub fn text(&self) -> &str {
        self.parts.first().map(|p| p.text.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_turn_wire_format() {
        let turn = ChatTurn::model("Welcome to CampusHub");
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(
            value,
            json!({ "role": "model", "parts": [{ "text": "Welcome to CampusHub" }] })
        );

        let back: ChatTurn = serde_json::from_value(value).unwrap();
        assert_eq!(back, turn);
        assert_eq!(back.text(), "Welcome to CampusHub");
    }

    #[test]
    fn user_data_accepts_camel_case_and_missing_timestamps() {
        let user: UserData = serde_json::from_value(json!({
            "id": "u1",
            "name": "Alice",
            "email": "alice@example.edu",
            "role": "student",
            "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.created_at.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(user.updated_at, None);
    }

    #[test]
    fn envelope_tolerates_extra_fields() {
        let env: ApiResponse<Vec<ChatTurn>> = serde_json::from_value(json!({
            "data": [{ "role": "user", "parts": [{ "text": "hi" }] }],
            "message": "ok",
            "status": 200,
            "requestId": "ignored"
        }))
        .unwrap();
        assert_eq!(env.data.len(), 1);
        assert_eq!(env.data[0].role, ChatRole::User);
    }
}
