//! CampusHub 共享领域层
//!
//! 与传输层无关的纯逻辑：协议类型、表单校验规则、以及
//! 会话/请求/守卫的状态机。此 crate 不依赖任何浏览器 API，
//! 可以在任意平台上编译和测试。

pub mod error;
pub mod protocol;
pub mod state;
pub mod validate;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const ENDPOINT_LOGIN: &str = "/users/login";
pub const ENDPOINT_REGISTER: &str = "/users/register";
pub const ENDPOINT_LOGOUT: &str = "/users/logout";
pub const ENDPOINT_PROFILE: &str = "/users/profile";
pub const ENDPOINT_CHAT: &str = "/chatbot/chat";
pub const ENDPOINT_CHAT_HISTORY: &str = "/chatbot/history";

/// 请求超时（毫秒）。超时与服务端返回的错误是两种不同的失败。
pub const REQUEST_TIMEOUT_MS: u32 = 10_000;

/// 会话探测结果的有效期（毫秒）。有效期内重复挂载不会重新探测。
pub const SESSION_STALE_MS: f64 = 5.0 * 60.0 * 1000.0;

/// 守卫重定向前的可见停留时间（毫秒）。
pub const REDIRECT_GRACE_MS: u32 = 500;

/// 通知自动消失时间（毫秒）。
pub const TOAST_DISMISS_MS: u64 = 3_000;

/// 服务端历史为空时本地兜底的欢迎语。
pub const WELCOME_MESSAGE: &str = "Hi! I'm the CampusHub assistant. How can I help you today?";
