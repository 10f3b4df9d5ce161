//! API 网关客户端
//!
//! 唯一的 HTTP 出口：统一携带会话 Cookie、统一超时、统一把
//! 非 2xx 归一化为 `ApiError`。此模块是纯传输边界，不碰 UI
//! 和导航状态。
//!
//! 分层与测试策略：抽象出 `HttpTransport`，生产环境走 fetch，
//! 测试环境用记录请求的 Mock 替换。

use std::cell::Cell;
use std::rc::Rc;

use async_trait::async_trait;
use campushub_shared::error::ApiError;
use campushub_shared::protocol::{
    ApiResponse, ChatRequest, ChatTurn, LoginRequest, RegisterRequest, UserData,
};
use campushub_shared::{
    ENDPOINT_CHAT, ENDPOINT_CHAT_HISTORY, ENDPOINT_LOGIN, ENDPOINT_LOGOUT, ENDPOINT_PROFILE,
    ENDPOINT_REGISTER, REQUEST_TIMEOUT_MS,
};
use leptos::prelude::*;
use serde::de::DeserializeOwned;

/// 后端基址。构建时可用 CAMPUSHUB_API_URL 覆盖。
pub const API_BASE_URL: &str = match option_env!("CAMPUSHUB_API_URL") {
    Some(url) => url,
    None => "http://localhost:3000/dev",
};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 方法枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
}

/// 通用 HTTP 响应结构（任意状态码，归一化在上层做）
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// 传输层失败。超时由客户端主动中止产生，必须与普通网络
/// 失败区分开。
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    Timeout,
    Network(String),
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Timeout => ApiError::Timeout,
            TransportError::Network(msg) => ApiError::Network(msg),
        }
    }
}

/// HTTP 传输特性。(?Send) 是因为浏览器环境下 fetch 的
/// future 不是 Send 的。
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =========================================================
// 实现层: fetch 客户端 (Production)
// =========================================================

/// 基于 gloo-net fetch 的生产实现
///
/// - 所有请求自动附带凭据（会话 Cookie）
/// - 通过 AbortController 实现超时中止
#[derive(Clone, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        use gloo_net::http::{Method, RequestBuilder};

        let method = match req.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };

        // 超时定时器触发时先打标记再中止，这样中止错误能被
        // 正确归类为 Timeout 而不是普通网络失败。
        let controller = web_sys::AbortController::new().ok();
        let signal = controller.as_ref().map(|c| c.signal());
        let timed_out = Rc::new(Cell::new(false));
        let timeout_guard = controller.clone().map(|c| {
            let flag = timed_out.clone();
            gloo_timers::callback::Timeout::new(REQUEST_TIMEOUT_MS, move || {
                flag.set(true);
                c.abort();
            })
        });

        let builder = RequestBuilder::new(&req.url)
            .method(method)
            .credentials(web_sys::RequestCredentials::Include)
            .abort_signal(signal.as_ref());

        let request = match req.body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::Network(e.to_string()))?;

        let result = request.send().await;
        // 请求已结束，撤掉超时定时器
        drop(timeout_guard);

        let response = result.map_err(|e| {
            if timed_out.get() {
                TransportError::Timeout
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 实现层: Mock 客户端 (Test)
// =========================================================

/// 测试用传输层：按 URL 配置响应，并记录每一次发出的请求。
/// 内部用 Rc 共享，clone 进客户端后仍可在测试里断言。
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockTransport {
    pub requests: Rc<std::cell::RefCell<Vec<HttpRequest>>>,
    responses: Rc<std::cell::RefCell<std::collections::HashMap<String, MockReply>>>,
}

#[cfg(test)]
#[derive(Clone)]
pub enum MockReply {
    Status(u16, String),
    Network,
    Timeout,
}

#[cfg(test)]
impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mock_response(&self, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), MockReply::Status(status, body.to_string()));
    }

    pub fn mock_raw(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .insert(url.to_string(), MockReply::Status(status, body.to_string()));
    }

    pub fn mock_failure(&self, url: &str, reply: MockReply) {
        self.responses.borrow_mut().insert(url.to_string(), reply);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[cfg(test)]
#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self.responses.borrow().get(&req.url).cloned();
        self.requests.borrow_mut().push(req);
        match reply {
            Some(MockReply::Status(status, body)) => Ok(HttpResponse { status, body }),
            Some(MockReply::Network) => Err(TransportError::Network("connection refused".into())),
            Some(MockReply::Timeout) => Err(TransportError::Timeout),
            None => Err(TransportError::Network("no mock response".into())),
        }
    }
}

// =========================================================
// 端点客户端 (Endpoint Client)
// =========================================================

/// 按端点提供类型化方法的客户端
#[derive(Clone)]
pub struct ApiClient<T: HttpTransport> {
    base_url: String,
    transport: T,
}

pub type CampusApi = ApiClient<FetchTransport>;

/// 从 Context 获取全局 API 客户端
pub fn use_api() -> CampusApi {
    use_context::<CampusApi>().expect("CampusApi should be provided")
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送请求并做状态归一化：非 2xx 一律转成 `ApiError::Http`，
    /// 消息优先取响应体里的 `{ message }`。
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let res = self
            .transport
            .send(HttpRequest {
                method,
                url: self.url(path),
                body,
            })
            .await?;

        if (200..300).contains(&res.status) {
            Ok(res)
        } else {
            Err(ApiError::from_response(res.status, &res.body))
        }
    }

    /// call + 按约定形状解析响应体
    async fn request<R: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<R, ApiError> {
        let res = self.call(method, path, body).await?;
        serde_json::from_str(&res.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn encode<B: serde::Serialize>(body: &B) -> Result<String, ApiError> {
        serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    // --- 认证 ---

    /// 登录。成功意味着服务端已种下会话 Cookie。
    pub async fn login(&self, req: &LoginRequest) -> Result<UserData, ApiError> {
        let env: ApiResponse<UserData> = self
            .request(HttpMethod::Post, ENDPOINT_LOGIN, Some(Self::encode(req)?))
            .await?;
        Ok(env.data)
    }

    /// 注册。服务端校验失败（如邮箱重复）的消息原样透出。
    pub async fn register(&self, req: &RegisterRequest) -> Result<UserData, ApiError> {
        let env: ApiResponse<UserData> = self
            .request(HttpMethod::Post, ENDPOINT_REGISTER, Some(Self::encode(req)?))
            .await?;
        Ok(env.data)
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.call(HttpMethod::Post, ENDPOINT_LOGOUT, None)
            .await
            .map(|_| ())
    }

    /// 会话探测："我登录了吗" 的唯一事实来源。
    /// 任何失败（401/403/断网）都只是 `false`，永远不抛错。
    pub async fn probe_session(&self) -> bool {
        self.call(HttpMethod::Get, ENDPOINT_PROFILE, None)
            .await
            .is_ok()
    }

    // --- 聊天 ---

    /// 发送消息，返回更新后的完整对话历史
    pub async fn send_chat(&self, prompt: &str) -> Result<Vec<ChatTurn>, ApiError> {
        let req = ChatRequest {
            prompt: prompt.to_string(),
        };
        let env: ApiResponse<Vec<ChatTurn>> = self
            .request(HttpMethod::Post, ENDPOINT_CHAT, Some(Self::encode(&req)?))
            .await?;
        Ok(env.data)
    }

    pub async fn chat_history(&self) -> Result<Vec<ChatTurn>, ApiError> {
        let env: ApiResponse<Vec<ChatTurn>> = self
            .request(HttpMethod::Get, ENDPOINT_CHAT_HISTORY, None)
            .await?;
        Ok(env.data)
    }

    /// 清空历史，返回清空后的状态（通常只剩一条欢迎语）
    pub async fn clear_chat_history(&self) -> Result<Vec<ChatTurn>, ApiError> {
        let env: ApiResponse<Vec<ChatTurn>> = self
            .request(HttpMethod::Delete, ENDPOINT_CHAT_HISTORY, None)
            .await?;
        Ok(env.data)
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use campushub_shared::state::{OpState, SessionCore, SessionState};
    use serde_json::json;

    const BASE: &str = "https://api.campus.test";

    fn client() -> (MockTransport, ApiClient<MockTransport>) {
        let mock = MockTransport::new();
        let api = ApiClient::new(BASE, mock.clone());
        (mock, api)
    }

    fn user_json() -> serde_json::Value {
        json!({
            "id": "u1",
            "name": "Alice",
            "email": "alice@campus.edu",
            "role": "student",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn login_posts_credentials_and_parses_the_user() {
        let (mock, api) = client();
        mock.mock_response(
            &format!("{BASE}/users/login"),
            200,
            json!({ "data": user_json() }),
        );

        let user = api
            .login(&LoginRequest {
                email: "alice@campus.edu".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();

        assert_eq!(user.name, "Alice");

        let requests = mock.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, format!("{BASE}/users/login"));
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "alice@campus.edu");
    }

    #[tokio::test]
    async fn server_rejection_surfaces_its_message_verbatim() {
        let (mock, api) = client();
        mock.mock_response(
            &format!("{BASE}/users/register"),
            409,
            json!({ "message": "Email already registered" }),
        );

        let err = api
            .register(&RegisterRequest {
                name: "Alice".into(),
                email: "alice@campus.edu".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(409));
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[tokio::test]
    async fn non_json_error_body_gets_the_generic_message() {
        let (mock, api) = client();
        mock.mock_raw(&format!("{BASE}/users/login"), 500, "<html>boom</html>");

        let err = api
            .login(&LoginRequest {
                email: "alice@campus.edu".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Something went wrong");
    }

    #[tokio::test]
    async fn timeout_is_distinct_from_server_and_network_failures() {
        let (mock, api) = client();
        mock.mock_failure(&format!("{BASE}/chatbot/chat"), MockReply::Timeout);

        let err = api.send_chat("hi").await.unwrap_err();
        assert_eq!(err, ApiError::Timeout);
    }

    #[tokio::test]
    async fn probe_never_fails_to_the_caller() {
        let (mock, api) = client();
        let url = format!("{BASE}/users/profile");

        mock.mock_response(&url, 200, json!({ "data": user_json() }));
        assert!(api.probe_session().await);

        mock.mock_response(&url, 401, json!({ "message": "Unauthorized" }));
        assert!(!api.probe_session().await);

        mock.mock_failure(&url, MockReply::Network);
        assert!(!api.probe_session().await);

        mock.mock_failure(&url, MockReply::Timeout);
        assert!(!api.probe_session().await);
    }

    #[tokio::test]
    async fn logout_is_fail_open_for_the_local_session() {
        let (mock, api) = client();
        mock.mock_failure(&format!("{BASE}/users/logout"), MockReply::Network);

        let mut session = SessionCore::new();
        session.apply_probe(true, 1_000.0);

        // 服务端调用失败，本地会话仍然被清除
        let result = api.logout().await;
        assert!(result.is_err());
        session.after_logout();
        assert_eq!(session.state(), SessionState::Unknown);
    }

    #[tokio::test]
    async fn invalid_credentials_never_reach_the_network() {
        let (mock, api) = client();

        // 提交流程先走校验，校验不过就不会调用客户端
        let errors = campushub_shared::validate::validate_login("not-an-email", "123");
        assert!(!errors.is_valid());
        if errors.is_valid() {
            let _ = api
                .login(&LoginRequest {
                    email: "not-an-email".into(),
                    password: "123".into(),
                })
                .await;
        }

        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn pending_slot_prevents_a_second_request() {
        let (mock, api) = client();
        mock.mock_response(
            &format!("{BASE}/chatbot/chat"),
            200,
            json!({ "data": [{ "role": "model", "parts": [{ "text": "hi" }] }] }),
        );

        // 第一次提交占住槽位之后，第二次提交连请求都不该发出
        let mut slot = OpState::Idle;
        for _ in 0..2 {
            if slot.try_begin() {
                api.send_chat("hello").await.unwrap();
            }
        }

        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn chat_endpoints_parse_the_history_envelope() {
        let (mock, api) = client();
        mock.mock_response(
            &format!("{BASE}/chatbot/history"),
            200,
            json!({ "data": [
                { "role": "model", "parts": [{ "text": "Welcome" }] },
                { "role": "user", "parts": [{ "text": "hi" }] }
            ] }),
        );

        let history = api.chat_history().await.unwrap();
        assert_eq!(history.len(), 2);

        mock.mock_response(
            &format!("{BASE}/chatbot/history"),
            200,
            json!({ "data": [{ "role": "model", "parts": [{ "text": "History cleared" }] }] }),
        );
        let cleared = api.clear_chat_history().await.unwrap();
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].text(), "History cleared");
    }
}
