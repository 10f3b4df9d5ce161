//! 认证模块
//!
//! 管理会话状态，与路由系统解耦。会话是三态的：未知 / 已认证 /
//! 未认证。进入"已认证"的唯一路径是服务端探测成功，本地任何
//! 标记都不单独可信。

use crate::api::{ApiClient, CampusApi, HttpTransport};
use crate::web::LocalStorage;
use campushub_shared::error::ApiError;
use campushub_shared::protocol::{LoginRequest, RegisterRequest, UserData};
use campushub_shared::state::{SessionCore, SessionState};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 只记住上次登录的邮箱方便填充，绝不存密码
const STORAGE_EMAIL_KEY: &str = "campushub_email";

/// 认证上下文
///
/// 包含会话核心的读写信号，通过 Context 在组件间共享。
/// 唯一写入方是本模块里的探测/登录/注册/注销结果。
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<SessionCore>,
    /// 探测单飞标记：同一时刻至多一个探测在途
    probe_inflight: RwSignal<bool>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(SessionCore::new()),
            probe_inflight: RwSignal::new(false),
        }
    }

    /// 会话状态信号（用于守卫注入）
    pub fn state_signal(&self) -> Signal<SessionState> {
        let session = self.session;
        Signal::derive(move || session.with(|c| c.state()))
    }

    /// 缓存代数信号。服务端派生缓存（如聊天历史）跟随它重新加载。
    pub fn epoch_signal(&self) -> Signal<u64> {
        let session = self.session;
        Signal::derive(move || session.with(|c| c.epoch()))
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 确保会话是新鲜的：从未探测过或结果已过期时发起一次探测。
/// 有效期内的重复挂载不会产生请求。
pub fn ensure_session_fresh(auth: AuthContext, api: CampusApi) {
    let now = js_sys::Date::now();
    let needs = auth.session.with_untracked(|c| c.needs_probe(now));
    if !needs || auth.probe_inflight.get_untracked() {
        return;
    }

    auth.probe_inflight.set(true);
    spawn_local(async move {
        let ok = api.probe_session().await;
        auth.session
            .update(|c| c.apply_probe(ok, js_sys::Date::now()));
        auth.probe_inflight.set(false);
        web_sys::console::log_1(
            &format!("[Auth] session probe resolved: authenticated={}", ok).into(),
        );
    });
}

/// 登录。成功后记住邮箱、作废会话与所有服务端派生缓存；
/// 下一次守卫挂载会重新探测并得到已认证。
pub async fn login<T: HttpTransport>(
    auth: AuthContext,
    api: &ApiClient<T>,
    req: &LoginRequest,
) -> Result<UserData, ApiError> {
    let user = api.login(req).await?;
    LocalStorage::set(STORAGE_EMAIL_KEY, &req.email);
    auth.session.update(|c| c.after_sign_in());
    Ok(user)
}

/// 注册。语义与登录一致：服务端同样会种下会话 Cookie。
pub async fn register<T: HttpTransport>(
    auth: AuthContext,
    api: &ApiClient<T>,
    req: &RegisterRequest,
) -> Result<UserData, ApiError> {
    let user = api.register(req).await?;
    LocalStorage::set(STORAGE_EMAIL_KEY, &req.email);
    auth.session.update(|c| c.after_sign_in());
    Ok(user)
}

/// 注销：尽力通知服务端；无论成败，本地会话都被清除。
pub async fn logout<T: HttpTransport>(auth: AuthContext, api: &ApiClient<T>) {
    if let Err(e) = api.logout().await {
        web_sys::console::log_1(
            &format!("[Auth] logout request failed: {} (clearing local session anyway)", e).into(),
        );
    }
    auth.session.update(|c| c.after_logout());
}

/// 上次登录用过的邮箱（表单预填）
pub fn remembered_email() -> Option<String> {
    LocalStorage::get(STORAGE_EMAIL_KEY)
}
