//! 客户端状态机
//!
//! 会话、请求槽位、路由守卫和聊天记录的纯状态逻辑。
//! 前端用信号包装这里的类型；所有转移规则都在这里集中定义，
//! 因此可以脱离浏览器做单元测试。

use crate::WELCOME_MESSAGE;
use crate::protocol::{ChatRole, ChatTurn};

// =========================================================
// 会话 (Session)
// =========================================================

/// 会话三态。`Unknown` 表示尚未向服务端求证，
/// UI 在离开 `Unknown` 之前不允许根据认证状态分支。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

impl SessionState {
    pub fn is_known(&self) -> bool {
        !matches!(self, SessionState::Unknown)
    }
}

/// 会话存储的核心数据
///
/// 唯一写入方是探测/登录/注册/注销的结果。`epoch` 是服务端
/// 派生缓存的代数：每次会话失效都会加一，缓存读取方据此重新加载。
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCore {
    state: SessionState,
    checked_at_ms: Option<f64>,
    epoch: u64,
}

impl SessionCore {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unknown,
            checked_at_ms: None,
            epoch: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// 是否需要（重新）探测：从未求证过，或上次结果已过期
    pub fn needs_probe(&self, now_ms: f64) -> bool {
        match self.checked_at_ms {
            None => true,
            Some(at) => {
                self.state == SessionState::Unknown || now_ms - at > crate::SESSION_STALE_MS
            }
        }
    }

    /// 写入一次探测结果。这是进入 `Authenticated` 的唯一路径。
    pub fn apply_probe(&mut self, authenticated: bool, now_ms: f64) {
        self.state = if authenticated {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        self.checked_at_ms = Some(now_ms);
    }

    /// 会话失效：回到 `Unknown` 并作废所有服务端派生缓存。
    /// 下一次守卫挂载会重新探测。
    pub fn invalidate(&mut self) {
        self.state = SessionState::Unknown;
        self.checked_at_ms = None;
        self.epoch += 1;
    }

    /// 登录/注册成功之后调用
    pub fn after_sign_in(&mut self) {
        self.invalidate();
    }

    /// 注销之后调用。无论服务端调用成败都会执行（fail-open）：
    /// 本地会话总是被清除。
    pub fn after_logout(&mut self) {
        self.invalidate();
    }
}

impl Default for SessionCore {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================
// 请求槽位 (Operation Slots)
// =========================================================

/// 每个变更操作独立的生命周期：
/// `Idle → Pending → (Succeeded | Failed) → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl OpState {
    /// 只有 `Idle` 能进入 `Pending`，同一槽位的并发提交在这里被拒绝
    pub fn try_begin(&mut self) -> bool {
        if *self == OpState::Idle {
            *self = OpState::Pending;
            true
        } else {
            false
        }
    }

    pub fn succeed(&mut self) {
        if *self == OpState::Pending {
            *self = OpState::Succeeded;
        }
    }

    pub fn fail(&mut self) {
        if *self == OpState::Pending {
            *self = OpState::Failed;
        }
    }

    /// 结算后立即回到 `Idle`，准备接受下一次提交
    pub fn reset(&mut self) {
        if matches!(self, OpState::Succeeded | OpState::Failed) {
            *self = OpState::Idle;
        }
    }

    pub fn is_pending(&self) -> bool {
        *self == OpState::Pending
    }
}

// =========================================================
// 路由守卫 (Route Guard)
// =========================================================

/// 守卫状态：`Checking` 对应会话未知，`Redirecting` 会在
/// 宽限期内保持当前视图可见（置灰）再跳转。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authorized,
    Redirecting,
}

impl GuardState {
    /// 受保护页面的守卫判定
    pub fn for_protected(session: SessionState) -> Self {
        match session {
            SessionState::Unknown => GuardState::Checking,
            SessionState::Authenticated => GuardState::Authorized,
            SessionState::Unauthenticated => GuardState::Redirecting,
        }
    }

    /// 登录页的对称判定：已认证用户应离开公开页
    pub fn for_public(session: SessionState) -> Self {
        match session {
            SessionState::Unknown => GuardState::Checking,
            SessionState::Authenticated => GuardState::Redirecting,
            SessionState::Unauthenticated => GuardState::Authorized,
        }
    }
}

// =========================================================
// 聊天记录 (Chat Log)
// =========================================================

/// 客户端视角的对话序列。
///
/// 发送是乐观的：用户轮先入列，成功后用服务端返回的完整
/// 历史替换（不会重复已有的用户轮）；失败则保留乐观轮，
/// 不做回滚。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatLog {
    turns: Vec<ChatTurn>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// 乐观追加一条用户消息（去除首尾空白）
    pub fn push_user(&mut self, text: &str) {
        self.turns.push(ChatTurn::user(text.trim()));
    }

    /// 应用服务端返回的对话轮。后端对 `/chatbot/chat` 返回的是
    /// 更新后的完整历史，所以非空时整体替换；空响应视为无事发生，
    /// 乐观轮保持可见。
    pub fn apply_server(&mut self, turns: Vec<ChatTurn>) {
        if !turns.is_empty() {
            self.turns = turns;
        }
    }

    /// 整体替换（历史加载、清空历史的结果）
    pub fn replace(&mut self, turns: Vec<ChatTurn>) {
        self.turns = turns;
    }

    /// 历史为空时补一条本地欢迎语
    pub fn ensure_welcome(&mut self) {
        if self.turns.is_empty() {
            self.turns.push(ChatTurn::model(WELCOME_MESSAGE));
        }
    }

    pub fn user_turn_count(&self) -> usize {
        self.turns.iter().filter(|t| t.role == ChatRole::User).count()
    }
}

// =========================================================
// 单元测试 (Unit Tests)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::SESSION_STALE_MS;

    const T0: f64 = 1_000.0;

    #[test]
    fn session_starts_unknown_and_needs_probe() {
        let core = SessionCore::new();
        assert_eq!(core.state(), SessionState::Unknown);
        assert!(!core.state().is_known());
        assert!(core.needs_probe(T0));
    }

    #[test]
    fn probe_is_the_only_path_to_authenticated() {
        let mut core = SessionCore::new();
        core.apply_probe(true, T0);
        assert_eq!(core.state(), SessionState::Authenticated);

        core.apply_probe(false, T0);
        assert_eq!(core.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn fresh_probe_result_is_not_reprobed() {
        let mut core = SessionCore::new();
        core.apply_probe(true, T0);
        assert!(!core.needs_probe(T0 + 1_000.0));
        assert!(core.needs_probe(T0 + SESSION_STALE_MS + 1.0));
    }

    #[test]
    fn sign_in_invalidates_session_and_bumps_cache_epoch() {
        let mut core = SessionCore::new();
        core.apply_probe(false, T0);
        let epoch = core.epoch();

        core.after_sign_in();
        assert_eq!(core.state(), SessionState::Unknown);
        assert_eq!(core.epoch(), epoch + 1);
        assert!(core.needs_probe(T0));

        // 重新探测后才回到已认证
        core.apply_probe(true, T0 + 10.0);
        assert_eq!(core.state(), SessionState::Authenticated);
    }

    #[test]
    fn logout_clears_local_session_unconditionally() {
        // fail-open：即使注销请求在网络层失败，也会走到这里
        let mut core = SessionCore::new();
        core.apply_probe(true, T0);
        core.after_logout();
        assert_eq!(core.state(), SessionState::Unknown);
    }

    #[test]
    fn slot_rejects_duplicate_submission_until_settled() {
        let mut slot = OpState::Idle;
        assert!(slot.try_begin());
        assert!(slot.is_pending());
        assert!(!slot.try_begin());

        slot.succeed();
        assert_eq!(slot, OpState::Succeeded);
        slot.reset();
        assert_eq!(slot, OpState::Idle);
        assert!(slot.try_begin());

        slot.fail();
        slot.reset();
        assert!(slot.try_begin());
    }

    #[test]
    fn settling_an_idle_slot_is_a_no_op() {
        let mut slot = OpState::Idle;
        slot.succeed();
        assert_eq!(slot, OpState::Idle);
        slot.fail();
        assert_eq!(slot, OpState::Idle);
    }

    #[test]
    fn guard_states_follow_the_session() {
        assert_eq!(
            GuardState::for_protected(SessionState::Unknown),
            GuardState::Checking
        );
        assert_eq!(
            GuardState::for_protected(SessionState::Authenticated),
            GuardState::Authorized
        );
        assert_eq!(
            GuardState::for_protected(SessionState::Unauthenticated),
            GuardState::Redirecting
        );

        // 登录页的对称规则
        assert_eq!(
            GuardState::for_public(SessionState::Authenticated),
            GuardState::Redirecting
        );
        assert_eq!(
            GuardState::for_public(SessionState::Unauthenticated),
            GuardState::Authorized
        );
    }

    #[test]
    fn guard_redirect_cancels_when_session_flips_back() {
        // 守卫在 Redirecting 期间持有一个宽限定时器；会话翻转后
        // 守卫状态离开 Redirecting，定时器随之丢弃。
        let mut session = SessionState::Unauthenticated;
        assert_eq!(GuardState::for_protected(session), GuardState::Redirecting);
        session = SessionState::Authenticated;
        assert_eq!(GuardState::for_protected(session), GuardState::Authorized);
    }

    #[test]
    fn optimistic_send_appends_exactly_one_user_turn() {
        let mut log = ChatLog::new();
        log.ensure_welcome();
        log.push_user("  when does the cafeteria open?  ");

        assert_eq!(log.user_turn_count(), 1);
        assert_eq!(log.turns().last().unwrap().text(), "when does the cafeteria open?");
    }

    #[test]
    fn server_history_replaces_without_duplicating_the_user_turn() {
        let mut log = ChatLog::new();
        log.ensure_welcome();
        log.push_user("hello");

        // 服务端返回的完整历史包含刚才的用户轮和新的助手轮
        log.apply_server(vec![
            ChatTurn::model(WELCOME_MESSAGE),
            ChatTurn::user("hello"),
            ChatTurn::model("Hi there!"),
        ]);

        assert_eq!(log.user_turn_count(), 1);
        assert_eq!(log.turns().len(), 3);
        assert_eq!(log.turns().last().unwrap().role, ChatRole::Model);
    }

    #[test]
    fn failed_send_keeps_the_optimistic_turn_visible() {
        let mut log = ChatLog::new();
        log.push_user("hello");
        // 失败路径不带服务端数据，日志保持原样
        log.apply_server(Vec::new());
        assert_eq!(log.user_turn_count(), 1);
    }

    #[test]
    fn clearing_history_replaces_the_whole_sequence() {
        let mut log = ChatLog::new();
        log.push_user("a");
        log.push_user("b");

        log.replace(vec![ChatTurn::model("History cleared. How can I help?")]);
        assert_eq!(log.turns().len(), 1);
        assert_eq!(log.user_turn_count(), 0);
    }

    #[test]
    fn empty_history_falls_back_to_the_welcome_message() {
        let mut log = ChatLog::new();
        log.replace(Vec::new());
        log.ensure_welcome();
        assert_eq!(log.turns().len(), 1);
        assert_eq!(log.turns()[0].text(), WELCOME_MESSAGE);

        // 已有内容时不会重复插入
        log.ensure_welcome();
        assert_eq!(log.turns().len(), 1);
    }
}
