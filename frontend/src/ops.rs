//! 请求槽位
//!
//! 每个变更操作（登录、注册、发消息、清历史）各占一个槽位，
//! 转移规则在 `campushub_shared::state::OpState` 里集中定义，
//! 这里只是把它包进信号供组件使用。

use campushub_shared::state::OpState;
use leptos::prelude::*;

/// 单个操作槽位的信号包装。实现 Copy，方便作为 Props 传递。
#[derive(Clone, Copy)]
pub struct OpSlot {
    state: RwSignal<OpState>,
}

impl OpSlot {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(OpState::Idle),
        }
    }

    /// 是否有请求在途（响应式读取，驱动按钮禁用等）
    pub fn is_pending(&self) -> bool {
        self.state.with(|s| s.is_pending())
    }

    /// 尝试占用槽位。返回 false 表示已有同类请求在途，
    /// 调用方必须放弃这次提交。
    pub fn try_begin(&self) -> bool {
        let mut began = false;
        self.state.update(|s| began = s.try_begin());
        began
    }

    /// 成功结算，立即回到空闲
    pub fn settle_ok(&self) {
        self.state.update(|s| {
            s.succeed();
            s.reset();
        });
    }

    /// 失败结算，立即回到空闲
    pub fn settle_err(&self) {
        self.state.update(|s| {
            s.fail();
            s.reset();
        });
    }
}

impl Default for OpSlot {
    fn default() -> Self {
        Self::new()
    }
}
