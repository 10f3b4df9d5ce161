//! 路由守卫组件
//!
//! 状态机：Checking → { Authorized, Redirecting }。
//!
//! 会话未知时显示加载态并触发探测；判定为需要重定向时，当前
//! 视图置灰保留一个宽限期再跳转。宽限期内会话翻转回来，或者
//! 组件卸载（Effect 随组件销毁，定时器被 drop），定时器都会
//! 取消，不会在触发条件已消失后仍然跳转。

use std::cell::RefCell;
use std::rc::Rc;

use campushub_shared::REDIRECT_GRACE_MS;
use campushub_shared::state::GuardState;
use leptos::children::ChildrenFn;
use leptos::prelude::*;

use crate::api::use_api;
use crate::auth::{ensure_session_fresh, use_auth};
use crate::web::Timeout;
use crate::web::route::AppRoute;
use crate::web::router::{RouterService, use_router};

fn checking_view() -> AnyView {
    view! {
        <div class="flex items-center justify-center min-h-screen">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
    .into_any()
}

/// 宽限期定时器的装配：进入 Redirecting 启动，离开即取消
fn arm_grace_timer(
    guard: Signal<GuardState>,
    router: RouterService,
    target: AppRoute,
    log_line: &'static str,
) {
    let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

    Effect::new(move |_| match guard.get() {
        GuardState::Redirecting => {
            if pending.borrow().is_some() {
                return;
            }
            let timer = Timeout::new(REDIRECT_GRACE_MS, move || {
                web_sys::console::log_1(&log_line.into());
                router.replace(target);
            });
            *pending.borrow_mut() = timer;
        }
        _ => {
            pending.borrow_mut().take();
        }
    });
}

/// 受保护视图的守卫
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    // 挂载以及会话被作废时保证会话新鲜（有效期与单飞控制在内部）
    Effect::new(move |_| {
        let _ = auth.state_signal().get();
        ensure_session_fresh(auth, api.clone());
    });

    let guard = Signal::derive(move || GuardState::for_protected(auth.state_signal().get()));

    arm_grace_timer(
        guard,
        router,
        AppRoute::auth_failure_redirect(),
        "[Guard] session unauthenticated, redirecting to login",
    );

    view! {
        {move || match guard.get() {
            GuardState::Checking => checking_view(),
            GuardState::Authorized => children().into_any(),
            GuardState::Redirecting => view! {
                <div class="opacity-50 pointer-events-none transition-opacity">
                    {children()}
                </div>
            }
            .into_any(),
        }}
    }
}

/// 登录页的对称守卫：已认证用户在宽限期后被带回面板
#[component]
pub fn RedirectIfAuthed(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    Effect::new(move |_| {
        let _ = auth.state_signal().get();
        ensure_session_fresh(auth, api.clone());
    });

    let guard = Signal::derive(move || GuardState::for_public(auth.state_signal().get()));

    arm_grace_timer(
        guard,
        router,
        AppRoute::auth_success_redirect(),
        "[Guard] already authenticated, redirecting to dashboard",
    );

    view! {
        {move || match guard.get() {
            GuardState::Checking => checking_view(),
            GuardState::Authorized => children().into_any(),
            GuardState::Redirecting => view! {
                <div class="opacity-50 pointer-events-none transition-opacity">
                    {children()}
                </div>
            }
            .into_any(),
        }}
    }
}
