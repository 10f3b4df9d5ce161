//! CampusHub 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `api`: API 网关客户端（唯一的 HTTP 出口）
//! - `auth`: 会话状态管理（三态，服务端探测为准）
//! - `ops`: 变更操作的请求槽位
//! - `notify`: 全局通知
//! - `components`: UI 组件层

pub mod api;
mod auth;
mod notify;
mod ops;

mod components {
    pub mod cafeteria;
    pub mod chatbot;
    pub mod dashboard;
    pub mod events;
    pub mod guard;
    pub mod header;
    mod icons;
    pub mod login;
}

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装（History、LocalStorage、
// setTimeout），以减小 WASM 二进制体积。
pub(crate) mod web {
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use storage::LocalStorage;
    pub use timer::Timeout;
}

use leptos::prelude::*;

use crate::api::{API_BASE_URL, CampusApi, FetchTransport};
use crate::auth::AuthContext;
use crate::components::cafeteria::CafeteriaPage;
use crate::components::chatbot::ChatbotPage;
use crate::components::dashboard::DashboardPage;
use crate::components::events::EventsPage;
use crate::components::guard::RedirectIfAuthed;
use crate::components::header::PrivateShell;
use crate::components::login::LoginPage;
use crate::notify::{ToastContext, Toaster};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 受保护页面包在 `PrivateShell`（守卫 + 导航）里，
/// 登录页包对称守卫。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! {
            <RedirectIfAuthed>
                <LoginPage />
            </RedirectIfAuthed>
        }
        .into_any(),
        AppRoute::Dashboard => view! {
            <PrivateShell>
                <DashboardPage />
            </PrivateShell>
        }
        .into_any(),
        AppRoute::Chatbot => view! {
            <PrivateShell>
                <ChatbotPage />
            </PrivateShell>
        }
        .into_any(),
        AppRoute::Cafeteria => view! {
            <PrivateShell>
                <CafeteriaPage />
            </PrivateShell>
        }
        .into_any(),
        AppRoute::Events => view! {
            <PrivateShell>
                <EventsPage />
            </PrivateShell>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 全局上下文：认证、通知、API 客户端
    provide_context(AuthContext::new());
    provide_context(ToastContext::new());
    provide_context(CampusApi::new(API_BASE_URL, FetchTransport));

    view! {
        // 2. 路由器组件：守卫在各页面的外壳组件里
        <Router>
            <Toaster />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
