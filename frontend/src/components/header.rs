//! 受保护页面的导航与外壳

use leptos::children::ChildrenFn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::MouseEvent;

use crate::api::use_api;
use crate::auth::{self, use_auth};
use crate::components::guard::RequireAuth;
use crate::components::icons::{GraduationCap, LogOut};
use crate::notify::use_toast;
use crate::ops::OpSlot;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 导航链接：拦截点击走客户端路由，并高亮当前页
#[component]
fn NavLink(route: AppRoute) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: MouseEvent| {
        ev.prevent_default();
        router.navigate(route);
    };

    view! {
        <a
            href=route.to_path()
            on:click=on_click
            class=move || {
                if router.current_route().get() == route {
                    "btn btn-ghost btn-sm btn-active"
                } else {
                    "btn btn-ghost btn-sm"
                }
            }
        >
            {route.title()}
        </a>
    }
}

#[component]
pub fn AppHeader() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();
    let toasts = use_toast();
    let logout_slot = OpSlot::new();

    let on_logout = move |_ev: MouseEvent| {
        if !logout_slot.try_begin() {
            return;
        }
        let api = api.clone();
        spawn_local(async move {
            // 本地会话无条件清除，网络失败不拦截注销
            auth::logout(auth, &api).await;
            logout_slot.settle_ok();
            toasts.success("Logged out successfully");
            router.navigate(AppRoute::Login);
        });
    };

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1 gap-2">
                <GraduationCap attr:class="h-6 w-6 text-primary" />
                <span class="text-xl font-bold">"CampusHub"</span>
                <div class="hidden md:flex gap-1 ml-4">
                    <NavLink route=AppRoute::Dashboard />
                    <NavLink route=AppRoute::Cafeteria />
                    <NavLink route=AppRoute::Events />
                    <NavLink route=AppRoute::Chatbot />
                </div>
            </div>
            <div class="flex-none">
                <button
                    on:click=on_logout
                    disabled=move || logout_slot.is_pending()
                    class="btn btn-outline btn-error btn-sm gap-2"
                >
                    <LogOut attr:class="h-4 w-4" /> "Sign out"
                </button>
            </div>
        </div>
    }
}

/// 受保护页面的外壳：守卫 + 导航 + 内容区
#[component]
pub fn PrivateShell(children: ChildrenFn) -> impl IntoView {
    view! {
        <RequireAuth>
            <div class="min-h-screen bg-base-200">
                <AppHeader />
                <main class="p-4 md:p-8">{children()}</main>
            </div>
        </RequireAuth>
    }
}
