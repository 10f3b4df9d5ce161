//! 面板页：问候与各版块快捷入口

use leptos::prelude::*;
use web_sys::MouseEvent;

use crate::components::icons::{Bot, CalendarDays, Utensils};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
fn QuickLink(route: AppRoute, desc: &'static str, children: Children) -> impl IntoView {
    let router = use_router();
    let on_click = move |_ev: MouseEvent| router.navigate(route);

    view! {
        <div
            class="card bg-base-100 shadow-xl hover:shadow-2xl transition-shadow cursor-pointer"
            on:click=on_click
        >
            <div class="card-body">
                <div class="flex items-center gap-3">
                    <div class="p-3 bg-primary/10 rounded-xl text-primary">{children()}</div>
                    <div>
                        <h2 class="card-title">{route.title()}</h2>
                        <p class="text-base-content/70 text-sm">{desc}</p>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <div class="max-w-5xl mx-auto space-y-8">
            <div class="hero bg-base-100 rounded-box shadow-xl">
                <div class="hero-content text-center py-10">
                    <div>
                        <h1 class="text-3xl font-bold">"Welcome back"</h1>
                        <p class="py-2 text-base-content/70">
                            "Everything about campus life in one place."
                        </p>
                    </div>
                </div>
            </div>

            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <QuickLink
                    route=AppRoute::Cafeteria
                    desc="This week's menus across campus dining halls"
                >
                    <Utensils attr:class="h-6 w-6" />
                </QuickLink>
                <QuickLink route=AppRoute::Events desc="Upcoming events and student clubs">
                    <CalendarDays attr:class="h-6 w-6" />
                </QuickLink>
                <QuickLink route=AppRoute::Chatbot desc="Ask the campus assistant anything">
                    <Bot attr:class="h-6 w-6" />
                </QuickLink>
            </div>
        </div>
    }
}
