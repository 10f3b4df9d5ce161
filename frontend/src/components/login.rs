//! 登录/注册页
//!
//! 一张卡片在登录和注册两种模式间切换。字段校验随输入即时
//! 求值，校验不过时提交按钮不可用，也不会发出请求；请求在途
//! 时重复提交被槽位拒绝。

use campushub_shared::protocol::{LoginRequest, RegisterRequest};
use campushub_shared::validate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::SubmitEvent;

use crate::api::use_api;
use crate::auth::{self, use_auth};
use crate::components::icons::GraduationCap;
use crate::notify::use_toast;
use crate::ops::OpSlot;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();
    let toasts = use_toast();

    // 表单字段。邮箱用上次登录的值预填（只记邮箱，不记密码）。
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(auth::remembered_email().unwrap_or_default());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (is_register, set_is_register) = signal(false);
    let (submitted, set_submitted) = signal(false);

    let login_slot = OpSlot::new();
    let register_slot = OpSlot::new();

    let login_errors =
        Signal::derive(move || validate::validate_login(&email.get(), &password.get()));
    let register_errors = Signal::derive(move || {
        validate::validate_register(&name.get(), &email.get(), &password.get(), &confirm.get())
    });

    let form_valid = Signal::derive(move || {
        if is_register.get() {
            register_errors.get().is_valid()
        } else {
            login_errors.get().is_valid()
        }
    });

    let is_submitting =
        Signal::derive(move || login_slot.is_pending() || register_slot.is_pending());

    // 错误展示门槛：提交过一次，或该字段已经有输入
    let name_error = Signal::derive(move || {
        if !is_register.get() || !(submitted.get() || !name.get().is_empty()) {
            return None;
        }
        register_errors.get().name
    });
    let email_error = Signal::derive(move || {
        if !(submitted.get() || !email.get().is_empty()) {
            return None;
        }
        login_errors.get().email
    });
    let password_error = Signal::derive(move || {
        if !(submitted.get() || !password.get().is_empty()) {
            return None;
        }
        login_errors.get().password
    });
    let confirm_error = Signal::derive(move || {
        if !is_register.get() || !(submitted.get() || !confirm.get().is_empty()) {
            return None;
        }
        register_errors.get().confirm
    });

    let field_class = |error: Signal<Option<&'static str>>| {
        move || {
            if error.get().is_some() {
                "input input-bordered w-full input-error"
            } else {
                "input input-bordered w-full"
            }
        }
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        set_submitted.set(true);

        if is_register.get_untracked() {
            // 校验不过：不发请求，错误停留在对应字段上
            if !register_errors.get_untracked().is_valid() {
                return;
            }
            // 槽位被占：同一操作已有请求在途，忽略这次提交
            if !register_slot.try_begin() {
                return;
            }
            let req = RegisterRequest {
                name: name.get_untracked().trim().to_string(),
                email: email.get_untracked().trim().to_string(),
                password: password.get_untracked(),
            };
            let api = api.clone();
            spawn_local(async move {
                match auth::register(auth, &api, &req).await {
                    Ok(_) => {
                        register_slot.settle_ok();
                        toasts.success("Registration successful!");
                        router.navigate(AppRoute::auth_success_redirect());
                    }
                    Err(e) => {
                        // 表单保持原样可编辑，不导航
                        register_slot.settle_err();
                        toasts.error(e.user_message());
                    }
                }
            });
        } else {
            if !login_errors.get_untracked().is_valid() {
                return;
            }
            if !login_slot.try_begin() {
                return;
            }
            let req = LoginRequest {
                email: email.get_untracked().trim().to_string(),
                password: password.get_untracked(),
            };
            let api = api.clone();
            spawn_local(async move {
                match auth::login(auth, &api, &req).await {
                    Ok(_) => {
                        login_slot.settle_ok();
                        toasts.success("Login successful!");
                        router.navigate(AppRoute::auth_success_redirect());
                    }
                    Err(e) => {
                        login_slot.settle_err();
                        toasts.error(e.user_message());
                    }
                }
            });
        }
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <GraduationCap attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"CampusHub"</h1>
                        <p class="text-base-content/70">
                            {move || if is_register.get() {
                                "Create your campus account"
                            } else {
                                "Sign in to your campus account"
                            }}
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || is_register.get()>
                            <div class="form-control">
                                <label class="label" for="name">
                                    <span class="label-text">"Name"</span>
                                </label>
                                <input
                                    id="name"
                                    type="text"
                                    placeholder="Alice Zhang"
                                    on:input=move |ev| set_name.set(event_target_value(&ev))
                                    prop:value=name
                                    class=field_class(name_error)
                                />
                                <Show when=move || name_error.get().is_some()>
                                    <label class="label">
                                        <span class="label-text-alt text-error">
                                            {move || name_error.get().unwrap_or_default()}
                                        </span>
                                    </label>
                                </Show>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@campus.edu"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class=field_class(email_error)
                            />
                            <Show when=move || email_error.get().is_some()>
                                <label class="label">
                                    <span class="label-text-alt text-error">
                                        {move || email_error.get().unwrap_or_default()}
                                    </span>
                                </label>
                            </Show>
                        </div>

                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class=field_class(password_error)
                            />
                            <Show when=move || password_error.get().is_some()>
                                <label class="label">
                                    <span class="label-text-alt text-error">
                                        {move || password_error.get().unwrap_or_default()}
                                    </span>
                                </label>
                            </Show>
                        </div>

                        <Show when=move || is_register.get()>
                            <div class="form-control">
                                <label class="label" for="confirm">
                                    <span class="label-text">"Confirm password"</span>
                                </label>
                                <input
                                    id="confirm"
                                    type="password"
                                    placeholder="••••••••"
                                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                    prop:value=confirm
                                    class=field_class(confirm_error)
                                />
                                <Show when=move || confirm_error.get().is_some()>
                                    <label class="label">
                                        <span class="label-text-alt text-error">
                                            {move || confirm_error.get().unwrap_or_default()}
                                        </span>
                                    </label>
                                </Show>
                            </div>
                        </Show>

                        <div class="form-control mt-6">
                            <button
                                class="btn btn-primary"
                                disabled=move || is_submitting.get() || !form_valid.get()
                            >
                                {move || if is_submitting.get() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        {if is_register.get() { "Creating account..." } else { "Signing in..." }}
                                    }
                                    .into_any()
                                } else if is_register.get() {
                                    "Create account".into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>

                        <p
                            class="text-sm text-center text-base-content/70 mt-2 cursor-pointer hover:underline"
                            on:click=move |_| {
                                set_is_register.set(!is_register.get_untracked());
                                set_submitted.set(false);
                            }
                        >
                            {move || if is_register.get() {
                                "Already have an account? Sign in"
                            } else {
                                "New here? Create an account"
                            }}
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
