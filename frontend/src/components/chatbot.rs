//! 校园助手页
//!
//! 历史在挂载时加载，并跟随会话缓存代数重新加载。发送是
//! 乐观的：用户轮立即上屏，成功后用服务端返回的完整历史
//! 替换，失败则保留乐观轮不回滚。清空历史需确认，成功后用
//! 服务端返回的状态整体替换。

use campushub_shared::protocol::ChatRole;
use campushub_shared::state::{ChatLog, SessionState};
use campushub_shared::validate;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::SubmitEvent;

use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::icons::{Bot, RefreshCw, Send};
use crate::notify::use_toast;
use crate::ops::OpSlot;

#[component]
pub fn ChatbotPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let toasts = use_toast();

    let log = RwSignal::new(ChatLog::new());
    let (history_loading, set_history_loading) = signal(true);
    let (draft, set_draft) = signal(String::new());
    let send_slot = OpSlot::new();
    let clear_slot = OpSlot::new();

    let messages_end = NodeRef::<leptos::html::Div>::new();
    let input_ref = NodeRef::<leptos::html::Input>::new();

    // 历史加载：挂载时一次，登录/注册/注销作废缓存后重新加载
    {
        let api = api.clone();
        Effect::new(move |_| {
            let _epoch = auth.epoch_signal().get();
            set_history_loading.set(true);
            let api = api.clone();
            spawn_local(async move {
                match api.chat_history().await {
                    Ok(turns) => log.update(|l| {
                        l.replace(turns);
                        l.ensure_welcome();
                    }),
                    Err(e) => {
                        // 历史拿不到不算故障，兜底欢迎语即可
                        web_sys::console::log_1(
                            &format!("[Chat] history load failed: {}", e).into(),
                        );
                        log.update(|l| l.ensure_welcome());
                    }
                }
                set_history_loading.set(false);
            });
        });
    }

    // 消息变化后滚动到底部
    Effect::new(move |_| {
        log.track();
        if let Some(el) = messages_end.get() {
            el.scroll_into_view();
        }
    });

    let draft_invalid = Signal::derive(move || validate::message_error(&draft.get()).is_some());

    // 综合加载标志：任一在途请求，或会话探测未完成
    let is_busy = Signal::derive(move || {
        send_slot.is_pending()
            || clear_slot.is_pending()
            || history_loading.get()
            || auth.state_signal().get() == SessionState::Unknown
    });

    let on_submit = {
        let api = api.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            let text = draft.get_untracked();
            if validate::message_error(&text).is_some() {
                return;
            }
            if !send_slot.try_begin() {
                return;
            }

            // 乐观更新：用户轮立即可见
            log.update(|l| l.push_user(&text));
            set_draft.set(String::new());

            let api = api.clone();
            spawn_local(async move {
                match api.send_chat(text.trim()).await {
                    Ok(turns) => {
                        send_slot.settle_ok();
                        log.update(|l| l.apply_server(turns));
                        if let Some(input) = input_ref.get_untracked() {
                            let _ = input.focus();
                        }
                    }
                    Err(e) => {
                        // 已上屏的用户轮保留，不回滚
                        send_slot.settle_err();
                        toasts.error(e.user_message());
                    }
                }
            });
        }
    };

    let on_clear = {
        let api = api.clone();
        move |_| {
            let confirmed = web_sys::window()
                .map(|w| {
                    w.confirm_with_message("Are you sure you want to clear all messages?")
                        .unwrap_or(false)
                })
                .unwrap_or(false);
            if !confirmed {
                return;
            }
            if !clear_slot.try_begin() {
                return;
            }
            let api = api.clone();
            spawn_local(async move {
                match api.clear_chat_history().await {
                    Ok(turns) => {
                        clear_slot.settle_ok();
                        log.update(|l| {
                            l.replace(turns);
                            l.ensure_welcome();
                        });
                        toasts.success("Your conversation history has been cleared");
                    }
                    Err(e) => {
                        clear_slot.settle_err();
                        toasts.error(e.user_message());
                    }
                }
            });
        }
    };

    let turns = move || {
        log.with(|l| {
            l.turns()
                .iter()
                .cloned()
                .enumerate()
                .map(|(i, turn)| (i, turn.text().to_string(), turn.role))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="max-w-4xl mx-auto flex flex-col min-h-[80vh]">
            <div class="flex items-center justify-between bg-base-100 rounded-box shadow-md p-4">
                <div class="flex items-center gap-3">
                    <div class="p-2 bg-primary/10 rounded-lg text-primary">
                        <Bot attr:class="h-6 w-6" />
                    </div>
                    <div>
                        <h1 class="text-lg font-medium">"Campus Assistant"</h1>
                        <p class="text-sm text-base-content/70">
                            "Ask me anything about the university"
                        </p>
                    </div>
                </div>
                <button
                    class="btn btn-outline btn-sm gap-1"
                    on:click=on_clear
                    disabled=move || is_busy.get()
                >
                    <RefreshCw attr:class=move || {
                        if clear_slot.is_pending() { "h-4 w-4 animate-spin" } else { "h-4 w-4" }
                    } />
                    "Reset"
                </button>
            </div>

            <div class="flex-1 overflow-y-auto py-4 space-y-4">
                <Show
                    when=move || !(history_loading.get() && log.with(|l| l.is_empty()))
                    fallback=|| view! {
                        <div class="flex justify-center items-center h-64">
                            <div class="flex flex-col items-center space-y-4">
                                <span class="loading loading-dots loading-lg text-primary"></span>
                                <div class="text-sm text-base-content/70">
                                    "Loading conversation history..."
                                </div>
                            </div>
                        </div>
                    }
                >
                    <For
                        each=turns
                        key=|(i, text, _)| (*i, text.clone())
                        children=move |(_, text, role)| {
                            let is_user = role == ChatRole::User;
                            view! {
                                <div class=if is_user { "chat chat-end" } else { "chat chat-start" }>
                                    <div class=if is_user {
                                        "chat-bubble chat-bubble-primary whitespace-pre-wrap"
                                    } else {
                                        "chat-bubble whitespace-pre-wrap"
                                    }>
                                        {text}
                                    </div>
                                    <div class="chat-footer opacity-50 text-xs">
                                        {if is_user { "You" } else { "Assistant" }}
                                    </div>
                                </div>
                            }
                        }
                    />

                    // 助手回复生成中的指示气泡
                    <Show when=move || send_slot.is_pending()>
                        <div class="chat chat-start">
                            <div class="chat-bubble">
                                <span class="loading loading-dots loading-sm"></span>
                            </div>
                        </div>
                    </Show>
                    <div node_ref=messages_end></div>
                </Show>
            </div>

            <div class="bg-base-100 rounded-box shadow-md p-4">
                <form on:submit=on_submit class="relative flex items-center">
                    <input
                        node_ref=input_ref
                        type="text"
                        placeholder="Type your message here..."
                        prop:value=draft
                        on:input=move |ev| set_draft.set(event_target_value(&ev))
                        disabled=move || is_busy.get()
                        class="input input-bordered w-full pr-14 rounded-full"
                    />
                    <button
                        type="submit"
                        class="btn btn-primary btn-circle btn-sm absolute right-2"
                        disabled=move || is_busy.get() || draft_invalid.get()
                    >
                        <Send attr:class="h-4 w-4" />
                    </button>
                </form>
                <div class="text-center mt-3 text-xs text-base-content/50">
                    "Press Enter to send your message"
                </div>
            </div>
        </div>
    }
}
