//! 通知模块
//!
//! 全局 toast。请求结算是错误变成用户可见通知的唯一入口，
//! 这里只负责展示和自动消失。

use campushub_shared::TOAST_DISMISS_MS;
use leptos::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// 通知上下文。同一时刻只展示最新一条。
#[derive(Clone, Copy)]
pub struct ToastContext {
    current: RwSignal<Option<(String, ToastKind)>>,
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.current.set(Some((message.into(), ToastKind::Success)));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.current.set(Some((message.into(), ToastKind::Error)));
    }
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取通知上下文
pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

/// 通知展示组件，挂在应用根部
#[component]
pub fn Toaster() -> impl IntoView {
    let toasts = use_toast();
    let current = toasts.current;

    // 展示后自动清除
    Effect::new(move |_| {
        if current.get().is_some() {
            set_timeout(
                move || current.set(None),
                Duration::from_millis(TOAST_DISMISS_MS),
            );
        }
    });

    view! {
        <Show when=move || current.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let kind = current.get().map(|(_, kind)| kind);
                    if kind == Some(ToastKind::Error) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || current.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}
