//! 全局通知
//!
//! 同一时间只显示一条；新通知替换旧通知并取消旧的自动关闭定时器。

use crate::web::Timeout;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    id: u64,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct Toaster {
    current: RwSignal<Option<Toast>>,
    next_id: StoredValue<u64>,
    timer: StoredValue<Option<Timeout>, LocalStorage>,
    duration_ms: u32,
}

impl Toaster {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            current: RwSignal::new(None),
            next_id: StoredValue::new(0),
            timer: StoredValue::new_local(None),
            duration_ms,
        }
    }

    pub fn current(&self) -> Option<Toast> {
        self.current.get()
    }

    pub fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.current.set(Some(Toast {
            id,
            kind,
            message: message.into(),
        }));

        let current = self.current;
        let timer = Timeout::new(self.duration_ms, move || {
            current.try_update(|slot| {
                if slot.as_ref().is_some_and(|t| t.id == id) {
                    *slot = None;
                }
            });
        });
        // 替换即 drop 旧定时器，旧定时器随之取消
        self.timer.set_value(timer);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        tracing::debug!("showing error notice");
        self.show(ToastKind::Error, message);
    }

    pub fn dismiss(&self) {
        self.current.set(None);
        self.timer.set_value(None);
    }
}

pub fn use_toaster() -> Toaster {
    expect_context::<Toaster>()
}

/// 通知容器，挂在 App 根部
#[component]
pub fn ToastHost() -> impl IntoView {
    let toaster = use_toaster();

    view! {
        {move || {
            toaster
                .current()
                .map(|toast| {
                    let class = match toast.kind {
                        ToastKind::Success => "alert alert-success shadow-lg cursor-pointer",
                        ToastKind::Error => "alert alert-error shadow-lg cursor-pointer",
                    };
                    view! {
                        <div class="toast toast-top toast-end z-50">
                            <div role="status" class=class on:click=move |_| toaster.dismiss()>
                                <span>{toast.message}</span>
                            </div>
                        </div>
                    }
                })
        }}
    }
}
