//! 受守卫保护的布局
//!
//! 渲染决定来自 [`GuardKind::view`]；导航由路由服务在阶段迁移时完成，布局本身从不跳转。

use crate::auth::use_auth;
use crate::components::icons::{Brain, LogOut};
use leptos::prelude::*;
use mindtrack::{GuardKind, GuardView};

#[component]
fn LoadingPlaceholder() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

#[component]
fn Guarded(kind: GuardKind, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let phase = auth.phase_kind();

    move || match kind.view(phase.get()) {
        GuardView::Placeholder => view! { <LoadingPlaceholder /> }.into_any(),
        GuardView::Children => children().into_any(),
        GuardView::Nothing => ().into_any(),
    }
}

/// 登录、注册页的外壳
#[component]
pub fn GuestLayout(children: ChildrenFn) -> impl IntoView {
    view! {
        <Guarded kind=GuardKind::GuestOnly>{children()}</Guarded>
    }
}

/// 已认证区域外壳：顶栏 + 内容
#[component]
pub fn MemberLayout(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let display_name = move || {
        auth.session()
            .map(|s| s.display_name)
            .unwrap_or_default()
    };

    view! {
        <Guarded kind=GuardKind::MemberOnly>
            <div class="min-h-screen bg-base-200 font-sans">
                <div class="navbar bg-base-100 shadow">
                    <div class="flex-1 gap-2 px-2">
                        <Brain attr:class="text-primary h-6 w-6" />
                        <span class="text-xl font-bold">"Mind Track"</span>
                    </div>
                    <div class="flex-none gap-4 px-2">
                        <span class="text-base-content/70 hidden sm:inline">
                            "Welcome, " {display_name} "!"
                        </span>
                        <button on:click=move |_| auth.logout() class="btn btn-outline btn-error btn-sm gap-2">
                            <LogOut attr:class="h-4 w-4" /> "Logout"
                        </button>
                    </div>
                </div>
                <main class="max-w-7xl mx-auto p-4 md:p-8">
                    {children()}
                </main>
            </div>
        </Guarded>
    }
}
