//! Mind Track 前端应用
//!
//! 采用 Context-Driven 架构：
//! - `web::route`: 路由定义与守卫归类
//! - `web::router`: 路由服务，按会话阶段执行跳转
//! - `auth`: 会话状态桥接到信号
//! - `components`: UI 组件层

pub mod config;
pub mod logging;

mod auth;
mod components {
    pub mod dashboard;
    pub mod google_login;
    pub mod icons;
    pub mod layout;
    pub mod log_form;
    pub mod login;
    pub mod rating;
    pub mod register;
    pub mod toast;
    pub mod trends;
}

use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::layout::{GuestLayout, MemberLayout};
use crate::components::log_form::{LogFormMode, LogFormPage};
use crate::components::login::LoginPage;
use crate::components::register::RegisterPage;
use crate::components::toast::{ToastHost, Toaster};
use crate::config::AppConfig;

use leptos::prelude::*;

// 原生 Web API 封装，替代 gloo-* 系列 crate
pub(crate) mod web {
    pub mod google;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::BrowserHttpClient;
    pub use storage::LocalTokenStore;
    pub use timer::Timeout;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <GuestLayout><LoginPage /></GuestLayout> }.into_any(),
        AppRoute::Register => view! { <GuestLayout><RegisterPage /></GuestLayout> }.into_any(),
        AppRoute::Dashboard => view! { <MemberLayout><DashboardPage /></MemberLayout> }.into_any(),
        AppRoute::LogEntry => view! {
            <MemberLayout>
                <LogFormPage mode=LogFormMode::Today />
            </MemberLayout>
        }
        .into_any(),
        AppRoute::LogEdit(id) => view! {
            <MemberLayout>
                <LogFormPage mode=LogFormMode::Record(id.clone()) />
            </MemberLayout>
        }
        .into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center space-y-4">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl">"Page not found"</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary">
                        "Back to dashboard"
                    </Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    // 1. 配置与全局提示
    provide_context(Toaster::new(config.toast_duration_ms));
    let auth_ctx = AuthContext::new(&config);
    provide_context(config);

    // 2. 会话上下文，订阅后从持久化令牌恢复
    provide_context(auth_ctx);
    init_auth(&auth_ctx);

    view! {
        // 3. 路由器按会话阶段执行守卫
        <Router phase=auth_ctx.phase_kind()>
            <RouterOutlet matcher=route_matcher />
        </Router>
        <ToastHost />
    }
}
