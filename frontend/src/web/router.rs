//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，验证由核心库的守卫状态机完成。

use leptos::prelude::*;
use mindtrack::{NavCommand, PhaseKind};
use wasm_bindgen::prelude::*;

use super::route::AppRoute;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态；`push` 为 false 时替换当前条目（用于重定向）
fn write_history(path: &str, push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = if push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
}

/// 守卫检查：在给定阶段下进入 `target` 实际应到达的路由
fn resolve(target: AppRoute, phase: PhaseKind) -> AppRoute {
    match target.guard().on_enter(phase) {
        Some(NavCommand::Redirect(to)) => {
            let redirect = AppRoute::for_redirect(to);
            tracing::info!(from = %target, to = %redirect, "route guarded, redirecting");
            redirect
        }
        None => target,
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话阶段信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 会话阶段（注入的信号）
    phase: Signal<PhaseKind>,
}

impl RouterService {
    fn new(phase: Signal<PhaseKind>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            phase,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, target: AppRoute) {
        let route = resolve(target, self.phase.get_untracked());
        write_history(&route.to_path(), true);
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let phase = self.phase;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let route = resolve(target.clone(), phase.get_untracked());
            if route != target {
                write_history(&route.to_path(), false);
            }
            set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话阶段迁移时的自动重定向
    ///
    /// Effect 的上一次返回值就是上一个阶段，稳定阶段下的重复运行不会产生命令。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let phase = self.phase;

        Effect::new(move |prev: Option<PhaseKind>| {
            let next = phase.get();
            let route = current_route.get_untracked();

            if let Some(NavCommand::Redirect(target)) = route.guard().on_transition(prev, next) {
                let redirect = AppRoute::for_redirect(target);
                tracing::info!(from = %route, to = %redirect, phase = ?next, "session changed, redirecting");
                write_history(&redirect.to_path(), false);
                set_route.set(redirect);
            }
            next
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(phase: Signal<PhaseKind>) -> RouterService {
    let router = RouterService::new(phase);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    expect_context::<RouterService>()
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话阶段信号
    phase: Signal<PhaseKind>,
    children: Children,
) -> impl IntoView {
    provide_router(phase);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击并通过路由服务导航
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
