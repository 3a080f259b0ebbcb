//! 认证模块
//!
//! 把核心库的 [`SessionService`] 桥接到 Leptos 的响应式系统：
//! 服务的状态变化通过订阅写入信号，路由与布局只读取信号。

use crate::config::AppConfig;
use crate::web::{BrowserHttpClient, LocalTokenStore};
use leptos::prelude::*;
use leptos::task::spawn_local;
use mindtrack::{ApiClient, AuthPhase, ClientError, LogApi, PhaseKind, SessionService};
use mindtrack_shared::Session;

pub type AppSession = SessionService<BrowserHttpClient, LocalTokenStore>;
pub type AppChannel = LogApi<BrowserHttpClient>;

/// 认证上下文
///
/// 会话服务不是 `Send` 的，因此放在本地存储的 `StoredValue` 中；上下文本身是 `Copy`。
#[derive(Clone, Copy)]
pub struct AuthContext {
    phase: ReadSignal<AuthPhase>,
    set_phase: WriteSignal<AuthPhase>,
    kind: Memo<PhaseKind>,
    service: StoredValue<AppSession, LocalStorage>,
}

impl AuthContext {
    pub fn new(config: &AppConfig) -> Self {
        let api = ApiClient::new(config.api_url.clone(), BrowserHttpClient);
        let service = SessionService::new(api, LocalTokenStore);
        let (phase, set_phase) = signal(service.phase());
        let kind = Memo::new(move |_| phase.with(AuthPhase::kind));
        Self {
            phase,
            set_phase,
            kind,
            service: StoredValue::new_local(service),
        }
    }

    pub fn phase(&self) -> ReadSignal<AuthPhase> {
        self.phase
    }

    /// 仅在阶段种类变化时通知（用于守卫与路由）
    pub fn phase_kind(&self) -> Signal<PhaseKind> {
        self.kind.into()
    }

    pub fn session(&self) -> Option<Session> {
        self.phase.with(|p| p.session().cloned())
    }

    pub fn service(&self) -> Option<AppSession> {
        self.service.try_get_value()
    }

    /// 已认证请求通道
    pub fn channel(&self) -> Option<AppChannel> {
        self.service()?.channel()
    }

    /// 认证错误会让会话过期，守卫随后把用户送回登录页
    pub fn handle_error(&self, err: &ClientError) {
        if let Some(service) = self.service() {
            service.handle_error(err);
        }
    }

    /// 成员页面拿不到请求通道时调用：结束会话，守卫随后回到登录页
    pub fn expire(&self) {
        if let Some(service) = self.service() {
            service.expire();
        }
    }

    pub fn logout(&self) {
        if let Some(service) = self.service() {
            service.logout();
        }
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// 订阅会话服务并开始从持久化令牌恢复
pub fn init_auth(ctx: &AuthContext) {
    let Some(service) = ctx.service() else {
        return;
    };

    let set_phase = ctx.set_phase;
    service.subscribe(move |phase| {
        // 所属 owner 已销毁时 try_set 会静默失败
        set_phase.try_set(phase.clone());
    });

    let stored = ctx.service;
    on_cleanup(move || {
        stored.try_with_value(|s| s.dispose());
    });

    spawn_local(async move {
        service.init().await;
    });
}
