//! 会话服务
//!
//! 可注入的会话状态机 `Loading -> Guest | Member`，带显式生命周期 (`init` / `dispose`)
//! 与观察者接口。UI 层通过订阅状态变化驱动渲染与导航，而不是读取全局状态。

use crate::api::{ApiClient, LogApi};
use crate::error::{ClientError, ClientResult};
use crate::request::HttpClient;
use crate::storage::TokenStore;
use mindtrack_shared::protocol::{GoogleLoginRequest, LoginRequest, MeRequest, RegisterRequest};
use mindtrack_shared::{AuthGrant, GoogleUser, Session};
use std::cell::{Cell, RefCell};
use std::rc::Rc;


const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const EXTERNAL_LOGIN_FAILED: &str = "Failed to login with Google";

// =========================================================
// 状态机
// =========================================================

/// 会话阶段
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthPhase {
    /// 正在从持久化令牌恢复会话
    #[default]
    Loading,
    Guest,
    Member(Session),
}

/// 不携带数据的阶段标签，供守卫比较迁移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Loading,
    Guest,
    Member,
}

impl AuthPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            AuthPhase::Loading => PhaseKind::Loading,
            AuthPhase::Guest => PhaseKind::Guest,
            AuthPhase::Member(_) => PhaseKind::Member,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthPhase::Member(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthPhase::Loading)
    }
}

// =========================================================
// 观察者
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Rc<dyn Fn(&AuthPhase)>;

// =========================================================
// 会话服务
// =========================================================

struct Inner<C, S> {
    api: ApiClient<C>,
    tokens: S,
    /// 当前会话使用的令牌；`tokens` 只负责持久化
    active_token: RefCell<Option<String>>,
    phase: RefCell<AuthPhase>,
    observers: RefCell<Vec<(SubscriptionId, Observer)>>,
    next_id: Cell<u64>,
    initialized: Cell<bool>,
    disposed: Cell<bool>,
}

/// 会话服务
///
/// 克隆共享同一状态。所有操作都在单线程事件循环里执行。
pub struct SessionService<C, S> {
    inner: Rc<Inner<C, S>>,
}

impl<C, S> Clone for SessionService<C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: HttpClient + Clone, S: TokenStore> SessionService<C, S> {
    pub fn new(api: ApiClient<C>, tokens: S) -> Self {
        Self {
            inner: Rc::new(Inner {
                api,
                tokens,
                active_token: RefCell::new(None),
                phase: RefCell::new(AuthPhase::Loading),
                observers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                initialized: Cell::new(false),
                disposed: Cell::new(false),
            }),
        }
    }

    // --- 状态读取 ---

    pub fn phase(&self) -> AuthPhase {
        self.inner.phase.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.phase.borrow().session().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.phase.borrow().is_loading()
    }

    /// 已认证请求通道（仅在持有令牌且已是成员时存在）
    ///
    /// 令牌取自内存，持久化失败不影响当前会话。
    pub fn channel(&self) -> Option<LogApi<C>> {
        if self.session().is_none() {
            return None;
        }
        let token = self.inner.active_token.borrow().clone()?;
        Some(LogApi::new(self.inner.api.clone(), token))
    }

    pub fn api(&self) -> &ApiClient<C> {
        &self.inner.api
    }

    // --- 订阅 ---

    /// 注册观察者；每次阶段变化时以新阶段调用
    pub fn subscribe(&self, observer: impl Fn(&AuthPhase) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        if !self.inner.disposed.get() {
            self.inner
                .observers
                .borrow_mut()
                .push((id, Rc::new(observer)));
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .observers
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }

    fn transition(&self, next: AuthPhase) {
        if self.inner.disposed.get() {
            return;
        }
        {
            let mut phase = self.inner.phase.borrow_mut();
            if *phase == next {
                return;
            }
            tracing::debug!(from = ?phase.kind(), to = ?next.kind(), "session transition");
            *phase = next.clone();
        }
        // 先拷贝再回调，允许观察者在回调中重新订阅
        let observers: Vec<Observer> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, o)| o.clone())
            .collect();
        for observer in observers {
            observer(&next);
        }
    }

    // --- 生命周期 ---

    /// 从持久化令牌恢复会话
    ///
    /// 无论结果如何，加载状态只会结束一次；重复调用不做任何事。
    pub async fn init(&self) {
        if self.inner.initialized.replace(true) {
            return;
        }

        let Some(token) = self.inner.tokens.get() else {
            self.transition(AuthPhase::Guest);
            return;
        };

        let result = self.inner.api.call(&MeRequest, Some(&token)).await;

        // dispose 之后或期间已有其他操作改变状态：丢弃迟到的响应
        if self.inner.disposed.get() || !self.is_loading() {
            return;
        }

        match result {
            Ok(profile) => {
                tracing::info!(user_id = %profile.user_id, "session restored");
                *self.inner.active_token.borrow_mut() = Some(token);
                self.transition(AuthPhase::Member(profile.into()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored credential rejected, clearing");
                self.inner.tokens.remove();
                self.transition(AuthPhase::Guest);
            }
        }
    }

    /// 释放服务：移除所有观察者，之后的响应不再改变状态
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.observers.borrow_mut().clear();
    }

    // --- 会话操作 ---

    fn adopt(&self, token: &str, session: Session) -> Session {
        if !self.inner.disposed.get() {
            *self.inner.active_token.borrow_mut() = Some(token.to_string());
            self.inner.tokens.set(token);
            self.transition(AuthPhase::Member(session.clone()));
        }
        session
    }

    fn adopt_grant(&self, grant: AuthGrant, fallback: &str) -> ClientResult<Session> {
        if grant.token.trim().is_empty() {
            return Err(ClientError::Authentication(fallback.to_string()));
        }
        let token = grant.token;
        Ok(self.adopt(&token, grant.profile.into()))
    }

    /// 用邮箱和密码换取令牌与会话
    ///
    /// 失败时返回 [`ClientError::Authentication`]，存储与会话都不变。
    pub async fn login_with_password(&self, email: &str, password: &str) -> ClientResult<Session> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let grant = self
            .inner
            .api
            .call(&req, None)
            .await
            .map_err(|e| e.into_credential_failure(LOGIN_FAILED))?;
        let session = self.adopt_grant(grant, LOGIN_FAILED)?;
        tracing::info!(user_id = %session.user_id, "logged in");
        Ok(session)
    }

    /// 创建账户并直接登录
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ClientResult<Session> {
        let req = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let grant = self
            .inner
            .api
            .call(&req, None)
            .await
            .map_err(|e| e.into_credential_failure(REGISTRATION_FAILED))?;
        let session = self.adopt_grant(grant, REGISTRATION_FAILED)?;
        tracing::info!(user_id = %session.user_id, "registered");
        Ok(session)
    }

    /// 采用第三方身份流程已验证的令牌与会话，跳过凭据交换
    pub fn login_with_external_token(&self, token: &str, session: Session) -> Session {
        tracing::info!(user_id = %session.user_id, "adopted external identity");
        self.adopt(token, session)
    }

    /// 把 Google 身份交给后端换取令牌，再以外部令牌登录
    pub async fn login_with_google(&self, user: GoogleUser) -> ClientResult<Session> {
        let grant = self
            .inner
            .api
            .call(&GoogleLoginRequest { google_user: user }, None)
            .await
            .map_err(|e| e.into_credential_failure(EXTERNAL_LOGIN_FAILED))?;
        if grant.token.trim().is_empty() {
            return Err(ClientError::Authentication(EXTERNAL_LOGIN_FAILED.to_string()));
        }
        Ok(self.login_with_external_token(&grant.token, grant.user.into()))
    }

    /// 注销：无条件清除令牌与会话，永不失败
    pub fn logout(&self) {
        self.inner.active_token.borrow_mut().take();
        self.inner.tokens.remove();
        self.transition(AuthPhase::Guest);
    }

    /// 已认证请求被拒绝时调用：等同于注销
    pub fn expire(&self) {
        if self.session().is_some() {
            tracing::warn!("session rejected by server, signing out");
        }
        self.logout();
    }

    /// 统一处理请求错误：认证错误会让会话过期
    pub fn handle_error(&self, err: &ClientError) {
        if err.is_authentication() {
            self.expire();
        }
    }
}
