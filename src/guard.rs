//! 路由守卫状态机
//!
//! 守卫只读取会话阶段，不依赖渲染：
//! - `view` 决定渲染什么（占位 / 子组件 / 空）
//! - `on_transition` 只在阶段迁移时产生一次性导航命令，稳定阶段下的重复渲染不会触发重定向

use crate::session::PhaseKind;

/// 重定向目标（由 UI 层映射到具体路由）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// 已认证区域首页
    MemberHome,
    /// 登录入口
    LoginEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Redirect(RedirectTarget),
}

/// 渲染决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    /// 会话仍在加载，渲染中性占位
    Placeholder,
    Children,
    /// 即将重定向，什么都不渲染
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// 仅未认证用户（登录、注册页）
    GuestOnly,
    /// 仅已认证用户
    MemberOnly,
    /// 不受会话影响
    Public,
}

impl GuardKind {
    pub fn view(&self, phase: PhaseKind) -> GuardView {
        match (self, phase) {
            (GuardKind::Public, _) => GuardView::Children,
            (_, PhaseKind::Loading) => GuardView::Placeholder,
            (GuardKind::GuestOnly, PhaseKind::Member) => GuardView::Nothing,
            (GuardKind::MemberOnly, PhaseKind::Guest) => GuardView::Nothing,
            _ => GuardView::Children,
        }
    }

    /// 在已解析的阶段下进入该守卫时是否需要离开
    pub fn on_enter(&self, phase: PhaseKind) -> Option<NavCommand> {
        match (self, phase) {
            (GuardKind::GuestOnly, PhaseKind::Member) => {
                Some(NavCommand::Redirect(RedirectTarget::MemberHome))
            }
            (GuardKind::MemberOnly, PhaseKind::Guest) => {
                Some(NavCommand::Redirect(RedirectTarget::LoginEntry))
            }
            _ => None,
        }
    }

    /// 阶段迁移时的导航命令；`prev == next` 时永远为 None
    pub fn on_transition(&self, prev: Option<PhaseKind>, next: PhaseKind) -> Option<NavCommand> {
        if prev == Some(next) {
            return None;
        }
        self.on_enter(next)
    }
}
