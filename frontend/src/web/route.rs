//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其守卫类型。

use mindtrack::{GuardKind, RedirectTarget};
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Register,
    /// 控制面板 (需要认证)
    Dashboard,
    /// 今日记录（新建或更新）
    LogEntry,
    /// 编辑指定 id 的记录
    LogEdit(String),
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/logs/entry" => Self::LogEntry,
            other => match other.strip_prefix("/logs/edit/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Self::LogEdit(id.to_string()),
                _ => Self::NotFound,
            },
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::LogEntry => "/logs/entry".to_string(),
            Self::LogEdit(id) => format!("/logs/edit/{}", id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：该路由受哪种守卫保护**
    pub fn guard(&self) -> GuardKind {
        match self {
            Self::Login | Self::Register => GuardKind::GuestOnly,
            Self::Dashboard | Self::LogEntry | Self::LogEdit(_) => GuardKind::MemberOnly,
            Self::NotFound => GuardKind::Public,
        }
    }

    /// 守卫重定向目标对应的路由
    pub fn for_redirect(target: RedirectTarget) -> Self {
        match target {
            RedirectTarget::MemberHome => Self::Dashboard,
            RedirectTarget::LoginEntry => Self::Login,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_resolve_to_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/login"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/register/"), AppRoute::Register);
        assert_eq!(AppRoute::from_path("/logs/entry"), AppRoute::LogEntry);
        assert_eq!(AppRoute::from_path("/logs/edit/abc"), AppRoute::LogEdit("abc".into()));
        assert_eq!(AppRoute::from_path("/logs/edit/"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/logs/edit/a/b"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn edit_route_round_trips() {
        let route = AppRoute::LogEdit("log-7".into());
        assert_eq!(AppRoute::from_path(&route.to_path()), route);
    }

    #[test]
    fn guards_per_route() {
        assert_eq!(AppRoute::Register.guard(), GuardKind::GuestOnly);
        assert_eq!(AppRoute::LogEdit("x".into()).guard(), GuardKind::MemberOnly);
        assert_eq!(AppRoute::NotFound.guard(), GuardKind::Public);
        assert_eq!(AppRoute::for_redirect(RedirectTarget::MemberHome), AppRoute::Dashboard);
    }
}
