//! Mind Track 客户端核心
//!
//! 与渲染无关的部分：传输抽象、API 网关、会话服务、路由守卫、表单与趋势模型。
//! 浏览器适配（fetch、localStorage）在 `mindtrack-frontend` 中实现 [`HttpClient`] 与 [`TokenStore`]。

pub mod api;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod log_form;
pub mod request;
pub mod session;
pub mod storage;
pub mod trends;
pub mod validation;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, LogApi, Submission};
pub use error::{ClientError, ClientResult};
pub use guard::{GuardKind, GuardView, NavCommand, RedirectTarget};
pub use log_form::{LogDraft, LogField, LogFormModel};
pub use request::{HttpClient, HttpRequest, HttpResponse};
pub use session::{AuthPhase, PhaseKind, SessionService, SubscriptionId};
pub use storage::{MemoryTokenStore, TokenStore};
pub use trends::{LatestRequest, RequestTicket, TrendSeries, TrendsState};
pub use validation::ValidationErrors;

pub use mindtrack_shared as shared;
