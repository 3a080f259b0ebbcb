use serde::Deserialize;
use thiserror::Error;

// =========================================================
// 用户可见的兜底文案
// =========================================================

pub const CONNECT_FAILED_MESSAGE: &str =
    "Unable to connect to the server. Please check your connection or try again later.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误分类
///
/// 字段级校验错误不在此列，见 [`crate::validation::ValidationErrors`]，它不会离开表单。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// 凭据被拒绝（登录/注册），携带可直接展示的消息
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// 已认证请求被 401 拒绝：会话过期或令牌无效
    #[error("unauthorized: {}", .message.as_deref().unwrap_or("session rejected"))]
    Unauthorized { message: Option<String> },
    /// 请求未能完成
    #[error("network error: {0}")]
    Network(String),
    /// 非 2xx 响应
    #[error("server responded {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Server { status: u16, message: Option<String> },
    /// 2xx 但响应体无法解析
    #[error("unexpected response: {0}")]
    Decode(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// 服务端错误载荷：`{"error": "..."}` 或 `{"message": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl ClientError {
    /// 从非 2xx 响应构造错误
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        if status == 401 {
            ClientError::Unauthorized { message }
        } else {
            ClientError::Server { status, message }
        }
    }

    /// 是否应当清除令牌并回到登录页
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            ClientError::Authentication(_) | ClientError::Unauthorized { .. }
        )
    }

    /// 是否为 409 冲突（同一天已存在记录）
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Server { status: 409, .. })
    }

    /// 用于通知的文案：服务端消息原样展示，否则使用 `fallback`
    pub fn user_message_or(&self, fallback: &str) -> String {
        match self {
            ClientError::Authentication(message) => message.clone(),
            ClientError::Unauthorized { message } => message
                .clone()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ClientError::Network(_) => CONNECT_FAILED_MESSAGE.to_string(),
            ClientError::Server { message, .. } => {
                message.clone().unwrap_or_else(|| fallback.to_string())
            }
            ClientError::Decode(_) => fallback.to_string(),
        }
    }

    pub fn user_message(&self) -> String {
        self.user_message_or(GENERIC_FAILURE_MESSAGE)
    }

    /// 把登录/注册过程中的任意失败归一为认证错误
    pub fn into_credential_failure(self, fallback: &str) -> Self {
        let message = match self {
            ClientError::Authentication(message) => message,
            ClientError::Network(_) => CONNECT_FAILED_MESSAGE.to_string(),
            ClientError::Unauthorized { message } | ClientError::Server { message, .. } => {
                message.unwrap_or_else(|| fallback.to_string())
            }
            ClientError::Decode(_) => fallback.to_string(),
        };
        ClientError::Authentication(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let err = ClientError::from_status(422, r#"{"error":"Mood level is required"}"#);
        assert_eq!(
            err,
            ClientError::Server {
                status: 422,
                message: Some("Mood level is required".into())
            }
        );
        assert_eq!(err.user_message_or("Failed to submit log"), "Mood level is required");
    }

    #[test]
    fn missing_message_uses_fallback() {
        let err = ClientError::from_status(500, "<html>oops</html>");
        assert_eq!(err.user_message_or("Failed to submit log"), "Failed to submit log");
        assert!(!err.is_authentication());
    }

    #[test]
    fn unauthorized_is_an_authentication_error() {
        let err = ClientError::from_status(401, "");
        assert!(err.is_authentication());
        assert_eq!(err.user_message(), SESSION_EXPIRED_MESSAGE);
    }

    #[test]
    fn credential_failure_mapping() {
        let rejected = ClientError::from_status(401, r#"{"message":"Invalid credentials"}"#);
        assert_eq!(
            rejected.into_credential_failure("Login failed"),
            ClientError::Authentication("Invalid credentials".into())
        );

        let offline = ClientError::Network("fetch failed".into());
        assert_eq!(
            offline.into_credential_failure("Login failed"),
            ClientError::Authentication(CONNECT_FAILED_MESSAGE.into())
        );

        let bare = ClientError::from_status(400, "{}");
        assert_eq!(
            bare.into_credential_failure("Registration failed"),
            ClientError::Authentication("Registration failed".into())
        );
    }

    #[test]
    fn conflict_detection() {
        assert!(ClientError::from_status(409, "").is_conflict());
        assert!(!ClientError::from_status(400, "").is_conflict());
    }
}
