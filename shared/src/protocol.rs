use crate::{AuthGrant, DailyLogRecord, DateRange, ExternalAuthGrant, GoogleUser, LogFields, TodayLog, UserProfile};
use serde::{Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token must be attached.
    const AUTHENTICATED: bool;

    /// The URL path, including any query string.
    fn path(&self) -> String;
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthGrant;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/login".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = AuthGrant;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/register".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    pub google_user: GoogleUser,
}

impl ApiRequest for GoogleLoginRequest {
    type Response = ExternalAuthGrant;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/auth/google".to_string()
    }
}

/// Who am I
#[derive(Debug, Clone, Serialize)]
pub struct MeRequest;

impl ApiRequest for MeRequest {
    type Response = UserProfile;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = true;

    fn path(&self) -> String {
        "/api/auth/me".to_string()
    }
}

// =========================================================
// Logs
// =========================================================

/// Records whose date falls in the inclusive range
#[derive(Debug, Clone, Serialize)]
pub struct FilterLogsRequest {
    #[serde(skip)]
    pub range: DateRange,
}

impl ApiRequest for FilterLogsRequest {
    type Response = Vec<DailyLogRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = true;

    fn path(&self) -> String {
        format!(
            "/api/logs/filter?startDate={}&endDate={}",
            self.range.start_param(),
            self.range.end_param()
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TodayLogRequest;

impl ApiRequest for TodayLogRequest {
    type Response = TodayLog;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = true;

    fn path(&self) -> String {
        "/api/logs/today".to_string()
    }
}

/// Create today's record; the body is the flat field set
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct CreateLogRequest {
    pub fields: LogFields,
}

impl ApiRequest for CreateLogRequest {
    type Response = DailyLogRecord;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = true;

    fn path(&self) -> String {
        "/api/logs".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateLogRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub fields: LogFields,
}

impl ApiRequest for UpdateLogRequest {
    type Response = DailyLogRecord;
    const METHOD: HttpMethod = HttpMethod::Put;
    const AUTHENTICATED: bool = true;

    fn path(&self) -> String {
        format!("/api/logs/{}", self.id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetLogRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetLogRequest {
    type Response = DailyLogRecord;
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = true;

    fn path(&self) -> String {
        format!("/api/logs/{}", self.id)
    }
}
