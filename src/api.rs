use crate::error::{ClientError, ClientResult};
use crate::request::{HttpClient, HttpRequest};
use mindtrack_shared::protocol::{
    ApiRequest, CreateLogRequest, FilterLogsRequest, GetLogRequest, TodayLogRequest,
    UpdateLogRequest,
};
use mindtrack_shared::{
    CONTENT_TYPE_JSON, DailyLogRecord, DateRange, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE,
    LogFields,
};

// =========================================================
// 传输层: ApiClient
// =========================================================

/// 绑定到后端地址的请求通道
///
/// 这里接受任何实现了 HttpClient 的客户端，从而解耦了具体的 HTTP 实现。
#[derive(Clone, Debug)]
pub struct ApiClient<C> {
    base_url: String,
    client: C,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: impl Into<String>, client: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送一个 [`ApiRequest`] 并解析其响应
    ///
    /// `R::AUTHENTICATED` 为 true 时必须提供 `token`。
    pub async fn call<R: ApiRequest>(&self, req: &R, token: Option<&str>) -> ClientResult<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD);

        match token {
            Some(token) => {
                http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
            }
            None if R::AUTHENTICATED => {
                return Err(ClientError::Unauthorized { message: None });
            }
            None => {}
        }

        if R::METHOD.has_body() {
            let body = serde_json::to_string(req).map_err(|e| ClientError::Decode(e.to_string()))?;
            http = http
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(body);
        }

        let resp = self.client.send(http).await.inspect_err(|e| {
            tracing::warn!(method = R::METHOD.as_str(), %path, error = %e, "request did not complete");
        })?;

        if !resp.ok() {
            tracing::debug!(method = R::METHOD.as_str(), %path, status = resp.status, "request rejected");
            return Err(ClientError::from_status(resp.status, &resp.body));
        }

        resp.json::<R::Response>()
    }
}

// =========================================================
// 已认证通道: LogApi
// =========================================================

/// 日志记录的已认证请求通道
///
/// 由会话服务在持有令牌时发放，见 [`crate::session::SessionService::channel`]。
#[derive(Clone, Debug)]
pub struct LogApi<C> {
    api: ApiClient<C>,
    token: String,
}

/// 提交目标：新建或按 id 更新
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(LogFields),
    Update { id: String, fields: LogFields },
}

impl<C: HttpClient> LogApi<C> {
    pub fn new(api: ApiClient<C>, token: impl Into<String>) -> Self {
        Self {
            api,
            token: token.into(),
        }
    }

    async fn call<R: ApiRequest>(&self, req: &R) -> ClientResult<R::Response> {
        self.api.call(req, Some(&self.token)).await
    }

    /// 当天的记录（若存在）
    pub async fn today(&self) -> ClientResult<Option<DailyLogRecord>> {
        Ok(self.call(&TodayLogRequest).await?.into_record())
    }

    pub async fn get(&self, id: &str) -> ClientResult<DailyLogRecord> {
        self.call(&GetLogRequest { id: id.to_string() }).await
    }

    pub async fn create(&self, fields: LogFields) -> ClientResult<DailyLogRecord> {
        self.call(&CreateLogRequest { fields }).await
    }

    pub async fn update(&self, id: &str, fields: LogFields) -> ClientResult<DailyLogRecord> {
        self.call(&UpdateLogRequest {
            id: id.to_string(),
            fields,
        })
        .await
    }

    pub async fn save(&self, submission: Submission) -> ClientResult<DailyLogRecord> {
        match submission {
            Submission::Create(fields) => self.create(fields).await,
            Submission::Update { id, fields } => self.update(&id, fields).await,
        }
    }

    pub async fn filter(&self, range: DateRange) -> ClientResult<Vec<DailyLogRecord>> {
        self.call(&FilterLogsRequest { range }).await
    }
}
