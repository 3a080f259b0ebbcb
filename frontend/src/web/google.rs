//! Google Identity Services 封装
//!
//! 通过 GIS token client 获取 access token，再读取 userinfo 得到已验证的身份。
//! 需要页面加载 `https://accounts.google.com/gsi/client`。

use super::http::BrowserHttpClient;
use mindtrack::{ClientError, ClientResult, HttpClient, HttpRequest};
use mindtrack_shared::GoogleUser;
use mindtrack_shared::protocol::HttpMethod;
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const SCOPES: &str = "openid email profile";

#[wasm_bindgen(inline_js = r#"
export function request_google_token(client_id, scope, on_token, on_error) {
    const oauth2 = window.google && window.google.accounts && window.google.accounts.oauth2;
    if (!oauth2) {
        on_error("Google Sign-In is not available");
        return;
    }
    const client = oauth2.initTokenClient({
        client_id: client_id,
        scope: scope,
        callback: (resp) => {
            if (resp && resp.access_token) {
                on_token(resp.access_token);
            } else {
                on_error((resp && resp.error) || "Google Sign-In failed");
            }
        },
        error_callback: (err) => on_error((err && err.message) || "Google Sign-In was cancelled"),
    });
    client.requestAccessToken();
}
"#)]
extern "C" {
    fn request_google_token(
        client_id: &str,
        scope: &str,
        on_token: &js_sys::Function,
        on_error: &js_sys::Function,
    );
}

/// userinfo 端点的响应
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

impl GoogleUserInfo {
    /// 显示名取姓名，缺失时取邮箱 `@` 之前的部分
    pub fn into_google_user(self) -> GoogleUser {
        let full_name = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let name = if full_name.is_empty() {
            self.email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            full_name
        };
        GoogleUser {
            email: self.email,
            name,
            google_id: self.sub,
        }
    }
}

/// 弹出 Google 授权窗口并等待 access token
async fn request_access_token(client_id: &str) -> ClientResult<String> {
    let mut on_ready = |resolve: js_sys::Function, reject: js_sys::Function| {
        request_google_token(client_id, SCOPES, &resolve, &reject);
    };
    let promise = js_sys::Promise::new(&mut on_ready);

    let value = JsFuture::from(promise).await.map_err(|e| {
        ClientError::Authentication(e.as_string().unwrap_or_else(|| "Google Sign-In failed".into()))
    })?;

    value
        .as_string()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClientError::Authentication("Google Sign-In failed".into()))
}

/// 完整的浏览器端流程：授权 -> userinfo -> [`GoogleUser`]
pub async fn sign_in(client_id: &str) -> ClientResult<GoogleUser> {
    let access_token = request_access_token(client_id).await?;

    let req = HttpRequest::new(USERINFO_URL, HttpMethod::Get)
        .with_header("Authorization", &format!("Bearer {}", access_token));
    let resp = BrowserHttpClient.send(req).await?;
    if !resp.ok() {
        return Err(ClientError::from_status(resp.status, &resp.body));
    }

    let info: GoogleUserInfo = serde_json_wasm::from_str(&resp.body)
        .map_err(|e| ClientError::Decode(e.to_string()))?;
    tracing::debug!(email = %info.email, "google identity verified");
    Ok(info.into_google_user())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(given: Option<&str>, family: Option<&str>) -> GoogleUserInfo {
        GoogleUserInfo {
            sub: "sub-1".into(),
            email: "grace.hopper@example.com".into(),
            given_name: given.map(str::to_string),
            family_name: family.map(str::to_string),
        }
    }

    #[test]
    fn name_from_given_and_family() {
        let user = info(Some("Grace"), Some("Hopper")).into_google_user();
        assert_eq!(user.name, "Grace Hopper");
        assert_eq!(user.google_id, "sub-1");
    }

    #[test]
    fn name_falls_back_to_email_local_part() {
        assert_eq!(info(None, None).into_google_user().name, "grace.hopper");
        assert_eq!(info(Some(" "), None).into_google_user().name, "grace.hopper");
        assert_eq!(info(None, Some("Hopper")).into_google_user().name, "Hopper");
    }
}
