//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 [`HttpClient`] 接口。

use async_trait::async_trait;
use mindtrack::{ClientError, ClientResult, HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn build_failed(e: JsValue) -> ClientError {
    ClientError::Network(format!("request build failed: {:?}", e))
}

/// 读取响应体文本
async fn read_text(response: &Response) -> ClientResult<String> {
    let promise = response
        .text()
        .map_err(|e| ClientError::Decode(format!("{:?}", e)))?;

    let text = JsFuture::from(promise)
        .await
        .map_err(|e| ClientError::Network(format!("{:?}", e)))?;

    text.as_string()
        .ok_or_else(|| ClientError::Decode("response body is not a string".to_string()))
}

/// 基于 fetch 的浏览器 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHttpClient;

#[async_trait(?Send)]
impl HttpClient for BrowserHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let headers = Headers::new().map_err(build_failed)?;
        for (key, value) in &req.headers {
            headers.set(key, value).map_err(build_failed)?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts).map_err(build_failed)?;

        let window = web_sys::window()
            .ok_or_else(|| ClientError::Network("window is not available".to_string()))?;

        // fetch 只在网络层失败时 reject，非 2xx 响应照常 resolve
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ClientError::Network(format!("{:?}", e)))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ClientError::Decode(format!("not a Response: {:?}", e)))?;

        let status = response.status();
        let body = read_text(&response).await?;
        Ok(HttpResponse::new(status, body))
    }
}
