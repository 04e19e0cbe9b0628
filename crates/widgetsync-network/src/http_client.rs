//! HTTP REST 리소스 클라이언트.
//!
//! `ResourceClient` 포트 구현. 인증 헤더 자동 주입, 상태 코드 매핑.
//! 재시도는 하지 않는다: 실패는 그대로 호출자에게 전달된다.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use widgetsync_core::error::CoreError;
use widgetsync_core::models::resource::RequestMethod;
use widgetsync_core::ports::resource_client::ResourceClient;
use widgetsync_core::ports::token_provider::TokenProvider;

/// REST 리소스 클라이언트: `ResourceClient` 포트 구현
pub struct HttpResourceClient {
    client: reqwest::Client,
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
}

impl HttpResourceClient {
    /// 새 HTTP 리소스 클라이언트 생성
    pub fn new(
        base_url: &str,
        token_provider: Arc<dyn TokenProvider>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Transport(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_provider,
        })
    }

    /// 상대 경로를 base_url 기준 절대 URL로 변환 (절대 URL은 그대로)
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }

    /// Authorization/Content-Type 헤더가 포함된 요청 빌더 반환
    async fn authorized_request(
        &self,
        method: reqwest::Method,
        url: &str,
    ) -> Result<reqwest::RequestBuilder, CoreError> {
        let token = self.token_provider.get_token().await?;
        let url = self.resolve_url(url);
        Ok(self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json"))
    }

    /// 응답 상태 코드 확인: 2xx가 아니면 상태와 본문을 담은 에러
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_else(|e| {
            tracing::warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        Err(CoreError::HttpStatus {
            status: status.as_u16(),
            body,
        })
    }
}

fn to_reqwest_method(method: RequestMethod) -> reqwest::Method {
    match method {
        RequestMethod::Get => reqwest::Method::GET,
        RequestMethod::Post => reqwest::Method::POST,
        RequestMethod::Put => reqwest::Method::PUT,
        RequestMethod::Patch => reqwest::Method::PATCH,
        RequestMethod::Delete => reqwest::Method::DELETE,
    }
}

fn transport_error(context: &str, e: reqwest::Error) -> CoreError {
    if e.is_timeout() {
        CoreError::Transport(format!("{context}: 타임아웃: {e}"))
    } else {
        CoreError::Transport(format!("{context}: {e}"))
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn get_json(&self, url: &str) -> Result<Value, CoreError> {
        debug!("GET {url}");

        let resp = self
            .authorized_request(reqwest::Method::GET, url)
            .await?
            .send()
            .await
            .map_err(|e| transport_error("GET 요청 실패", e))?;

        let resp = self.check_response(resp).await?;
        let text = resp
            .text()
            .await
            .map_err(|e| transport_error("응답 본문 읽기 실패", e))?;

        serde_json::from_str(&text)
            .map_err(|e| CoreError::MalformedResponse(format!("{url}: {e}")))
    }

    async fn send(
        &self,
        method: RequestMethod,
        url: &str,
        body: Option<&Value>,
    ) -> Result<(), CoreError> {
        debug!("{method} {url}");

        let mut req = self
            .authorized_request(to_reqwest_method(method), url)
            .await?;
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| transport_error(&format!("{method} 요청 실패"), e))?;

        self.check_response(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenManager;
    use serde_json::json;

    fn client_for(url: &str) -> HttpResourceClient {
        HttpResourceClient::new(
            url,
            Arc::new(TokenManager::with_token("tok_abc")),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn resolve_url_variants() {
        let client = client_for("http://localhost:8000/");
        assert_eq!(client.resolve_url("/api/x"), "http://localhost:8000/api/x");
        assert_eq!(client.resolve_url("api/x"), "http://localhost:8000/api/x");
        assert_eq!(
            client.resolve_url("https://other.example.com/y"),
            "https://other.example.com/y"
        );
    }

    #[tokio::test]
    async fn get_json_sends_auth_and_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/widget/chatbox")
            .match_header("authorization", "Bearer tok_abc")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"settings":{"x":1}}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let value = client.get_json("/api/widget/chatbox").await.unwrap();
        assert_eq!(value, json!({"settings": {"x": 1}}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_maps_to_http_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/d")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.get_json("/d").await.unwrap_err();
        match err {
            CoreError::HttpStatus { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn invalid_json_is_malformed_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/d")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.get_json("/d").await.unwrap_err();
        assert!(matches!(err, CoreError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn send_posts_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/d")
            .match_header("authorization", "Bearer tok_abc")
            .match_body(mockito::Matcher::Json(json!({"settings": {"x": 2}})))
            .with_status(200)
            .with_body("ignored")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let body = json!({"settings": {"x": 2}});
        client
            .send(RequestMethod::Post, "/d", Some(&body))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_delete_without_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/d/reset")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server.url());
        client
            .send(RequestMethod::Delete, "/d/reset", None)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_failure_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/d")
            .with_status(422)
            .with_body(r#"{"error":"bad"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client
            .send(RequestMethod::Put, "/d", Some(&json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("bad"));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let client = client_for("http://127.0.0.1:1");
        let err = client.get_json("/d").await.unwrap_err();
        assert!(matches!(err, CoreError::Transport(_)));
    }

    #[tokio::test]
    async fn missing_token_fails_before_request() {
        let client = HttpResourceClient::new(
            "http://127.0.0.1:1",
            Arc::new(TokenManager::new()),
            Duration::from_secs(1),
        )
        .unwrap();
        let err = client.get_json("/d").await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
    }
}
