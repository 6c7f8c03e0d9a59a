//! 계산 요청을 실제로 보내는 전송 방식들.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use super::request::{CalculationRequest, CalculationResponse};
use crate::config::ApiConfig;

/// 계산 엔드포인트 경로.
pub const CALCULATE_PATH: &str = "/calculate";

/// 전송 실패. `Display` 문자열이 그대로 사용자 오류 메시지에 들어간다.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("Server responded with status: {0}")]
    Status(u16),
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Proxy request failed: {0}")]
    Proxy(String),
}

/// 계산 요청 전송 전략.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, TransportError>;
}

pub fn user_agent() -> String {
    format!("symbolic-calculator/{}", env!("CARGO_PKG_VERSION"))
}

fn build_client(api: &ApiConfig) -> Result<Client, TransportError> {
    // 쿠키 저장소를 켜지 않으므로 자격 증명은 보내지 않는다.
    let client = Client::builder()
        .user_agent(user_agent())
        .timeout(Duration::from_secs(api.timeout_secs.max(1)))
        .default_headers(header_map(&api.headers))
        .build()?;
    Ok(client)
}

fn header_map(headers: &BTreeMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(n), Ok(v)) => {
                map.insert(n, v);
            }
            _ => tracing::warn!(header = %name, "skipping invalid header"),
        }
    }
    map
}

async fn post_calculation(
    client: &Client,
    url: &str,
    request: &CalculationRequest,
) -> Result<CalculationResponse, TransportError> {
    tracing::debug!(url, operation = %request.operation, "sending calculation");
    let response = client.post(url).json(request).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status(status.as_u16()));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// 계산 서비스에 직접 보내는 기본 전송.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(api: &ApiConfig) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_client(api)?,
            url: join_url(&api.base_url, CALCULATE_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "direct"
    }

    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, TransportError> {
        post_calculation(&self.client, &self.url, request).await
    }
}

/// 교차 출처 제한을 우회하는 프록시 경유 전송. `proxy_url`이 설정된 경우에만 존재한다.
#[derive(Debug, Clone)]
pub struct ProxyTransport {
    client: Client,
    proxy_url: String,
}

impl ProxyTransport {
    /// 프록시가 설정되지 않았으면 `Ok(None)`.
    pub fn from_config(api: &ApiConfig) -> Result<Option<Self>, TransportError> {
        match api.proxy_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(Some(Self {
                client: build_client(api)?,
                proxy_url: url.to_string(),
            })),
            _ => Ok(None),
        }
    }

    /// `path`로 `body`를 프록시에 보낸다.
    pub async fn make_proxied_request(
        &self,
        path: &str,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, TransportError> {
        let url = join_url(&self.proxy_url, path);
        post_calculation(&self.client, &url, request)
            .await
            .map_err(|e| match e {
                TransportError::Network(err) => TransportError::Proxy(err.to_string()),
                other => other,
            })
    }
}

#[async_trait]
impl Transport for ProxyTransport {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResponse, TransportError> {
        self.make_proxied_request(CALCULATE_PATH, request).await
    }
}
