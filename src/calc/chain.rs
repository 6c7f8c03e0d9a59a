//! 기본 전송 + 최대 한 번의 폴백으로 구성된 전송 체인.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::request::{CalculationRequest, CalculationResponse};
use super::transport::{HttpTransport, ProxyTransport, Transport, TransportError};
use crate::config::ApiConfig;

/// 응답을 만들어 낸 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Primary,
    Fallback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Primary => f.write_str("primary"),
            Stage::Fallback => f.write_str("fallback"),
        }
    }
}

/// 모든 전송이 실패했을 때의 오류. 사용자에게는 기본 전송의 오류만 보인다.
#[derive(Debug, Error)]
#[error("{primary}")]
pub struct ChainError {
    pub primary: TransportError,
    /// 진단용. 사용자 메시지에는 쓰지 않는다.
    pub fallback: Option<TransportError>,
}

#[derive(Clone)]
pub struct TransportChain {
    primary: Arc<dyn Transport>,
    fallback: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for TransportChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportChain")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|t| t.name()))
            .finish()
    }
}

impl TransportChain {
    pub fn new(primary: Arc<dyn Transport>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// 폴백은 하나만 둔다. 다시 호출하면 교체된다.
    pub fn with_fallback(mut self, fallback: Arc<dyn Transport>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// 설정에서 직접 전송과 (있다면) 프록시 전송을 구성한다.
    pub fn from_config(api: &ApiConfig) -> Result<Self, TransportError> {
        let chain = Self::new(Arc::new(HttpTransport::new(api)?));
        Ok(match ProxyTransport::from_config(api)? {
            Some(proxy) => chain.with_fallback(Arc::new(proxy)),
            None => chain,
        })
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// 전송 전략 목록(시도 순서).
    pub fn strategies(&self) -> Vec<(Stage, &str)> {
        let mut out = vec![(Stage::Primary, self.primary.name())];
        if let Some(fb) = &self.fallback {
            out.push((Stage::Fallback, fb.name()));
        }
        out
    }

    pub async fn execute(
        &self,
        request: &CalculationRequest,
    ) -> Result<(CalculationResponse, Stage), ChainError> {
        self.execute_observed(request, |_| {}).await
    }

    /// 각 단계에 들어갈 때마다 `on_stage`를 호출한다.
    pub async fn execute_observed<F>(
        &self,
        request: &CalculationRequest,
        mut on_stage: F,
    ) -> Result<(CalculationResponse, Stage), ChainError>
    where
        F: FnMut(Stage) + Send,
    {
        on_stage(Stage::Primary);
        let primary = match self.primary.calculate(request).await {
            Ok(resp) => return Ok((resp, Stage::Primary)),
            Err(e) => e,
        };
        tracing::error!(transport = self.primary.name(), "direct request error: {primary}");

        let Some(fallback) = &self.fallback else {
            return Err(ChainError {
                primary,
                fallback: None,
            });
        };

        tracing::info!(transport = fallback.name(), "attempting fallback transport");
        on_stage(Stage::Fallback);
        match fallback.calculate(request).await {
            Ok(resp) => Ok((resp, Stage::Fallback)),
            Err(e) => {
                tracing::error!(transport = fallback.name(), "fallback request error: {e}");
                Err(ChainError {
                    primary,
                    fallback: Some(e),
                })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::calc::request::Operation;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 고정 응답을 돌려주는 테스트용 전송.
    pub(crate) struct Scripted {
        pub name: &'static str,
        pub outcome: Result<&'static str, u16>,
        pub calls: AtomicUsize,
    }

    impl Scripted {
        pub(crate) fn ok(name: &'static str, result: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome: Ok(result),
                calls: AtomicUsize::new(0),
            })
        }

        pub(crate) fn status(name: &'static str, code: u16) -> Arc<Self> {
            Arc::new(Self {
                name,
                outcome: Err(code),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn calculate(
            &self,
            _request: &CalculationRequest,
        ) -> Result<CalculationResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.outcome {
                Ok(result) => Ok(CalculationResponse {
                    result: result.to_string(),
                }),
                Err(code) => Err(TransportError::Status(code)),
            }
        }
    }

    fn request() -> CalculationRequest {
        CalculationRequest::new(Operation::Integrate, "x^2")
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let fallback = Scripted::ok("proxy", "unused");
        let chain = TransportChain::new(Scripted::ok("direct", "x^3/3"))
            .with_fallback(fallback.clone());
        let (resp, stage) = chain.execute(&request()).await.unwrap();
        assert_eq!(resp.result, "x^3/3");
        assert_eq!(stage, Stage::Primary);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fallback_used_once_after_primary_failure() {
        let fallback = Scripted::ok("proxy", "x^3/3");
        let chain = TransportChain::new(Scripted::status("direct", 502))
            .with_fallback(fallback.clone());
        let mut stages = Vec::new();
        let (resp, stage) = chain
            .execute_observed(&request(), |s| stages.push(s))
            .await
            .unwrap();
        assert_eq!(resp.result, "x^3/3");
        assert_eq!(stage, Stage::Fallback);
        assert_eq!(stages, vec![Stage::Primary, Stage::Fallback]);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn both_failing_reports_primary_error() {
        let chain = TransportChain::new(Scripted::status("direct", 500))
            .with_fallback(Scripted::status("proxy", 404));
        let err = chain.execute(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Server responded with status: 500");
        assert!(matches!(err.fallback, Some(TransportError::Status(404))));
    }

    #[tokio::test]
    async fn no_fallback_fails_directly() {
        let chain = TransportChain::new(Scripted::status("direct", 500));
        assert!(!chain.has_fallback());
        let err = chain.execute(&request()).await.unwrap_err();
        assert!(err.fallback.is_none());
    }

    #[test]
    fn strategies_are_ordered() {
        let chain = TransportChain::new(Scripted::ok("direct", "1"))
            .with_fallback(Scripted::ok("a", "1"))
            .with_fallback(Scripted::ok("proxy", "1"));
        assert_eq!(
            chain.strategies(),
            vec![(Stage::Primary, "direct"), (Stage::Fallback, "proxy")]
        );
    }
}
