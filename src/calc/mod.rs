//! 원격 계산 서비스 호출: 요청 모델, 전송 방식, 폴백 체인, 제출 흐름.

pub mod chain;
pub mod flow;
pub mod request;
pub mod transport;

pub use chain::{ChainError, Stage, TransportChain};
pub use flow::{render_calculating, render_error, submit, OutputSink, SubmissionState};
pub use request::{CalculationRequest, CalculationResponse, Operation, ParseOperationError};
pub use transport::{HttpTransport, ProxyTransport, Transport, TransportError};
