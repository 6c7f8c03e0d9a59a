//! 제출 한 번의 상태 흐름: 대기 → 기본 전송 → (폴백) → 완료/실패.

use super::chain::{Stage, TransportChain};
use crate::i18n::{keys, Translator};
use crate::page::CalculatorForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting(Stage),
    /// 결과 마크업
    Done(String),
    /// 사용자에게 보여준 오류 마크업
    Failed(String),
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Done(_) | SubmissionState::Failed(_))
    }
}

/// 결과 표시 위젯.
pub trait OutputSink {
    fn set_output(&mut self, markup: String);

    /// 상태가 바뀔 때마다 호출된다.
    fn on_state(&mut self, _state: &SubmissionState) {}
}

impl OutputSink for String {
    fn set_output(&mut self, markup: String) {
        *self = markup;
    }
}

/// 계산 중 안내 문구.
pub fn render_calculating(tr: &Translator) -> String {
    format!("\\text{{{}}}", tr.t(keys::STATUS_CALCULATING))
}

/// 오류 문구. `message`는 기본 전송의 실패 메시지이다.
pub fn render_error(tr: &Translator, message: &str) -> String {
    format!(
        "\\text{{{}}}",
        tr.t_with(keys::STATUS_ERROR_MESSAGE, &[("message", message)])
    )
}

/// 폼 내용으로 계산을 한 번 제출한다. 제출 불가 상태면 I/O 없이 `Idle`을 돌려준다.
pub async fn submit<S>(
    chain: &TransportChain,
    tr: &Translator,
    form: &CalculatorForm,
    sink: &mut S,
) -> SubmissionState
where
    S: OutputSink + Send + ?Sized,
{
    let Some(request) = form.to_request() else {
        return SubmissionState::Idle;
    };

    sink.set_output(render_calculating(tr));

    let outcome = chain
        .execute_observed(&request, |stage| {
            sink.on_state(&SubmissionState::Submitting(stage))
        })
        .await;

    let state = match outcome {
        Ok((response, stage)) => {
            tracing::info!(operation = %request.operation, %stage, "calculation succeeded");
            SubmissionState::Done(response.result)
        }
        Err(err) => SubmissionState::Failed(render_error(tr, &err.primary.to_string())),
    };

    match &state {
        SubmissionState::Done(markup) | SubmissionState::Failed(markup) => {
            sink.set_output(markup.clone());
        }
        _ => {}
    }
    sink.on_state(&state);
    state
}
