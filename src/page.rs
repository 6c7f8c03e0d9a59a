//! 계산기 화면의 보조 동작. GUI 툴킷과 무관한 상태만 다룬다.

use std::time::{Duration, Instant};
use thiserror::Error;

use crate::calc::{CalculationRequest, Operation};
use crate::i18n::keys;

/// 예제 버튼에 들어가는 식(LaTeX).
pub const EXAMPLES: &[&str] = &[
    "x^2",
    "\\sin(x)\\cos(x)",
    "\\frac{1}{1+x^2}",
    "x^3-6x^2+11x-6",
    "\\exp(x)\\sin(x)",
    "\\frac{\\sin(x)}{x}",
];

/// 식 입력 필드와 연산 선택 상자.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculatorForm {
    pub expression: String,
    pub operation: Option<Operation>,
}

impl CalculatorForm {
    /// 식과 연산이 모두 있어야 제출할 수 있다.
    pub fn can_submit(&self) -> bool {
        !self.expression.trim().is_empty() && self.operation.is_some()
    }

    /// 예제 식을 그대로 넣는다. 반환값은 새 제출 가능 여부.
    pub fn apply_example(&mut self, example: &str) -> bool {
        self.expression = example.to_string();
        self.can_submit()
    }

    pub fn to_request(&self) -> Option<CalculationRequest> {
        if !self.can_submit() {
            return None;
        }
        self.operation
            .map(|op| CalculationRequest::new(op, self.expression.clone()))
    }
}

/// 도움말 패널. 처음에는 숨겨져 있다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HelpPanel {
    visible: bool,
}

impl HelpPanel {
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// 토글 버튼에 표시할 키.
    pub fn label_key(&self) -> &'static str {
        if self.visible {
            keys::HELP_HIDE
        } else {
            keys::HELP_TOGGLE
        }
    }
}

#[derive(Debug, Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// 시스템 클립보드.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// 결과 복사 버튼의 일시적 "복사됨" 표시.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    duration: Duration,
    until: Option<Instant>,
}

impl CopyFeedback {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: None,
        }
    }

    /// 결과 마크업을 복사한다. 빈 결과는 무시하고, 실패는 기록만 한다.
    pub fn copy_result(
        &mut self,
        output: &str,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> bool {
        if output.is_empty() {
            return false;
        }
        match clipboard.write_text(output) {
            Ok(()) => {
                self.until = Some(now + self.duration);
                true
            }
            Err(e) => {
                tracing::error!("failed to copy: {e}");
                false
            }
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// 표시 시간 동안은 `status.copied`, 이후에는 원래 라벨.
    pub fn label_key(&self, now: Instant) -> &'static str {
        if self.is_active(now) {
            keys::STATUS_COPIED
        } else {
            keys::BUTTON_COPY_LATEX
        }
    }

    /// 원래 라벨로 돌아갈 때까지 남은 시간.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.until
            .filter(|until| now < *until)
            .map(|until| until - now)
    }
}

/// 단축키 판정에 필요한 키 입력.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    F1,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Ctrl 또는 Cmd
    pub command: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Submit,
    ToggleHelp,
}

/// Cmd/Ctrl+Enter → 제출, F1 또는 Cmd/Ctrl+H → 도움말.
pub fn shortcut_action(press: KeyPress) -> Option<ShortcutAction> {
    match press.key {
        Key::Enter if press.command => Some(ShortcutAction::Submit),
        Key::F1 => Some(ShortcutAction::ToggleHelp),
        Key::Char(c) if press.command && c.eq_ignore_ascii_case(&'h') => {
            Some(ShortcutAction::ToggleHelp)
        }
        _ => None,
    }
}
