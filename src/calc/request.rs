use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::i18n::keys;

/// 계산 서비스가 지원하는 연산.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Solve,
    Dsolve,
    Integrate,
    Diff,
    Simplify,
    Expand,
    Factor,
    Collect,
    Limit,
    Series,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::Solve,
        Operation::Dsolve,
        Operation::Integrate,
        Operation::Diff,
        Operation::Simplify,
        Operation::Expand,
        Operation::Factor,
        Operation::Collect,
        Operation::Limit,
        Operation::Series,
    ];

    /// 요청 본문에 들어가는 식별자.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Solve => "solve",
            Operation::Dsolve => "dsolve",
            Operation::Integrate => "integrate",
            Operation::Diff => "diff",
            Operation::Simplify => "simplify",
            Operation::Expand => "expand",
            Operation::Factor => "factor",
            Operation::Collect => "collect",
            Operation::Limit => "limit",
            Operation::Series => "series",
        }
    }

    /// 화면 표시용 번역 키.
    pub fn label_key(&self) -> &'static str {
        match self {
            Operation::Solve => keys::ACTION_SOLVE,
            Operation::Dsolve => keys::ACTION_DSOLVE,
            Operation::Integrate => keys::ACTION_INTEGRATE,
            Operation::Diff => keys::ACTION_DIFF,
            Operation::Simplify => keys::ACTION_SIMPLIFY,
            Operation::Expand => keys::ACTION_EXPAND,
            Operation::Factor => keys::ACTION_FACTOR,
            Operation::Collect => keys::ACTION_COLLECT,
            Operation::Limit => keys::ACTION_LIMIT,
            Operation::Series => keys::ACTION_SERIES,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation: {0}")]
pub struct ParseOperationError(pub String);

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOperationError(s.to_string()))
    }
}

/// 한 번의 제출마다 새로 만드는 요청. 식은 LaTeX 마크업이다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub operation: Operation,
    pub expression: String,
}

impl CalculationRequest {
    pub fn new(operation: Operation, expression: impl Into<String>) -> Self {
        Self {
            operation,
            expression: expression.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub result: String,
}
