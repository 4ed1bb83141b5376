//! # AI 카드 생성 요청 모델
//!
//! 주제와 난이도는 필수, 카드 수는 1~50 사이여야 합니다.

use serde::Deserialize;
use serde_json::Value;

use super::{missing, string_or_none, trimmed};
use crate::error::AppError;

pub const MIN_CARD_COUNT: u32 = 1;
pub const MAX_CARD_COUNT: u32 = 50;

/// `POST /ai/flashcards` 요청 본문
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub difficulty: Option<String>,
    /// JSON 정수 또는 정수를 담은 문자열
    #[serde(default)]
    pub count: Option<Value>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub objective: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub details: Option<String>,
}

/// 검증을 통과한 생성 파라미터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub theme: String,
    pub difficulty: String,
    pub count: u32,
    pub objective: Option<String>,
    pub details: Option<String>,
}

impl GenerateRequest {
    pub fn validate(self) -> Result<GenerationParams, AppError> {
        let theme = trimmed(self.theme).ok_or_else(|| missing("theme"))?;
        let difficulty = trimmed(self.difficulty).ok_or_else(|| missing("difficulty"))?;
        let count = self
            .count
            .as_ref()
            .and_then(parse_count)
            .filter(|n| (MIN_CARD_COUNT..=MAX_CARD_COUNT).contains(n))
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "\"count\" must be between {MIN_CARD_COUNT} and {MAX_CARD_COUNT}"
                ))
            })?;

        Ok(GenerationParams {
            theme,
            difficulty,
            count,
            objective: trimmed(self.objective),
            details: trimmed(self.details),
        })
    }
}

fn parse_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(n) => u32::try_from(n).ok(),
            // 3.0은 정수, 3.5는 아님
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                .map(|f| f as u32),
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
