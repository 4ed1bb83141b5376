//! # 데이터 모델 모듈
//!
//! Supabase 테이블의 행(row) 구조체와 요청 본문 구조체를 정의합니다.
//! - `library`: 라이브러리와 중첩 트리(폴더 → 덱)
//! - `folder`: 폴더
//! - `deck`: 덱
//! - `flashcard`: 플래시카드 (단건/대량 생성 포함)
//! - `generation`: AI 카드 생성 요청
//! - `user`: Supabase Auth가 돌려주는 사용자
//!
//! 요청 구조체는 "타입이 틀린 필드는 없는 것으로 취급"하는 관대한 파싱을 합니다.
//! 예: `{"title": 42}`는 `title`이 없는 요청과 같습니다 (400 "Missing \"title\"").

pub mod deck;
pub mod flashcard;
pub mod folder;
pub mod generation;
pub mod library;
pub mod user;

pub use deck::*;
pub use flashcard::*;
pub use folder::*;
pub use generation::*;
pub use library::*;
pub use user::*;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 문자열이면 `Some`, 그 밖의 JSON 타입이면 `None`으로 역직렬화합니다.
pub(crate) fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// 배열이면 `Some`, 그 밖의 JSON 타입이면 `None`으로 역직렬화합니다.
pub(crate) fn array_or_none<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items),
        _ => None,
    })
}

/// 앞뒤 공백을 제거한 뒤 비어 있지 않은 문자열만 남깁니다.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 빈 문자열 식별자는 "없음"으로 취급합니다. 식별자는 trim하지 않습니다.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// `Missing "field"` 형태의 400 메시지
pub(crate) fn missing(field: &str) -> crate::error::AppError {
    crate::error::AppError::BadRequest(format!("Missing \"{field}\""))
}
