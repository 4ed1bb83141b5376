//! # JSON 본문 추출기
//!
//! 모든 쓰기 요청의 본문은 `JsonBody<T>`로 받습니다.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

/// 서비스 고유의 에러 응답을 쓰는 JSON 본문 추출기
///
/// `axum::Json`과 달리 `Content-Type` 헤더를 요구하지 않습니다.
/// JSON이 아니면 400 `Invalid JSON body`이고, 객체가 아닌 JSON 값은 `{}`로
/// 읽어서 이후 필드 검사가 어떤 값이 빠졌는지 알려주게 합니다.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| invalid_body())?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|_| invalid_body())?;
        let value = match value {
            Value::Object(_) => value,
            _ => Value::Object(Map::new()),
        };

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
    }
}

fn invalid_body() -> AppError {
    AppError::BadRequest("Invalid JSON body".to_string())
}
