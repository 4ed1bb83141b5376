//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 핸들러가 반환하는 모든 에러를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답(JSON 에러 봉투)으로 자동 변환
//!
//! 업스트림(Supabase, OpenAI) 에러는 각각 `DbError`, `ModelError`로 정의되어 있고,
//! `#[from]` 덕분에 `?` 연산자만으로 `AppError`로 변환됩니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::db::DbError;
use crate::services::openai::ModelError;

/// 핸들러에서 발생할 수 있는 모든 에러 종류
///
/// 각 variant는 고정된 HTTP 상태 코드로 매핑됩니다.
/// - 400: 요청 본문 형식 오류
/// - 401: 자격 증명 없음/형식 오류/거부 (원인을 구분하지 않음)
/// - 404: 갱신/삭제 대상 행이 없음
/// - 500: 업스트림 실패
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 행을 찾을 수 없음 (HTTP 404)
    /// 메시지 예: "Deck not found"
    #[error("{0}")]
    NotFound(String),

    /// 잘못된 요청 (HTTP 400)
    #[error("{0}")]
    BadRequest(String),

    /// 인증 실패 (HTTP 401)
    ///
    /// 토큰이 없든, 형식이 틀렸든, Supabase가 거부했든 항상 같은 응답입니다.
    #[error("Unauthorized")]
    Unauthorized,

    /// Supabase 호출 실패 (HTTP 500)
    /// 업스트림 메시지를 그대로 클라이언트에 전달합니다.
    #[error(transparent)]
    Database(#[from] DbError),

    /// OpenAI 호출 실패 또는 응답 파싱 실패 (HTTP 500)
    #[error(transparent)]
    Model(#[from] ModelError),

    /// 그 밖의 서버 내부 오류 (HTTP 500)
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// 이 에러에 대응하는 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Model(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON 봉투에 들어가는 에러 코드 문자열
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized => "unauthorized",
            AppError::Database(_) => "database_error",
            AppError::Model(_) => "model_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 결과: `{ "error": { "code": "...", "message": "..." } }`
    /// 모델 응답 파싱 실패일 때만 `error.raw`에 모델의 원문 출력이 추가됩니다.
    fn into_response(self) -> Response {
        let status = self.status();

        // 500 계열은 서버 로그에도 남깁니다.
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {}", e),
            AppError::Model(e) => tracing::error!("Model error: {}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }

        let mut error = json!({
            "code": self.code(),
            "message": self.to_string(),
        });

        if let AppError::Model(ModelError::InvalidJson { raw }) = &self {
            error["raw"] = Value::String(raw.clone());
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
