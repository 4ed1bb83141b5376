//! # AI 카드 생성 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/ai/flashcards` → `{ "lines": "앞면--뒷면\n앞면--뒷면..." }`
//!
//! 요청 본문: `{ "theme", "difficulty", "count"(1~50), "objective"?, "details"? }`
//!
//! ## `lines` 형식
//! 카드 하나가 한 줄이고, 각 줄에는 구분자 `--`가 정확히 한 번 나옵니다.
//! - 필드 안의 줄바꿈은 공백이 됩니다.
//! - 필드 안에서 이어진 `-`는 공백으로 띄웁니다 (`x---y` → `x- - -y`). 지워지는 글자는 없습니다.
//! - 앞면이 `-`로 끝나거나 뒷면이 `-`로 시작하면 구분자 옆에 공백이 붙습니다 (`a- -- -b`).
//!
//! 이 핸들러는 bearer 토큰이 **있는지만** 확인합니다.
//! Supabase에 사용자 확인을 요청하지 않으며 DB에도 아무것도 저장하지 않습니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::{BearerToken, JsonBody},
    models::GenerateRequest,
    routes::AppState,
    services::{
        generation::{self, SCHEMA_NAME},
        openai::ModelError,
    },
};

/// `POST /ai/flashcards`: 주제에 맞는 카드 `count`장을 생성합니다.
///
/// # 에러
/// - 400: `theme`/`difficulty` 누락, `count`가 범위 밖이거나 숫자가 아님
/// - 500: OpenAI 호출 실패, 또는 응답이 JSON이 아님 (`error.raw`에 원문 포함)
pub async fn generate_flashcards(
    State(state): State<AppState>,
    _token: BearerToken,
    JsonBody(req): JsonBody<GenerateRequest>,
) -> Result<Json<Value>, AppError> {
    let params = req.validate()?;
    let model = state.model.as_ref().ok_or(ModelError::NotConfigured)?;

    let raw = model
        .generate_json(
            &generation::instructions(params.count),
            &generation::user_prompt(&params),
            SCHEMA_NAME,
            generation::response_schema(params.count),
        )
        .await?;

    let lines = generation::format_lines(&raw)?;
    Ok(Json(json!({ "lines": lines })))
}
