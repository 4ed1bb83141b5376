//! # 플래시카드(Flashcard) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/flashcard`     → 수정 / 단건 생성 / 대량 생성
//! - `DELETE /api/flashcard/:id` → 카드 삭제
//!
//! ## `POST /flashcard` 모드
//! | 본문 | 동작 | 응답 |
//! |------|------|------|
//! | `id` 있음 | `front`/`back`(+`status`) 수정 | `{ "flashcard" }` 200 |
//! | `items` 배열 있음 | `deck_id`에 대량 삽입 (최대 300개) | `{ "createdCount", "flashcards" }` 201 |
//! | 그 외 | `deck_id`에 단건 삽입 | `{ "flashcard" }` 201 |
//!
//! 대량 삽입은 호출 한 번으로 처리되며, 일부만 성공하는 경우는 없습니다.

use axum::{extract::Path, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    middleware::{AuthUser, JsonBody},
    models::*,
    routes::deleted,
};

/// `POST /flashcard`: 카드를 수정하거나 생성합니다.
pub async fn save_flashcard(
    auth: AuthUser,
    JsonBody(req): JsonBody<FlashcardRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    match req.into_command()? {
        FlashcardCommand::Update { id, changes } => {
            let flashcard = db::update_flashcard(&auth.session, &id, &changes)
                .await?
                .ok_or_else(|| AppError::NotFound("Flashcard not found".to_string()))?;
            Ok((StatusCode::OK, Json(json!({ "flashcard": flashcard }))))
        }
        FlashcardCommand::Create(card) => {
            let flashcard = db::create_flashcard(&auth.session, &card).await?;
            Ok((StatusCode::CREATED, Json(json!({ "flashcard": flashcard }))))
        }
        FlashcardCommand::CreateMany(cards) => {
            let flashcards = db::create_flashcards(&auth.session, &cards).await?;
            tracing::debug!(requested = cards.len(), created = flashcards.len(), "bulk insert");
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "createdCount": flashcards.len(),
                    "flashcards": flashcards,
                })),
            ))
        }
    }
}

/// `DELETE /flashcard/:id`: 카드를 삭제합니다.
pub async fn delete_flashcard(
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !db::delete_flashcard(&auth.session, &id).await? {
        return Err(AppError::NotFound("Flashcard not found".to_string()));
    }
    Ok(deleted(id))
}
