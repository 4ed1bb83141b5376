//! # 덱(Deck) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/deck`     → `id`가 없으면 생성(`folder_id` 필수), 있으면 수정
//! - `GET    /api/deck/:id` → 덱과 카드 목록
//! - `DELETE /api/deck/:id` → 덱 삭제
//!
//! 수정은 제목/설명/난이도/목표를 통째로 덮어씁니다.
//! 본문에 없는 선택 필드는 `null`로 저장됩니다.

use axum::{
    extract::Path,
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    middleware::{AuthUser, JsonBody},
    models::*,
    routes::deleted,
};

/// `POST /deck`: 덱을 생성하거나 수정합니다.
///
/// 요청 본문 예: `{ "folder_id": "f1", "title": "Kanji N5", "difficulty": "easy" }`
/// 응답: `{ "deck": {...} }`, 생성은 201, 수정은 200
pub async fn save_deck(
    auth: AuthUser,
    JsonBody(req): JsonBody<DeckRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    match req.into_command()? {
        DeckCommand::Update { id, changes } => {
            let deck = db::update_deck(&auth.session, &id, &changes)
                .await?
                .ok_or_else(|| AppError::NotFound("Deck not found".to_string()))?;
            Ok((StatusCode::OK, Json(json!({ "deck": deck }))))
        }
        DeckCommand::Create(new_deck) => {
            let deck = db::create_deck(&auth.session, &new_deck).await?;
            Ok((StatusCode::CREATED, Json(json!({ "deck": deck }))))
        }
    }
}

/// `GET /deck/:id`: 덱과 그 카드들을 조회합니다.
///
/// 응답: `{ "deck": {...}, "flashcards": [...] }` (카드는 생성 순)
pub async fn get_deck(
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let DeckWithCards { deck, flashcards } = db::get_deck_with_cards(&auth.session, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Deck not found".to_string()))?;

    Ok(Json(json!({ "deck": deck, "flashcards": flashcards })))
}

/// `DELETE /deck/:id`: 덱을 삭제합니다.
///
/// 응답: `{ "ok": true, "id": "..." }`, 삭제된 행이 없으면 404
pub async fn delete_deck(
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("Missing deck id".to_string()));
    }
    if !db::delete_deck(&auth.session, &id).await? {
        return Err(AppError::NotFound("Deck not found".to_string()));
    }
    Ok(deleted(id))
}
