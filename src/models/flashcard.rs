//! # 플래시카드(Flashcard) 모델 정의
//!
//! 카드는 덱에 속하며 앞면(`front`), 뒷면(`back`), 학습 상태(`status`)를 가집니다.
//! 새 카드의 `status`는 DB 기본값(`'new'`)을 따릅니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{array_or_none, missing, non_empty, string_or_none, trimmed};
use crate::error::AppError;

/// 대량 생성 시 `items` 배열(필터링 전) 최대 길이
pub const MAX_BULK_ITEMS: usize = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub deck_id: String,
    pub front: String,
    pub back: String,
    pub status: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFlashcard {
    pub deck_id: String,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashcardChanges {
    pub front: String,
    pub back: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// `POST /flashcard` 요청 본문
///
/// - `id` 있음: `front`/`back` 수정 (`status`는 있을 때만)
/// - `items` 배열 있음: `deck_id`에 대량 생성
/// - 그 외: `deck_id`에 단건 생성
#[derive(Debug, Default, Deserialize)]
pub struct FlashcardRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub deck_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub front: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub back: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "array_or_none")]
    pub items: Option<Vec<Value>>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FlashcardCommand {
    Update { id: String, changes: FlashcardChanges },
    Create(NewFlashcard),
    CreateMany(Vec<NewFlashcard>),
}

impl FlashcardRequest {
    pub fn into_command(self) -> Result<FlashcardCommand, AppError> {
        if let Some(id) = non_empty(self.id) {
            let front = trimmed(self.front).ok_or_else(|| missing("front"))?;
            let back = trimmed(self.back).ok_or_else(|| missing("back"))?;
            return Ok(FlashcardCommand::Update {
                id,
                changes: FlashcardChanges {
                    front,
                    back,
                    status: non_empty(self.status),
                },
            });
        }

        let deck_id = non_empty(self.deck_id).ok_or_else(|| missing("deck_id"))?;

        if let Some(items) = self.items {
            return bulk_items(&deck_id, &items).map(FlashcardCommand::CreateMany);
        }

        let front = trimmed(self.front).ok_or_else(|| missing("front"))?;
        let back = trimmed(self.back).ok_or_else(|| missing("back"))?;
        Ok(FlashcardCommand::Create(NewFlashcard { deck_id, front, back }))
    }
}

/// 항목마다 앞뒤 공백을 제거하고, 앞면과 뒷면이 모두 있는 항목만 남깁니다.
/// 개수 제한은 필터링 전 배열 기준입니다.
fn bulk_items(deck_id: &str, items: &[Value]) -> Result<Vec<NewFlashcard>, AppError> {
    if items.is_empty() {
        return Err(AppError::BadRequest("No items to insert".to_string()));
    }
    if items.len() > MAX_BULK_ITEMS {
        return Err(AppError::BadRequest(format!(
            "Too many items (max {MAX_BULK_ITEMS})"
        )));
    }

    let side = |item: &Value, key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let cards: Vec<NewFlashcard> = items
        .iter()
        .filter_map(|item| {
            Some(NewFlashcard {
                deck_id: deck_id.to_string(),
                front: side(item, "front")?,
                back: side(item, "back")?,
            })
        })
        .collect();

    if cards.is_empty() {
        return Err(AppError::BadRequest(
            "No valid items (need front + back)".to_string(),
        ));
    }
    Ok(cards)
}
