//! # 덱(Deck) 모델 정의
//!
//! 덱은 폴더에 속한 카드 묶음입니다. 제목은 필수이고
//! 설명/난이도/목표는 선택입니다.

use serde::{Deserialize, Serialize};

use super::{missing, non_empty, string_or_none, trimmed, Flashcard};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub folder_id: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub objective: Option<String>,
    pub created_at: String,
}

/// `GET /deck/:id` 조회 결과: 덱 컬럼 + 임베드된 카드 목록
#[derive(Debug, Clone, Deserialize)]
pub struct DeckWithCards {
    #[serde(flatten)]
    pub deck: Deck,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDeck {
    pub folder_id: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub objective: Option<String>,
}

/// 수정 가능한 컬럼 전체를 덮어씁니다. 요청에 없는 선택 필드는 `null`로 저장됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckChanges {
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub objective: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeckRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub folder_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub objective: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DeckCommand {
    Create(NewDeck),
    Update { id: String, changes: DeckChanges },
}

impl DeckRequest {
    pub fn into_command(self) -> Result<DeckCommand, AppError> {
        let title = trimmed(self.title).ok_or_else(|| missing("title"))?;

        if let Some(id) = non_empty(self.id) {
            return Ok(DeckCommand::Update {
                id,
                changes: DeckChanges {
                    title,
                    description: self.description,
                    difficulty: self.difficulty,
                    objective: self.objective,
                },
            });
        }

        let folder_id = non_empty(self.folder_id).ok_or_else(|| missing("folder_id"))?;
        Ok(DeckCommand::Create(NewDeck {
            folder_id,
            title,
            description: self.description,
            difficulty: self.difficulty,
            objective: self.objective,
        }))
    }
}
