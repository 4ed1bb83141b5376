use super::{maybe_single, single, DbError, Session};
use crate::models::*;

pub const FLASHCARD_COLUMNS: &str = "id,deck_id,front,back,status,created_at";

pub async fn create_flashcard(
    session: &Session,
    card: &NewFlashcard,
) -> Result<Flashcard, DbError> {
    let rows = session.insert("flashcards", card, FLASHCARD_COLUMNS).await?;
    single(rows)
}

/// 배치 전체를 호출 한 번으로 삽입합니다. 전부 들어가거나 하나도 안 들어갑니다.
pub async fn create_flashcards(
    session: &Session,
    cards: &[NewFlashcard],
) -> Result<Vec<Flashcard>, DbError> {
    session.insert("flashcards", cards, FLASHCARD_COLUMNS).await
}

pub async fn update_flashcard(
    session: &Session,
    id: &str,
    changes: &FlashcardChanges,
) -> Result<Option<Flashcard>, DbError> {
    let rows = session
        .update("flashcards", id, changes, FLASHCARD_COLUMNS)
        .await?;
    maybe_single(rows)
}

pub async fn delete_flashcard(session: &Session, id: &str) -> Result<bool, DbError> {
    session.delete("flashcards", id).await
}
