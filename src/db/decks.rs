//! # 덱 쿼리 모듈
//!
//! `decks` 테이블에 대한 CRUD 함수들입니다.
//! 모든 함수는 요청 전용 `Session`을 빌려(&) 사용합니다.

use super::{eq, maybe_single, single, DbError, Session};
use crate::models::*;

pub const DECK_COLUMNS: &str = "id,folder_id,title,description,difficulty,objective,created_at";

const DECK_WITH_CARDS_COLUMNS: &str = "id,folder_id,title,description,difficulty,objective,created_at,\
flashcards(id,deck_id,front,back,status,created_at)";

/// 새 덱을 삽입하고 삽입된 행을 반환합니다.
pub async fn create_deck(session: &Session, deck: &NewDeck) -> Result<Deck, DbError> {
    let rows = session.insert("decks", deck, DECK_COLUMNS).await?;
    single(rows)
}

/// 덱의 제목/설명/난이도/목표를 갱신합니다.
///
/// # 반환값
/// - `Ok(Some(Deck))`: 갱신된 덱
/// - `Ok(None)`: 해당 ID의 덱이 없거나 RLS로 보이지 않음
pub async fn update_deck(
    session: &Session,
    id: &str,
    changes: &DeckChanges,
) -> Result<Option<Deck>, DbError> {
    let rows = session.update("decks", id, changes, DECK_COLUMNS).await?;
    maybe_single(rows)
}

/// 덱과 그 카드들을 한 번의 호출로 조회합니다 (PostgREST 임베드).
pub async fn get_deck_with_cards(
    session: &Session,
    id: &str,
) -> Result<Option<DeckWithCards>, DbError> {
    let rows = session
        .select(
            "decks",
            &[
                ("select", DECK_WITH_CARDS_COLUMNS.to_string()),
                ("id", eq(id)),
                ("flashcards.order", "created_at.asc".to_string()),
            ],
        )
        .await?;
    maybe_single(rows)
}

/// 덱을 삭제합니다. 삭제된 행이 없으면 `false`.
pub async fn delete_deck(session: &Session, id: &str) -> Result<bool, DbError> {
    session.delete("decks", id).await
}
