//! # 라이브러리 쿼리 모듈
//!
//! 사용자마다 라이브러리는 하나입니다. 이 불변식은 `libraries.user_id`의
//! UNIQUE 제약이 지키며, 여기서는 "조회 → 없으면 생성 → 충돌이면 다시 조회"
//! 순서로 찾거나 만듭니다. 동시에 들어온 첫 요청 두 개가 모두 생성을 시도해도
//! 한쪽은 충돌 응답을 받고 이미 만들어진 행을 돌려받습니다.

use serde::de::DeserializeOwned;

use super::{eq, maybe_single, single, DbError, Session};
use crate::models::*;

/// 폴더 생성 시 필요한 최소 컬럼
pub const LIBRARY_COLUMNS: &str = "id,name,created_at";

/// `GET /library` 응답용: 폴더와 덱을 함께 임베드합니다.
pub const LIBRARY_TREE_COLUMNS: &str = "id,name,created_at,\
folders(id,name,created_at,decks(id,title,description,difficulty,objective,created_at))";

/// 사용자의 라이브러리를 조회합니다. 없으면 `None`.
///
/// 여러 행이 돌아오면(UNIQUE 제약이 없는 스키마) 에러입니다.
pub async fn find_library<T: DeserializeOwned>(
    session: &Session,
    user_id: &str,
    columns: &str,
) -> Result<Option<T>, DbError> {
    let mut params = vec![
        ("select", columns.to_string()),
        ("user_id", eq(user_id)),
        ("order", "created_at.asc".to_string()),
    ];
    params.extend(embed_order(columns));

    let rows = session.select("libraries", &params).await?;
    maybe_single(rows)
}

/// `columns`가 실제로 임베드한 관계에만 정렬 파라미터를 붙입니다.
///
/// PostgREST는 `select`에 없는 임베드를 가리키는 `folders.order` 같은
/// 파라미터를 400(PGRST108)으로 거부합니다.
fn embed_order(columns: &str) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if columns.contains("folders(") {
        params.push(("folders.order", "created_at.asc".to_string()));
        if columns.contains("decks(") {
            params.push(("folders.decks.order", "created_at.asc".to_string()));
        }
    }
    params
}

/// 사용자의 라이브러리를 찾고, 없으면 `name`으로 생성합니다.
pub async fn ensure_library<T: DeserializeOwned>(
    session: &Session,
    user_id: &str,
    name: &str,
    columns: &str,
) -> Result<T, DbError> {
    if let Some(library) = find_library(session, user_id, columns).await? {
        return Ok(library);
    }

    tracing::info!(user_id, "creating default library");
    let created = session
        .insert("libraries", &NewLibrary { user_id, name }, columns)
        .await;

    match created {
        Ok(rows) => single(rows),
        Err(err) if err.is_unique_violation() => {
            tracing::debug!(user_id, "library created concurrently, fetching existing row");
            find_library(session, user_id, columns).await?.ok_or(err)
        }
        Err(err) => Err(err),
    }
}
