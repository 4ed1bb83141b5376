//! # 라이브러리(Library) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/library` → 내 라이브러리 (폴더 → 덱 트리)
//!
//! 라이브러리가 아직 없으면 기본 이름으로 만든 뒤 빈 트리를 돌려줍니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{
    db::{self, LIBRARY_TREE_COLUMNS},
    error::AppError,
    middleware::AuthUser,
    models::LibraryTree,
    routes::AppState,
};

/// `GET /library`: 호출자의 라이브러리 트리를 조회합니다.
///
/// 응답: `{ "library": { "id", "name", "created_at", "folders": [{ ..., "decks": [...] }] } }`
pub async fn get_library(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let library: LibraryTree = db::ensure_library(
        &auth.session,
        &auth.user.id,
        &state.default_library_name,
        LIBRARY_TREE_COLUMNS,
    )
    .await?;

    Ok(Json(json!({ "library": library })))
}
