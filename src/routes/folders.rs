//! # 폴더(Folder) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/folder`     → `id`가 없으면 생성, 있으면 이름 변경
//! - `DELETE /api/folder/:id` → 폴더 삭제
//!
//! 폴더는 항상 호출자의 라이브러리에 속합니다.
//! 라이브러리가 아직 없으면 폴더 요청 처리 중에 먼저 만들어집니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    db::{self, LIBRARY_COLUMNS},
    error::AppError,
    middleware::{AuthUser, JsonBody},
    models::*,
    routes::{deleted, AppState},
};

/// `POST /folder`: 폴더를 생성하거나 이름을 바꿉니다.
///
/// 요청 본문: `{ "name": "Japonais" }` (생성) 또는 `{ "id": "...", "name": "Japonais (N5)" }` (이름 변경)
/// 응답: `{ "folder": {...} }`, 생성은 201, 이름 변경은 200
pub async fn save_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(req): JsonBody<FolderRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let command = req.into_command()?;

    // 라이브러리 확보 (없으면 생성)
    let library: Library = db::ensure_library(
        &auth.session,
        &auth.user.id,
        &state.default_library_name,
        LIBRARY_COLUMNS,
    )
    .await?;

    match command {
        FolderCommand::Rename { id, name } => {
            let folder = db::rename_folder(&auth.session, &id, &name)
                .await?
                .ok_or_else(|| AppError::NotFound("Folder not found".to_string()))?;
            Ok((StatusCode::OK, Json(json!({ "folder": folder }))))
        }
        FolderCommand::Create { name } => {
            let folder = db::create_folder(&auth.session, &library.id, &name).await?;
            tracing::debug!(folder_id = %folder.id, library_id = %library.id, "folder created");
            Ok((StatusCode::CREATED, Json(json!({ "folder": folder }))))
        }
    }
}

/// `DELETE /folder/:id`: 폴더를 삭제합니다.
///
/// 응답: `{ "ok": true, "id": "..." }`, 삭제된 행이 없으면 404
pub async fn delete_folder(
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !db::delete_folder(&auth.session, &id).await? {
        return Err(AppError::NotFound("Folder not found".to_string()));
    }
    Ok(deleted(id))
}
