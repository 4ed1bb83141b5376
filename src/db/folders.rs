use super::{maybe_single, single, DbError, Session};
use crate::models::*;

pub const FOLDER_COLUMNS: &str = "id,library_id,name,created_at";

pub async fn create_folder(
    session: &Session,
    library_id: &str,
    name: &str,
) -> Result<Folder, DbError> {
    let rows = session
        .insert("folders", &NewFolder { library_id, name }, FOLDER_COLUMNS)
        .await?;
    single(rows)
}

/// 일치하는 폴더가 없으면 `Ok(None)`
pub async fn rename_folder(
    session: &Session,
    id: &str,
    name: &str,
) -> Result<Option<Folder>, DbError> {
    let rows = session
        .update("folders", id, &FolderChanges { name }, FOLDER_COLUMNS)
        .await?;
    maybe_single(rows)
}

/// 폴더에 속한 덱과 카드는 스키마의 `ON DELETE CASCADE`로 함께 삭제됩니다.
pub async fn delete_folder(session: &Session, id: &str) -> Result<bool, DbError> {
    session.delete("folders", id).await
}
