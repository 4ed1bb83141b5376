use serde::{Deserialize, Serialize};

use super::{missing, non_empty, string_or_none, trimmed};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub library_id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct NewFolder<'a> {
    pub library_id: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct FolderChanges<'a> {
    pub name: &'a str,
}

/// `POST /folder` 요청 본문: `{ "id"?: string, "name": string }`
#[derive(Debug, Default, Deserialize)]
pub struct FolderRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub name: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FolderCommand {
    Create { name: String },
    Rename { id: String, name: String },
}

impl FolderRequest {
    pub fn into_command(self) -> Result<FolderCommand, AppError> {
        let name = trimmed(self.name).ok_or_else(|| missing("name"))?;
        Ok(match non_empty(self.id) {
            Some(id) => FolderCommand::Rename { id, name },
            None => FolderCommand::Create { name },
        })
    }
}
