use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct NewLibrary<'a> {
    pub user_id: &'a str,
    pub name: &'a str,
}

/// `GET /library` 응답: 라이브러리 + 폴더 + 폴더별 덱 요약
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryTree {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub folders: Vec<FolderTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderTree {
    pub id: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub decks: Vec<DeckSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub objective: Option<String>,
    pub created_at: String,
}
