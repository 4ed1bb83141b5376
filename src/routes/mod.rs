//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! 모든 핸들러는 같은 흐름을 따릅니다:
//! 토큰 추출 → 요청 전용 세션 생성 → 사용자 확인 → 본문 검증 → Supabase 호출 1회 → JSON 응답
//!
//! 각 하위 모듈:
//! - `library`: 라이브러리 트리 조회 (없으면 생성)
//! - `folders`: 폴더 생성/이름 변경/삭제
//! - `decks`: 덱 생성/수정/조회/삭제
//! - `flashcards`: 카드 생성(단건/대량)/수정/삭제
//! - `ai`: AI 카드 생성 (토큰 존재만 확인)
//! - `health`: 서버 상태 확인

pub mod ai;
pub mod decks;
pub mod flashcards;
pub mod folders;
pub mod health;
pub mod library;

pub use ai::*;
pub use decks::*;
pub use flashcards::*;
pub use folders::*;
pub use health::*;
pub use library::*;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{db::Database, services::openai::OpenAi};

/// 애플리케이션 공유 상태
///
/// 모든 필드가 읽기 전용입니다. 요청 사이에 공유되는 가변 상태는 없습니다.
/// `database`는 접속 정보만 담고 있고, 실제 세션은 요청마다 새로 만듭니다.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    /// `OPENAI_API_KEY`가 없으면 `None` (카드 생성 API가 500 응답)
    pub model: Option<OpenAi>,
    /// 자동 생성되는 라이브러리의 이름
    pub default_library_name: String,
}

/// `/api` 아래의 모든 라우트를 구성합니다.
///
/// CORS/Trace 레이어는 `main`에서 씌웁니다.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/library", get(get_library))
        .route("/folder", post(save_folder))
        .route("/folder/{id}", delete(delete_folder))
        .route("/deck", post(save_deck))
        .route("/deck/{id}", get(get_deck).delete(delete_deck))
        .route("/flashcard", post(save_flashcard))
        .route("/flashcard/{id}", delete(delete_flashcard))
        .route("/ai/flashcards", post(generate_flashcards))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new().nest("/api", api_routes)
}

/// 삭제 성공 응답: `{ "ok": true, "id": "..." }`
pub(crate) fn deleted(id: String) -> Json<Value> {
    Json(json!({ "ok": true, "id": id }))
}
