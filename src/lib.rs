//! # flashdeck
//!
//! 플래시카드 관리 백엔드입니다. 라이브러리 → 폴더 → 덱 → 카드 계층을
//! 호스팅된 Supabase에 저장하고, OpenAI로 카드 내용을 생성합니다.
//!
//! 서버 진입점은 `main.rs`이며, 라우터와 상태는 통합 테스트에서도 쓰이도록
//! 라이브러리 크레이트로 공개합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use anyhow::Result;

use config::Config;
use db::Database;
use routes::AppState;
use services::openai::OpenAi;

impl AppState {
    /// 설정으로부터 공유 상태를 만듭니다.
    ///
    /// OpenAI 키가 없으면 경고만 남기고 카드 생성 기능 없이 시작합니다.
    pub fn from_config(config: &Config) -> Result<Self> {
        let model = match &config.openai_api_key {
            Some(key) => Some(OpenAi::new(
                config.openai_base_url.clone(),
                key,
                config.openai_model.clone(),
            )?),
            None => {
                tracing::warn!("OPENAI_API_KEY is not set; /api/ai/flashcards will fail");
                None
            }
        };

        Ok(Self {
            database: Database::new(
                config.supabase_url.clone(),
                config.supabase_anon_key.clone(),
            ),
            model,
            default_library_name: config.default_library_name.clone(),
        })
    }
}
