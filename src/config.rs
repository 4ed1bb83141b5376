//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `SUPABASE_URL`: Supabase 프로젝트 URL (필수)
//! - `SUPABASE_ANON_KEY`: Supabase 공개(anon) API 키 (필수)
//! - `OPENAI_API_KEY`: OpenAI API 키 (없으면 카드 생성 API만 500 응답)
//! - `OPENAI_BASE_URL`: OpenAI API 주소
//! - `OPENAI_MODEL`: 카드 생성에 사용할 모델 이름
//! - `DEFAULT_LIBRARY_NAME`: 자동 생성되는 라이브러리의 이름
//! - `HOST`, `PORT`: 서버 바인딩 주소

use std::env;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LIBRARY_NAME: &str = "Ma bibliothèque";

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 `AppState`를 만드는 데 쓰입니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// Supabase 프로젝트 URL (예: "https://abcd.supabase.co")
    pub supabase_url: String,
    /// 모든 Supabase 호출에 `apikey` 헤더로 붙는 공개 키
    pub supabase_anon_key: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub default_library_name: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `SUPABASE_URL`과 `SUPABASE_ANON_KEY`는 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")?,
            supabase_anon_key: env::var("SUPABASE_ANON_KEY")?,

            // 빈 문자열은 "설정 안 됨"으로 취급합니다.
            openai_api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            default_library_name: env::var("DEFAULT_LIBRARY_NAME")
                .unwrap_or_else(|_| DEFAULT_LIBRARY_NAME.to_string()),

            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000), // 파싱 실패 시 기본값
        })
    }
}
