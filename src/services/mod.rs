//! # 외부 서비스 모듈
//!
//! - `openai`: OpenAI Responses API 클라이언트
//! - `generation`: 카드 생성 프롬프트/스키마/결과 정리

pub mod generation;
pub mod openai;
