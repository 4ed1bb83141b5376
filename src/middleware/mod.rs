//! # 요청 추출기(Extractor) 모듈
//!
//! - `auth`: `Authorization: Bearer` 헤더 파싱, 사용자 확인
//! - `json`: 관대한 JSON 본문 파싱

pub mod auth;
pub mod json;

pub use auth::{AuthUser, BearerToken};
pub use json::JsonBody;
