//! # 사용자 모델

use serde::{Deserialize, Serialize};

/// `GET /auth/v1/user`가 돌려주는 사용자.
/// 이 서비스가 읽는 필드만 두고 나머지 GoTrue 응답은 무시합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}
