//! # 사용자 확인 (Identity resolver)
//!
//! Supabase Auth(GoTrue)에 토큰 검증을 맡깁니다.
//! 이 서비스는 JWT를 직접 해독하지 않습니다.

use reqwest::StatusCode;

use super::{api_error, DbError, Session};
use crate::models::User;

/// GoTrue가 토큰 자체를 거부했다는 뜻의 상태 코드.
/// 429 같은 나머지 4xx는 일시적 장애로 보고 에러로 돌려줍니다.
fn token_rejected(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::NOT_FOUND
    )
}

impl Session {
    /// `GET /auth/v1/user`: 세션 토큰의 주인을 조회합니다.
    ///
    /// # 반환값
    /// - `Ok(Some(User))`: 유효한 토큰
    /// - `Ok(None)`: Supabase가 토큰을 거부함 (400/401/403/404)
    /// - `Err(DbError)`: 네트워크 실패, 429, 5xx 같은 일시적 장애
    pub async fn current_user(&self) -> Result<Option<User>, DbError> {
        let response = self
            .http
            .get(format!("{}/user", self.auth_url))
            .send()
            .await?;

        let status = response.status();
        if token_rejected(status) {
            tracing::debug!(%status, "token rejected by Supabase Auth");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        Ok(Some(response.json().await?))
    }
}
