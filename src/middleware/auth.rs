//! # 인증 추출기 (Authentication Extractor)
//!
//! 핸들러 인자에 `AuthUser`를 선언하면 다음 순서로 호출자를 확인합니다:
//! 1. `Authorization: Bearer <token>` 헤더 파싱
//! 2. 토큰에 묶인 Supabase 세션 생성
//! 3. `GET /auth/v1/user`로 사용자 확인
//!
//! 헤더가 없든, 형식이 틀렸든, Supabase가 거부했든 응답은 똑같은 401입니다.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    db::{DbError, Session},
    error::AppError,
    models::User,
    routes::AppState,
};

/// `Authorization` 헤더 값에서 토큰을 꺼냅니다.
///
/// 값은 공백으로 나뉜 "스킴 토큰" 두 부분이어야 하며,
/// 스킴은 대소문자 구분 없이 `bearer`여야 합니다. 그 밖에는 `None`.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

fn header_token(parts: &Parts) -> Option<&str> {
    bearer_token(
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok()),
    )
}

/// 토큰이 있는지만 확인합니다. 검증은 하지 않습니다 (AI 생성 API 전용).
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_token(parts)
            .map(|token| BearerToken(token.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}

/// Supabase Auth가 받아들인 호출자와, 그 토큰에 묶인 요청 전용 세션
#[derive(Debug)]
pub struct AuthUser {
    pub user: User,
    pub session: Session,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = header_token(parts).ok_or(AppError::Unauthorized)?;

        let session = state.database.session(token).map_err(|e| match e {
            DbError::InvalidToken => AppError::Unauthorized,
            // 설정 문제: SUPABASE_ANON_KEY를 헤더로 쓸 수 없음
            DbError::InvalidApiKey => AppError::Internal(DbError::InvalidApiKey.to_string()),
            other => AppError::Database(other),
        })?;

        let user = session
            .current_user()
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser { user, session })
    }
}
