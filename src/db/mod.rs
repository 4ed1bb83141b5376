//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 호스팅된 Supabase와 HTTP로 통신하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! ## 세션(Session)
//! 연결 풀은 없습니다. 요청마다 [`Database::session`]으로 새 `Session`을 만들며,
//! 세션은 호출자의 bearer 토큰을 모든 요청에 붙이는 전용 HTTP 클라이언트입니다.
//! 행 단위 권한(RLS)은 Supabase가 이 토큰으로 판단합니다.
//!
//! 각 하위 모듈:
//! - `users`: 토큰으로 사용자 확인 (GoTrue `/auth/v1/user`)
//! - `libraries`: 라이브러리 조회/자동 생성
//! - `folders`, `decks`, `flashcards`: 테이블별 CRUD

pub mod decks;
pub mod flashcards;
pub mod folders;
pub mod libraries;
pub mod users;

pub use decks::*;
pub use flashcards::*;
pub use folders::*;
pub use libraries::*;
pub use users::*;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// PostgreSQL `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Supabase 호출에서 발생하는 에러
#[derive(Debug, Error)]
pub enum DbError {
    /// 토큰에 헤더로 쓸 수 없는 문자가 들어 있음
    #[error("invalid bearer token")]
    InvalidToken,

    /// 설정된 anon 키에 헤더로 쓸 수 없는 문자가 들어 있음
    #[error("invalid Supabase API key")]
    InvalidApiKey,

    /// 네트워크 실패, 응답 본문 파싱 실패 등
    #[error("Supabase request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Supabase가 에러 상태 코드를 돌려줌. 메시지는 업스트림 그대로입니다.
    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// 한 행을 기대했는데 여러 행이 돌아옴
    #[error("JSON object requested, multiple (or no) rows returned")]
    UnexpectedRows(usize),
}

impl DbError {
    /// 유니크 제약 위반(SQLSTATE 23505)인지 확인합니다.
    ///
    /// PostgREST는 외래키 위반(23503)도 409로 돌려주므로 상태 코드만으로는
    /// 판단하지 않습니다. 코드가 없는 409만 유니크 위반으로 봅니다.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::Api { status, code, .. } => match code.as_deref() {
                Some(code) => code == UNIQUE_VIOLATION,
                None => *status == 409,
            },
            _ => false,
        }
    }
}

/// Supabase 프로젝트 접속 정보
///
/// 상태(연결, 캐시)를 갖지 않으며, 요청마다 세션을 만들어 주는 팩토리 역할만 합니다.
#[derive(Debug, Clone)]
pub struct Database {
    base_url: String,
    anon_key: String,
}

impl Database {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// 토큰에 묶인 요청 전용 세션을 만듭니다.
    ///
    /// 모든 요청에 `apikey`와 `Authorization: Bearer <token>` 헤더가 붙습니다.
    /// 세션 저장이나 토큰 갱신은 하지 않고, 유휴 연결도 보관하지 않습니다.
    pub fn session(&self, token: &str) -> Result<Session, DbError> {
        let mut headers = HeaderMap::new();

        let mut api_key =
            HeaderValue::from_str(&self.anon_key).map_err(|_| DbError::InvalidApiKey)?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| DbError::InvalidToken)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Session {
            http,
            rest_url: format!("{}/rest/v1", self.base_url),
            auth_url: format!("{}/auth/v1", self.base_url),
        })
    }
}

/// 요청 하나 동안만 사용하는 Supabase 클라이언트
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    rest_url: String,
    auth_url: String,
}

impl Session {
    fn table(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// `SELECT`: `params`는 PostgREST 쿼리 파라미터입니다 (`select`, 필터, `order`).
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, DbError> {
        rows(self.http.get(self.table(table)).query(params)).await
    }

    /// `INSERT ... RETURNING columns`
    ///
    /// `body`가 배열이면 한 번의 호출로 여러 행을 삽입합니다.
    pub async fn insert<B, T>(&self, table: &str, body: &B, columns: &str) -> Result<Vec<T>, DbError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.table(table))
            .query(&[("select", columns)])
            .header("Prefer", "return=representation")
            .json(body);
        rows(request).await
    }

    /// `UPDATE ... WHERE id = ? RETURNING columns`. 일치하는 행이 없으면 빈 Vec.
    pub async fn update<B, T>(
        &self,
        table: &str,
        id: &str,
        body: &B,
        columns: &str,
    ) -> Result<Vec<T>, DbError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .http
            .patch(self.table(table))
            .query(&[("id", eq(id)), ("select", columns.to_string())])
            .header("Prefer", "return=representation")
            .json(body);
        rows(request).await
    }

    /// `DELETE ... WHERE id = ? RETURNING id`. 삭제된 행이 있으면 `true`.
    pub async fn delete(&self, table: &str, id: &str) -> Result<bool, DbError> {
        let request = self
            .http
            .delete(self.table(table))
            .query(&[("id", eq(id)), ("select", "id".to_string())])
            .header("Prefer", "return=representation");
        let deleted: Vec<Value> = rows(request).await?;
        Ok(!deleted.is_empty())
    }
}

/// PostgREST `eq` 필터 값
pub(crate) fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// 정확히 한 행 (INSERT 결과 등)
pub(crate) fn single<T>(rows: Vec<T>) -> Result<T, DbError> {
    match maybe_single(rows)? {
        Some(row) => Ok(row),
        None => Err(DbError::UnexpectedRows(0)),
    }
}

/// 0행이면 `None`, 1행이면 `Some`, 그 이상이면 에러
pub(crate) fn maybe_single<T>(mut rows: Vec<T>) -> Result<Option<T>, DbError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        n => Err(DbError::UnexpectedRows(n)),
    }
}

async fn rows<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>, DbError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json().await?)
}

/// PostgREST(`{code, message}`)와 GoTrue(`{code, msg}` / `{error_description}`)
/// 에러 본문을 모두 받아들입니다.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<Value>,
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

pub(crate) async fn api_error(response: Response) -> DbError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();

    let code = body.code.map(|code| match code {
        Value::String(s) => s,
        other => other.to_string(),
    });
    let message = body
        .message
        .or(body.msg)
        .or(body.error_description)
        .or(body.error)
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.to_string()
            } else {
                text
            }
        });

    DbError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}
