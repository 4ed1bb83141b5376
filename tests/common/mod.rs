//! In-process stand-in for Supabase (GoTrue + PostgREST) and the OpenAI
//! Responses API, plus helpers to drive the real router against it.
//!
//! The fake keeps every table in memory, applies `eq.` filters, embeds child
//! tables in `select`, enforces the `libraries.user_id` unique constraint,
//! foreign keys, and per-user row visibility, and records every mutation so
//! tests can assert that rejected requests never reached the database.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use flashdeck::{
    db::Database,
    routes::{self, AppState},
    services::openai::OpenAi,
};

pub const ANON_KEY: &str = "anon-key";
pub const OPENAI_KEY: &str = "sk-test";
pub const ALICE: &str = "alice-token";
pub const BOB: &str = "bob-token";
pub const ALICE_ID: &str = "user-alice";
pub const BOB_ID: &str = "user-bob";

type Row = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub method: &'static str,
    pub table: String,
    pub rows: usize,
}

#[derive(Default)]
pub struct FakeDb {
    pub tables: HashMap<String, Vec<Row>>,
    pub mutations: Vec<Mutation>,
    pub model_requests: Vec<Value>,
    /// Verbatim `output_text` for the next model calls; generated cards when `None`.
    pub model_reply: Option<String>,
    /// Next `GET /libraries` returns no rows, as if another request created
    /// the library between our read and our write.
    pub hide_libraries_once: bool,
    /// `/auth/v1/user` answers with this status instead of resolving the token.
    pub auth_failure: Option<StatusCode>,
}

type Shared = Arc<Mutex<FakeDb>>;

#[derive(Clone)]
pub struct Upstream {
    pub url: String,
    pub db: Shared,
}

impl Upstream {
    pub async fn start() -> Self {
        let db: Shared = Arc::default();

        let app = Router::new()
            .route("/auth/v1/user", get(auth_user))
            .route(
                "/rest/v1/{table}",
                get(rest_select)
                    .post(rest_insert)
                    .patch(rest_update)
                    .delete(rest_delete),
            )
            .route("/v1/responses", post(model_responses))
            .with_state(db.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake upstream");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake upstream");
        });

        Self {
            url: format!("http://{addr}"),
            db,
        }
    }

    /// The service under test, wired to this upstream.
    pub fn app(&self) -> Router {
        let model = OpenAi::new(format!("{}/v1", self.url), OPENAI_KEY, "gpt-4o-mini")
            .expect("model client");
        routes::router(AppState {
            database: Database::new(self.url.clone(), ANON_KEY),
            model: Some(model),
            default_library_name: "Ma bibliothèque".to_string(),
        })
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.db
            .lock()
            .unwrap()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.db.lock().unwrap().mutations.clone()
    }

    pub fn model_requests(&self) -> Vec<Value> {
        self.db.lock().unwrap().model_requests.clone()
    }

    pub fn set_model_reply(&self, reply: &str) {
        self.db.lock().unwrap().model_reply = Some(reply.to_string());
    }

    pub fn with_db<R>(&self, f: impl FnOnce(&mut FakeDb) -> R) -> R {
        f(&mut self.db.lock().unwrap())
    }

    /// Inserts a row directly (no mutation recorded) and returns its id.
    /// A `created_at` given in `row` is kept.
    pub fn seed(&self, table: &str, row: Value) -> String {
        let mut row = row.as_object().cloned().expect("seed row must be an object");
        let id = uuid::Uuid::now_v7().to_string();
        row.insert("id".into(), json!(id));
        row.entry("created_at").or_insert_with(|| json!(timestamp()));
        self.db
            .lock()
            .unwrap()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
        id
    }
}

/// Sends one request through the router and decodes the JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let authorization = token.map(|t| format!("Bearer {t}"));
    let mut headers = Vec::new();
    if let Some(value) = authorization.as_deref() {
        headers.push(("authorization", value));
    }
    let body = body.map(|b| b.to_string()).unwrap_or_default();
    send_raw(app, method, uri, &headers, &body).await
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    if !body.is_empty() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder.body(Body::from(body.to_string())).expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response")
    };
    (status, json)
}

// ── GoTrue ──

fn caller(headers: &HeaderMap) -> Option<&'static str> {
    if headers.get("apikey")?.to_str().ok()? != ANON_KEY {
        return None;
    }
    match headers.get(AUTHORIZATION)?.to_str().ok()? {
        "Bearer alice-token" => Some(ALICE_ID),
        "Bearer bob-token" => Some(BOB_ID),
        _ => None,
    }
}

async fn auth_user(State(db): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(status) = db.lock().unwrap().auth_failure {
        return (
            status,
            Json(json!({ "code": status.as_u16(), "msg": "auth request failed" })),
        )
            .into_response();
    }
    match caller(&headers) {
        Some(id) => Json(json!({
            "id": id,
            "aud": "authenticated",
            "email": format!("{id}@example.com"),
        }))
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": 401, "error_code": "bad_jwt", "msg": "invalid JWT" })),
        )
            .into_response(),
    }
}

// ── PostgREST ──

fn pg_error(status: StatusCode, code: &str, message: String) -> Response {
    (
        status,
        Json(json!({ "code": code, "details": null, "hint": null, "message": message })),
    )
        .into_response()
}

fn jwt_error() -> Response {
    pg_error(StatusCode::UNAUTHORIZED, "PGRST301", "JWT invalid".to_string())
}

enum Field {
    Column(String),
    Embed(String, Vec<Field>),
}

fn split_top_level(select: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for ch in select.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    parts.push(current);
    parts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn parse_select(select: &str) -> Vec<Field> {
    split_top_level(select)
        .into_iter()
        .map(|part| match part.find('(') {
            Some(open) => Field::Embed(
                part[..open].to_string(),
                parse_select(&part[open + 1..part.len() - 1]),
            ),
            None => Field::Column(part),
        })
        .collect()
}

fn foreign_key(parent: &str) -> &'static str {
    match parent {
        "libraries" => "library_id",
        "folders" => "folder_id",
        "decks" => "deck_id",
        _ => "parent_id",
    }
}

fn parent_of(table: &str) -> Option<(&'static str, &'static str)> {
    match table {
        "folders" => Some(("libraries", "library_id")),
        "decks" => Some(("folders", "folder_id")),
        "flashcards" => Some(("decks", "deck_id")),
        _ => None,
    }
}

fn find<'a>(db: &'a FakeDb, table: &str, id: &Value) -> Option<&'a Row> {
    db.tables.get(table)?.iter().find(|r| r.get("id") == Some(id))
}

/// Row-level security: a row is visible when it belongs to the caller's library.
fn visible(db: &FakeDb, table: &str, row: &Row, user: &str) -> bool {
    match parent_of(table) {
        None => row.get("user_id").and_then(Value::as_str) == Some(user),
        Some((parent, fk)) => row
            .get(fk)
            .and_then(|id| find(db, parent, id))
            .is_some_and(|p| visible(db, parent, p, user)),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Fixed-width UTC timestamp, so string order is time order.
fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

fn matches_filters(row: &Row, params: &[(String, String)]) -> bool {
    params
        .iter()
        .filter(|(k, _)| k != "select" && k != "order" && !k.contains('.'))
        .all(|(k, v)| match v.strip_prefix("eq.") {
            Some(wanted) => row.get(k).map(value_text).as_deref() == Some(wanted),
            None => true,
        })
}

fn embeds<'a>(fields: &'a [Field], name: &str) -> Option<&'a [Field]> {
    fields.iter().find_map(|f| match f {
        Field::Embed(child, sub) if child == name => Some(sub.as_slice()),
        _ => None,
    })
}

/// Dotted params (`folders.order`, `folders.decks.order`) must name an
/// embed present in `select`; PostgREST answers PGRST108 otherwise.
fn check_embed_params(fields: &[Field], params: &[(String, String)]) -> Result<(), Response> {
    for (key, _) in params.iter().filter(|(k, _)| k.contains('.')) {
        let path: Vec<&str> = key.split('.').collect();
        let mut level = fields;
        for name in &path[..path.len() - 1] {
            match embeds(level, name) {
                Some(sub) => level = sub,
                None => {
                    return Err(pg_error(
                        StatusCode::BAD_REQUEST,
                        "PGRST108",
                        format!("'{name}' is not an embedded resource in this request"),
                    ))
                }
            }
        }
    }
    Ok(())
}

/// Applies an `order` value such as `created_at.asc` or `name.desc`.
fn sort_rows(rows: &mut [&Row], order: Option<&str>) {
    let Some(order) = order else {
        return;
    };
    let (column, direction) = order.split_once('.').unwrap_or((order, "asc"));
    rows.sort_by(|a, b| {
        let a = a.get(column).map(value_text).unwrap_or_default();
        let b = b.get(column).map(value_text).unwrap_or_default();
        if direction == "desc" {
            b.cmp(&a)
        } else {
            a.cmp(&b)
        }
    });
}

struct Projection<'a> {
    db: &'a FakeDb,
    params: &'a [(String, String)],
    user: &'a str,
}

impl Projection<'_> {
    fn row(&self, table: &str, path: &str, row: &Row, fields: &[Field]) -> Value {
        let mut out = Map::new();
        for field in fields {
            match field {
                Field::Column(c) if c == "*" => out.extend(row.clone()),
                Field::Column(c) => {
                    out.insert(c.clone(), row.get(c).cloned().unwrap_or(Value::Null));
                }
                Field::Embed(child, sub) => {
                    let child_path = if path.is_empty() {
                        child.clone()
                    } else {
                        format!("{path}.{child}")
                    };
                    let fk = foreign_key(table);
                    let mut children: Vec<&Row> = self
                        .db
                        .tables
                        .get(child)
                        .map(|rows| {
                            rows.iter()
                                .filter(|r| r.get(fk) == row.get("id"))
                                .filter(|r| visible(self.db, child, r, self.user))
                                .collect()
                        })
                        .unwrap_or_default();
                    sort_rows(&mut children, param(self.params, &format!("{child_path}.order")));
                    let children = children
                        .into_iter()
                        .map(|r| self.row(child, &child_path, r, sub))
                        .collect();
                    out.insert(child.clone(), Value::Array(children));
                }
            }
        }
        Value::Object(out)
    }
}

fn returning(
    db: &FakeDb,
    table: &str,
    rows: &[Row],
    params: &[(String, String)],
    user: &str,
) -> Result<Value, Response> {
    let fields = parse_select(param(params, "select").unwrap_or("*"));
    check_embed_params(&fields, params)?;

    let mut rows: Vec<&Row> = rows.iter().collect();
    sort_rows(&mut rows, param(params, "order"));

    let projection = Projection { db, params, user };
    Ok(Value::Array(
        rows.into_iter()
            .map(|r| projection.row(table, "", r, &fields))
            .collect(),
    ))
}

/// Rejects a write up front when its `select` would fail, as PostgREST
/// runs the write and the representation in one transaction.
fn check_select(params: &[(String, String)]) -> Result<(), Response> {
    check_embed_params(&parse_select(param(params, "select").unwrap_or("*")), params)
}

fn respond(status: StatusCode, body: Result<Value, Response>) -> Response {
    match body {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error,
    }
}

async fn rest_select(
    State(db): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(user) = caller(&headers) else {
        return jwt_error();
    };
    let mut db = db.lock().unwrap();
    if table == "libraries" && db.hide_libraries_once {
        db.hide_libraries_once = false;
        return Json(json!([])).into_response();
    }
    let rows: Vec<Row> = db
        .tables
        .get(&table)
        .map(|rows| {
            rows.iter()
                .filter(|r| matches_filters(r, &params))
                .filter(|r| visible(&db, &table, r, user))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    respond(StatusCode::OK, returning(&db, &table, &rows, &params, user))
}

fn check_new_row(db: &FakeDb, table: &str, row: &Row, user: &str) -> Result<(), Response> {
    if table == "libraries" {
        let taken = db
            .tables
            .get("libraries")
            .is_some_and(|rows| rows.iter().any(|r| r.get("user_id") == row.get("user_id")));
        if taken {
            return Err(pg_error(
                StatusCode::CONFLICT,
                "23505",
                "duplicate key value violates unique constraint \"libraries_user_id_key\"".into(),
            ));
        }
    }
    if let Some((parent, fk)) = parent_of(table) {
        let parent_row = row.get(fk).and_then(|id| find(db, parent, id));
        match parent_row {
            None => {
                return Err(pg_error(
                    StatusCode::CONFLICT,
                    "23503",
                    format!("insert or update on table \"{table}\" violates foreign key constraint \"{table}_{fk}_fkey\""),
                ))
            }
            Some(p) if !visible(db, parent, p, user) => {
                return Err(pg_error(
                    StatusCode::FORBIDDEN,
                    "42501",
                    format!("new row violates row-level security policy for table \"{table}\""),
                ))
            }
            Some(_) => {}
        }
    }
    if !visible(db, table, row, user) && parent_of(table).is_none() {
        return Err(pg_error(
            StatusCode::FORBIDDEN,
            "42501",
            format!("new row violates row-level security policy for table \"{table}\""),
        ));
    }
    Ok(())
}

async fn rest_insert(
    State(db): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let Some(user) = caller(&headers) else {
        return jwt_error();
    };
    if let Err(error) = check_select(&params) {
        return error;
    }
    let body: Value = serde_json::from_slice(&body).expect("insert body");
    let items = match body {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut db = db.lock().unwrap();
    let mut created = Vec::new();
    for item in items {
        let mut row = item.as_object().cloned().unwrap_or_default();
        if let Err(response) = check_new_row(&db, &table, &row, user) {
            return response;
        }
        row.insert("id".into(), json!(uuid::Uuid::now_v7().to_string()));
        row.insert("created_at".into(), json!(timestamp()));
        if table == "flashcards" && row.get("status").map_or(true, Value::is_null) {
            row.insert("status".into(), json!("new"));
        }
        created.push(row);
    }

    db.tables
        .entry(table.clone())
        .or_default()
        .extend(created.iter().cloned());
    db.mutations.push(Mutation {
        method: "POST",
        table: table.clone(),
        rows: created.len(),
    });

    respond(
        StatusCode::CREATED,
        returning(&db, &table, &created, &params, user),
    )
}

async fn rest_update(
    State(db): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let Some(user) = caller(&headers) else {
        return jwt_error();
    };
    if let Err(error) = check_select(&params) {
        return error;
    }
    let changes: Row = serde_json::from_slice(&body).expect("update body");

    let mut db = db.lock().unwrap();
    let targets: Vec<usize> = db
        .tables
        .get(&table)
        .map(|rows| {
            rows.iter()
                .enumerate()
                .filter(|(_, r)| matches_filters(r, &params) && visible(&db, &table, r, user))
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default();

    let mut updated = Vec::new();
    if let Some(rows) = db.tables.get_mut(&table) {
        for i in targets {
            rows[i].extend(changes.clone());
            updated.push(rows[i].clone());
        }
    }
    db.mutations.push(Mutation {
        method: "PATCH",
        table: table.clone(),
        rows: updated.len(),
    });

    respond(StatusCode::OK, returning(&db, &table, &updated, &params, user))
}

async fn rest_delete(
    State(db): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(user) = caller(&headers) else {
        return jwt_error();
    };
    if let Err(error) = check_select(&params) {
        return error;
    }
    let mut db = db.lock().unwrap();
    let rows = db.tables.remove(&table).unwrap_or_default();
    let (removed, kept): (Vec<Row>, Vec<Row>) = rows
        .into_iter()
        .partition(|r| matches_filters(r, &params) && visible(&db, &table, r, user));
    db.tables.insert(table.clone(), kept);
    db.mutations.push(Mutation {
        method: "DELETE",
        table: table.clone(),
        rows: removed.len(),
    });

    respond(StatusCode::OK, returning(&db, &table, &removed, &params, user))
}

// ── OpenAI ──

async fn model_responses(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let expected = format!("Bearer {OPENAI_KEY}");
    if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } })),
        )
            .into_response();
    }

    let mut db = db.lock().unwrap();
    db.model_requests.push(body.clone());

    let text = match &db.model_reply {
        Some(reply) => reply.clone(),
        None => {
            let count = body["text"]["format"]["schema"]["properties"]["cards"]["minItems"]
                .as_u64()
                .unwrap_or(0);
            let cards: Vec<Value> = (1..=count)
                .map(|i| json!({ "front": format!("front\n{i}"), "back": format!("back {i}") }))
                .collect();
            json!({ "cards": cards }).to_string()
        }
    };

    Json(json!({
        "id": "resp_test",
        "object": "response",
        "status": "completed",
        "output": [{
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "output_text", "text": text, "annotations": [] }]
        }]
    }))
    .into_response()
}
