//! Request handlers.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{
        FromRequestParts, Path, State,
        rejection::{BytesRejection, PathRejection},
    },
    http::{StatusCode, header, request::Parts},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use url::form_urlencoded;

use crate::error::AppError;
use crate::models::{ErrorResult, LookupOutcome, render_json};
use crate::server::AppState;
use crate::services::INVALID_QUERY_HINT;

const MISSING_QUERY: &str = "Missing query";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Query string of a lookup route: `?query=`, `?q=` or `?value=`, plus `?pretty=`.
///
/// Parsing never rejects. A repeated key keeps its first value and unknown
/// keys are ignored.
#[derive(Debug, Default)]
pub struct LookupParams {
    pub query: Option<String>,
    pub q: Option<String>,
    pub value: Option<String>,
    pub pretty: Option<String>,
}

impl LookupParams {
    pub fn parse(query_string: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query_string.as_bytes()) {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "q" => &mut params.q,
                "value" => &mut params.value,
                "pretty" => &mut params.pretty,
                _ => continue,
            };
            slot.get_or_insert_with(|| value.into_owned());
        }
        params
    }

    /// `1`, `true` or `True`.
    pub fn pretty(&self) -> bool {
        matches!(self.pretty.as_deref(), Some("1" | "true" | "True"))
    }

    fn raw(&self) -> Option<&str> {
        [&self.query, &self.q, &self.value]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for LookupParams {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query().unwrap_or_default()))
    }
}

/// JSON body form of a lookup: `{"query"|"number"|"value": ...}`.
#[derive(Debug, Default, Deserialize)]
pub struct LookupBody {
    pub query: Option<Value>,
    pub number: Option<Value>,
    pub value: Option<Value>,
}

impl LookupBody {
    fn raw(&self) -> Option<String> {
        [&self.query, &self.number, &self.value]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}

/// Landing page.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    let sample = "/api/lookup?query=923323312487&pretty=1";
    Html(format!(
        "<h2>Pakistan Number/CNIC Info API - Live Mode</h2>\
         <p>Mode: LIVE | {notice}</p>\
         <p>Use GET or POST:</p>\
         <ul>\
         <li>GET /api/lookup?query=&lt;value&gt;&amp;pretty=1 - example: <a href='{sample}'>{sample}</a></li>\
         <li>GET /api/lookup/&lt;value&gt; - example: /api/lookup/923323312487</li>\
         <li>POST /api/lookup with JSON <code>{{\"query\":\"923...\"}}</code></li>\
         </ul>",
        notice = state.pipeline.attribution(),
    ))
}

/// Liveness probe.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = json!({
        "status": "ok",
        "allow_upstream": true,
        "copyright": state.pipeline.attribution(),
    });
    json_response(StatusCode::OK, &body, false)
}

/// `GET /api/lookup?query=...`
pub async fn lookup_query(State(state): State<AppState>, params: LookupParams) -> Response {
    let pretty = params.pretty();
    match params.raw() {
        Some(raw) => run_lookup(&state, raw, pretty).await,
        None => missing_query(&state, "Use ?query=<mobile or cnic>", pretty),
    }
}

/// `GET /api/lookup/{value}`
pub async fn lookup_path(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    params: LookupParams,
) -> Response {
    let pretty = params.pretty();
    match path {
        Ok(Path(raw)) => run_lookup(&state, &raw, pretty).await,
        Err(rejection) => {
            log::debug!("Undecodable path value: {}", rejection.body_text());
            let error = AppError::invalid_query(INVALID_QUERY_HINT);
            let body = ErrorResult::from_error(&error, state.pipeline.attribution());
            json_response(StatusCode::BAD_REQUEST, &body, pretty)
        }
    }
}

/// `POST /api/lookup` with a JSON body; the content type is not checked.
pub async fn lookup_body(
    State(state): State<AppState>,
    params: LookupParams,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let pretty = params.pretty();
    let raw = body
        .ok()
        .and_then(|body| serde_json::from_slice::<LookupBody>(&body).ok())
        .and_then(|body| body.raw());
    match raw {
        Some(raw) => run_lookup(&state, &raw, pretty).await,
        None => missing_query(&state, "Send JSON {\"query\":\"...\"}", pretty),
    }
}

/// Any route not listed above.
pub async fn not_found(State(state): State<AppState>) -> Response {
    let error = ErrorResult::client(
        "Not found",
        "Use /api/lookup?query=<mobile or cnic>",
        state.pipeline.attribution(),
    );
    json_response(StatusCode::NOT_FOUND, &error, false)
}

async fn run_lookup(state: &AppState, raw: &str, pretty: bool) -> Response {
    let outcome = state.pipeline.lookup(raw).await;
    let status = match &outcome {
        LookupOutcome::Found(_) => StatusCode::OK,
        failed if failed.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    json_response(status, &outcome, pretty)
}

fn missing_query(state: &AppState, detail: &str, pretty: bool) -> Response {
    let error = ErrorResult::client(MISSING_QUERY, detail, state.pipeline.attribution());
    json_response(StatusCode::BAD_REQUEST, &error, pretty)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T, pretty: bool) -> Response {
    match render_json(body, pretty) {
        Ok(text) => (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], text).into_response(),
        Err(e) => {
            log::error!("Failed to render response: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
