//! # リクエストルーティング
//!
//! メソッド・キー・ボディから `DocumentRequest` を確定し、対応する
//! ドキュメント操作を1つだけ呼び出して、固定形のレスポンスに整形する。
//!
//! ## ディスパッチ
//! - `GET /{key}` — 取得
//! - `GET /` — 一覧
//! - `POST /{key}` — 書き込み（空ボディは `{}`）
//! - `DELETE /{key}` — 削除
//! - その他のメソッド — 405
//!
//! 全レスポンスにCORSヘッダーを付与する。

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use docstore_types::DocumentRequest;
use serde::Serialize;

use crate::config::GatewayState;
use crate::documents;
use crate::error::ProxyError;

/// リクエストボディの上限（API Gatewayのペイロード上限と同じ10MB）
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// 全レスポンスに付与するCORSヘッダー
const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "OPTIONS,GET,POST,DELETE"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// ステータスとJSONボディからCORSヘッダー付きレスポンスを作る。
pub fn respond<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, CORS_HEADERS, Json(body)).into_response()
}

/// メソッド・キー・生ボディから操作を確定する。バックエンドには触れない。
///
/// 空文字列のキーは「キーなし」として扱う。
pub fn parse_request(
    method: &Method,
    key: Option<String>,
    body: &[u8],
) -> Result<DocumentRequest, ProxyError> {
    let key = key.filter(|k| !k.is_empty());

    match *method {
        Method::GET => Ok(match key {
            Some(key) => DocumentRequest::Get { key },
            None => DocumentRequest::List,
        }),
        Method::POST => {
            let key = key.ok_or(ProxyError::MissingKey("POST"))?;
            let document = if body.is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_slice(body)?
            };
            Ok(DocumentRequest::Put { key, document })
        }
        Method::DELETE => {
            let key = key.ok_or(ProxyError::MissingKey("DELETE"))?;
            Ok(DocumentRequest::Delete { key })
        }
        _ => Err(ProxyError::UnsupportedMethod),
    }
}

/// 操作を実行し、レスポンスボディとなるJSONを返す。
pub async fn dispatch(
    state: &GatewayState,
    request: DocumentRequest,
) -> Result<serde_json::Value, ProxyError> {
    let store = state.store.as_ref();
    let bucket = state.bucket.as_str();

    match request {
        DocumentRequest::List => Ok(serde_json::to_value(
            documents::list_documents(store, bucket).await?,
        )?),
        DocumentRequest::Get { key } => documents::get_document(store, bucket, &key).await,
        DocumentRequest::Put { key, document } => Ok(serde_json::to_value(
            documents::put_document(store, bucket, &key, &document).await?,
        )?),
        DocumentRequest::Delete { key } => Ok(serde_json::to_value(
            documents::delete_document(store, bucket, &key).await?,
        )?),
    }
}

async fn handle(
    state: &GatewayState,
    method: Method,
    key: Result<Option<String>, ProxyError>,
    body: Result<Bytes, ProxyError>,
) -> Response {
    let log_key = key.as_ref().ok().cloned().flatten().unwrap_or_default();
    tracing::debug!(%method, key = %log_key, "リクエスト受信");

    // 未対応メソッドはキーやボディの内容に関わらず405
    if !matches!(method, Method::GET | Method::POST | Method::DELETE) {
        return ProxyError::UnsupportedMethod.into_response();
    }

    let result = match (key, body) {
        (Ok(key), Ok(body)) => match parse_request(&method, key, &body) {
            Ok(request) => dispatch(state, request).await,
            Err(e) => Err(e),
        },
        (Err(e), _) | (Ok(_), Err(e)) => Err(e),
    };

    match result {
        Ok(value) => respond(StatusCode::OK, &value),
        Err(e) => {
            tracing::error!(%method, key = %log_key, error = %e, "リクエスト処理に失敗");
            e.into_response()
        }
    }
}

/// `/` — キーなしのリクエスト。
pub async fn handle_root(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    handle(&state, method, Ok(None), body.map_err(ProxyError::from)).await
}

/// `/{*key}` — キー付きのリクエスト。キーはスラッシュを含むパスの残り全体。
pub async fn handle_keyed(
    State(state): State<Arc<GatewayState>>,
    method: Method,
    key: Result<Path<String>, PathRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let key = key
        .map(|Path(key)| Some(key))
        .map_err(ProxyError::from);
    handle(&state, method, key, body.map_err(ProxyError::from)).await
}

/// axumルーターを構築する。
///
/// メソッドの振り分けはハンドラ側で行うため、全メソッドを受け付ける。
pub fn build_router(state: Arc<GatewayState>) -> axum::Router {
    router_with_body_limit(state, MAX_BODY_BYTES)
}

fn router_with_body_limit(state: Arc<GatewayState>, max_body_bytes: usize) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::any(handle_root))
        .route("/{*key}", axum::routing::any(handle_keyed))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
