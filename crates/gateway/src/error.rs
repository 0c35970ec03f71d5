//! # Gateway エラー型
//!
//! ルーティング・JSONパース・ストレージ操作の失敗を閉じた集合で表す。
//! ステータスコードはバリアントから決まり、メッセージ文字列は見ない。

use axum::extract::rejection::{BytesRejection, PathRejection};
use axum::http::StatusCode;
use docstore_types::ErrorResponse;

/// Gatewayエラー型。
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// GET / POST / DELETE 以外のメソッド
    #[error("Method Not Allowed")]
    UnsupportedMethod,
    /// キーが必要な操作でキーが指定されていない
    #[error("Missing key for {0}")]
    MissingKey(&'static str),
    /// パスまたはボディの読み取りに失敗（不正なUTF-8のパス、上限超過のボディ等）
    #[error("{0}")]
    Request(String),
    /// リクエストボディまたは保存済みオブジェクトのJSONパースに失敗
    #[error("{0}")]
    Parse(String),
    /// ストレージバックエンドの操作に失敗（存在しないキーを含む）
    #[error("{0}")]
    Backend(String),
}

impl ProxyError {
    /// レスポンスのステータスコード。
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UnsupportedMethod => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::MissingKey(_)
            | ProxyError::Request(_)
            | ProxyError::Parse(_)
            | ProxyError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(e: serde_json::Error) -> Self {
        ProxyError::Parse(e.to_string())
    }
}

impl From<PathRejection> for ProxyError {
    fn from(e: PathRejection) -> Self {
        ProxyError::Request(e.body_text())
    }
}

impl From<BytesRejection> for ProxyError {
    fn from(e: BytesRejection) -> Self {
        ProxyError::Request(e.body_text())
    }
}

impl axum::response::IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        crate::router::respond(self.status(), &body)
    }
}
