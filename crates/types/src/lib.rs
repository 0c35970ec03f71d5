//! # docstore 共有型定義
//!
//! HTTPレスポンスのJSONエンベロープと、ルーティング前に確定する
//! リクエスト種別をRustの型として提供する。
//!
//! ## エンベロープ
//! - 一覧: `{"files": [...]}`
//! - 完了通知: `{"message": "..."}`
//! - エラー: `{"error": "..."}`

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// レスポンスボディ
// ---------------------------------------------------------------------------

/// `GET /`（キーなし）のレスポンス。バケット内のキー一覧。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileList {
    /// バックエンドが返した順序のままのキー（1ページ分のみ）
    pub files: Vec<String>,
}

/// POST / DELETE 成功時のレスポンス。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// POST成功時のメッセージ（`Data stored at <key>`）。
    pub fn stored(key: &str) -> Self {
        Self {
            message: format!("Data stored at {key}"),
        }
    }

    /// DELETE成功時のメッセージ（`Deleted <key>`）。
    pub fn deleted(key: &str) -> Self {
        Self {
            message: format!("Deleted {key}"),
        }
    }
}

/// エラーレスポンス。405/500 共通。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// リクエスト種別
// ---------------------------------------------------------------------------

/// ルーティング境界で確定するドキュメント操作。
///
/// 空文字列のキーを「一覧」の意味に流用せず、キーの有無は
/// バリアントで表現する。
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentRequest {
    /// バケット内の全キーを列挙する
    List,
    /// キーのドキュメントを取得する
    Get { key: String },
    /// キーにドキュメントを書き込む（既存は上書き）
    Put {
        key: String,
        document: serde_json::Value,
    },
    /// キーのオブジェクトを削除する
    Delete { key: String },
}

impl DocumentRequest {
    /// 操作対象のキー。`List` は `None`。
    pub fn key(&self) -> Option<&str> {
        match self {
            DocumentRequest::List => None,
            DocumentRequest::Get { key }
            | DocumentRequest::Put { key, .. }
            | DocumentRequest::Delete { key } => Some(key),
        }
    }
}

/// 保存時に付与するContent-Type
pub const JSON_CONTENT_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// テスト
// ---------------------------------------------------------------------------
