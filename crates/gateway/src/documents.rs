//! # ドキュメント操作
//!
//! 取得・書き込み・削除・一覧の4操作。いずれもバックエンドを1回だけ呼び出し、
//! JSONのエンコード/デコードのみを担う。

use docstore_types::{FileList, MessageResponse, JSON_CONTENT_TYPE};

use crate::error::ProxyError;
use crate::storage::ObjectStore;

/// キーのドキュメントを取得し、JSONとしてパースして返す。
pub async fn get_document(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<serde_json::Value, ProxyError> {
    let object = store.get_object(bucket, key).await?;
    tracing::debug!(key, content_type = ?object.content_type, "オブジェクトを取得");

    let text = String::from_utf8(object.content)
        .map_err(|e| ProxyError::Parse(format!("UTF-8として読めません: {e}")))?;
    Ok(serde_json::from_str(&text)?)
}

/// ドキュメントをJSON文字列としてキーに書き込む。既存のオブジェクトは上書き。
pub async fn put_document(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    document: &serde_json::Value,
) -> Result<MessageResponse, ProxyError> {
    let body = serde_json::to_vec(document)?;
    store
        .put_object(bucket, key, &body, JSON_CONTENT_TYPE)
        .await?;
    Ok(MessageResponse::stored(key))
}

/// キーのオブジェクトを削除する。存在しないキーも成功扱い。
pub async fn delete_document(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<MessageResponse, ProxyError> {
    store.delete_object(bucket, key).await?;
    Ok(MessageResponse::deleted(key))
}

/// バケット内のキーを1ページ分列挙する。キー名が空のエントリは除く。
pub async fn list_documents(
    store: &dyn ObjectStore,
    bucket: &str,
) -> Result<FileList, ProxyError> {
    let files = store
        .list_keys(bucket)
        .await?
        .into_iter()
        .filter(|key| !key.is_empty())
        .collect();
    Ok(FileList { files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryObjectStore, NO_SUCH_KEY_MESSAGE};
    use serde_json::json;

    const BUCKET: &str = "documents";

    #[tokio::test]
    async fn test_roundtrip_any_json_value() {
        let store = MemoryObjectStore::new();
        let values = [
            json!({"name": "widget", "tags": ["a", "b"], "nested": {"n": 1}}),
            json!([1, "two", null, false]),
            json!("plain string"),
            json!(42.5),
            json!(true),
            json!(null),
        ];

        for (i, value) in values.iter().enumerate() {
            let key = format!("values/{i}");
            put_document(&store, BUCKET, &key, value).await.unwrap();
            let read = get_document(&store, BUCKET, &key).await.unwrap();
            assert_eq!(&read, value, "key={key}");
        }
    }

    #[tokio::test]
    async fn test_put_stores_json_text_with_content_type() {
        let store = MemoryObjectStore::new();
        let message = put_document(&store, BUCKET, "items/42", &json!({"name": "widget"}))
            .await
            .unwrap();
        assert_eq!(message.message, "Data stored at items/42");

        let object = store.get_object(BUCKET, "items/42").await.unwrap();
        assert_eq!(object.content, br#"{"name":"widget"}"#);
        assert_eq!(object.content_type.as_deref(), Some(JSON_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_get_missing_key_fails() {
        let store = MemoryObjectStore::new();
        let err = get_document(&store, BUCKET, "missing").await.unwrap_err();
        assert!(matches!(err, ProxyError::Backend(_)));
        assert_eq!(err.to_string(), NO_SUCH_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn test_get_rejects_non_json_object() {
        let store = MemoryObjectStore::new();
        store
            .put_object(BUCKET, "raw.txt", b"hello world", "text/plain")
            .await
            .unwrap();
        store
            .put_object(BUCKET, "binary", &[0xff, 0xfe, 0x00], "application/octet-stream")
            .await
            .unwrap();

        assert!(matches!(
            get_document(&store, BUCKET, "raw.txt").await,
            Err(ProxyError::Parse(_))
        ));
        assert!(matches!(
            get_document(&store, BUCKET, "binary").await,
            Err(ProxyError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_never_written_key_succeeds() {
        let store = MemoryObjectStore::new();
        let message = delete_document(&store, BUCKET, "ghost").await.unwrap();
        assert_eq!(message.message, "Deleted ghost");
    }

    #[tokio::test]
    async fn test_list_tracks_writes_and_deletes() {
        let store = MemoryObjectStore::new();
        for key in ["a", "b", "c"] {
            put_document(&store, BUCKET, key, &json!({})).await.unwrap();
        }
        delete_document(&store, BUCKET, "b").await.unwrap();

        let list = list_documents(&store, BUCKET).await.unwrap();
        assert_eq!(list.files, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_list_skips_empty_key_names() {
        let store = MemoryObjectStore::new();
        store.put_object(BUCKET, "", b"{}", JSON_CONTENT_TYPE).await.unwrap();
        store.put_object(BUCKET, "k", b"{}", JSON_CONTENT_TYPE).await.unwrap();

        let list = list_documents(&store, BUCKET).await.unwrap();
        assert_eq!(list.files, vec!["k"]);
    }
}
