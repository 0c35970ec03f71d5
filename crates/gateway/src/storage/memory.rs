//! # プロセス内オブジェクトストレージ
//!
//! S3と同じ振る舞い（上書き、冪等な削除、辞書順の一覧）を持つ
//! メモリ上の実装。開発環境（`STORAGE_BACKEND=memory`）とテストで使用する。
//! プロセス終了で内容は失われる。

use std::collections::{BTreeMap, HashMap};

use tokio::sync::RwLock;

use super::{ObjectStore, StoredObject, NO_SUCH_KEY_MESSAGE};
use crate::error::ProxyError;

/// 1ページで返す最大キー数（S3の `ListObjectsV2` 既定値と同じ）
pub const LIST_PAGE_SIZE: usize = 1000;

struct Entry {
    content: Vec<u8>,
    content_type: String,
}

/// メモリ上のオブジェクトストレージ。
///
/// バケットごとにキーを `BTreeMap` で保持するため、一覧はS3と同じく辞書順になる。
#[derive(Default)]
pub struct MemoryObjectStore {
    buckets: RwLock<HashMap<String, BTreeMap<String, Entry>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, ProxyError> {
        let buckets = self.buckets.read().await;
        let entry = buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .ok_or_else(|| ProxyError::Backend(NO_SUCH_KEY_MESSAGE.to_string()))?;

        Ok(StoredObject {
            content: entry.content.clone(),
            content_type: Some(entry.content_type.clone()),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), ProxyError> {
        let mut buckets = self.buckets.write().await;
        buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            Entry {
                content: content.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ProxyError> {
        let mut buckets = self.buckets.write().await;
        if let Some(objects) = buckets.get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }

    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, ProxyError> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .get(bucket)
            .map(|objects| objects.keys().take(LIST_PAGE_SIZE).cloned().collect())
            .unwrap_or_default())
    }
}
