//! # テスト用共通ヘルパー
//!
//! メモリ上のストレージを注入した状態の構築と、テスト用HTTPサーバーの起動。

use std::sync::Arc;

use crate::config::GatewayState;
use crate::error::ProxyError;
use crate::router::build_router;
use crate::storage::{MemoryObjectStore, ObjectStore, StoredObject};

/// メモリ上のストレージを持つ状態。
pub fn memory_state() -> Arc<GatewayState> {
    Arc::new(GatewayState {
        bucket: "documents".to_string(),
        store: Box::new(MemoryObjectStore::new()),
    })
}

/// Gatewayを `127.0.0.1` の空きポートで起動し、ポート番号を返す。
pub async fn start_server(state: Arc<GatewayState>) -> u16 {
    serve(build_router(state)).await
}

/// 任意のルーターを `127.0.0.1` の空きポートで起動し、ポート番号を返す。
pub async fn serve(app: axum::Router) -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    port
}

/// 全操作が失敗するモックストレージ。
pub struct FailingStore;

impl FailingStore {
    pub const MESSAGE: &'static str = "Access Denied";
}

#[async_trait::async_trait]
impl ObjectStore for FailingStore {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get_object(&self, _bucket: &str, _key: &str) -> Result<StoredObject, ProxyError> {
        Err(ProxyError::Backend(Self::MESSAGE.to_string()))
    }

    async fn put_object(
        &self,
        _bucket: &str,
        _key: &str,
        _content: &[u8],
        _content_type: &str,
    ) -> Result<(), ProxyError> {
        Err(ProxyError::Backend(Self::MESSAGE.to_string()))
    }

    async fn delete_object(&self, _bucket: &str, _key: &str) -> Result<(), ProxyError> {
        Err(ProxyError::Backend(Self::MESSAGE.to_string()))
    }

    async fn list_keys(&self, _bucket: &str) -> Result<Vec<String>, ProxyError> {
        Err(ProxyError::Backend(Self::MESSAGE.to_string()))
    }
}
