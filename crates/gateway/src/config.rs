//! # Gateway設定・共有状態
//!
//! 環境変数からの設定読み込みとGatewayの共有状態の定義。
//! 設定は起動時に一度だけ読み込み、以降は変更しない。

use std::str::FromStr;

use crate::storage::{MemoryObjectStore, ObjectStore};

/// Gatewayの共有状態。
pub struct GatewayState {
    /// 全ドキュメントを保持するバケット名
    pub bucket: String,
    /// オブジェクトストレージ（S3互換等、トレイトで抽象化）
    pub store: Box<dyn ObjectStore>,
}

/// ストレージバックエンドの種別（`STORAGE_BACKEND`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// S3互換ストレージ
    S3,
    /// プロセス内ストレージ（開発環境用）
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!(
                "STORAGE_BACKENDは s3 または memory である必要があります: {other}"
            )),
        }
    }
}

/// 起動時設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// HTTPのバインドアドレス
    pub listen_addr: String,
    /// 全ドキュメントを保持するバケット名
    pub bucket: String,
    pub backend: StorageBackend,
}

impl GatewayConfig {
    /// 環境変数から構築する。
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 変数名から値を引く関数で構築する。
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bucket = lookup("DATA_BUCKET")
            .filter(|b| !b.is_empty())
            .ok_or_else(|| anyhow::anyhow!("DATA_BUCKETが設定されていません"))?;
        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let backend = lookup("STORAGE_BACKEND")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::S3);

        Ok(Self {
            listen_addr,
            bucket,
            backend,
        })
    }

    /// 設定されたバックエンドのオブジェクトストレージを構築する。
    pub fn build_store(&self) -> anyhow::Result<Box<dyn ObjectStore>> {
        match self.backend {
            StorageBackend::Memory => {
                tracing::warn!("メモリ上のストレージで起動します（開発環境用、再起動で消えます）");
                Ok(Box::new(MemoryObjectStore::new()))
            }
            #[cfg(feature = "vendor-aws")]
            StorageBackend::S3 => Ok(Box::new(crate::storage::S3ObjectStore::from_env(
                &self.bucket,
            )?)),
            #[cfg(not(feature = "vendor-aws"))]
            StorageBackend::S3 => Err(anyhow::anyhow!(
                "S3バックエンドは vendor-aws フィーチャー無しではビルドされていません"
            )),
        }
    }
}
