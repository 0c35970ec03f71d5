//! # オブジェクトストレージ
//!
//! ドキュメントを保持するオブジェクトストレージの抽象インターフェース。
//! S3互換ストレージ実装は `s3` サブモジュール、プロセス内実装は
//! `memory` サブモジュールを参照。

pub mod memory;
#[cfg(feature = "vendor-aws")]
pub mod s3;

pub use memory::MemoryObjectStore;
#[cfg(feature = "vendor-aws")]
pub use s3::S3ObjectStore;

use crate::error::ProxyError;

/// 存在しないキーを取得したときのエラーメッセージ（S3の `NoSuchKey` と同文）
pub const NO_SUCH_KEY_MESSAGE: &str = "The specified key does not exist.";

/// 取得したオブジェクト。
pub struct StoredObject {
    /// オブジェクト本体
    pub content: Vec<u8>,
    /// 保存時に付与されたContent-Type（バックエンドが返さない場合はNone）
    pub content_type: Option<String>,
}

/// オブジェクトストレージの抽象インターフェース。
///
/// 各メソッドはバックエンドへの呼び出しを1回だけ行う。リトライはしない。
/// 実装はリクエスト間で共有されるため、業務状態を持たないこと
/// （`MemoryObjectStore` はそれ自体がバックエンド）。
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// ログ用のバックエンド名
    fn name(&self) -> &'static str;

    /// オブジェクトを取得する。存在しない場合は `NO_SUCH_KEY_MESSAGE` のBackendエラー。
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, ProxyError>;

    /// オブジェクトを書き込む。既存のオブジェクトは上書きされる。
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), ProxyError>;

    /// オブジェクトを削除する。存在しないキーでも成功する。
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ProxyError>;

    /// バケット内のキーを1ページ分だけ列挙する（継続トークンは追わない）。
    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, ProxyError>;
}
