//! # S3互換オブジェクトストレージ実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用するバックエンド。
//! `default-features = false` のため rust-s3 は非2xxをエラーにしない。
//! ステータスコードはここで判定する。

use super::{ObjectStore, StoredObject, NO_SUCH_KEY_MESSAGE};
use crate::error::ProxyError;

/// S3互換ストレージによるオブジェクトストレージ実装。
///
/// 起動時に設定されたバケットのハンドルを1つだけ保持し、全リクエストで共有する。
/// 認証情報の更新はハンドル内で保持される。
pub struct S3ObjectStore {
    bucket: Box<s3::Bucket>,
}

impl S3ObjectStore {
    pub fn new(bucket: Box<s3::Bucket>) -> Self {
        Self { bucket }
    }

    /// 環境変数から構築する。
    ///
    /// - `S3_ENDPOINT`: 指定時はカスタムエンドポイント（パススタイル）
    /// - `S3_REGION`: 未指定時はエンドポイントから検出、それも無ければ `us-east-1`
    /// - `S3_ACCESS_KEY` / `S3_SECRET_KEY`: 未指定時はAWS標準の認証情報チェーン
    pub fn from_env(bucket_name: &str) -> anyhow::Result<Self> {
        let endpoint = std::env::var("S3_ENDPOINT").ok();
        let region_name = std::env::var("S3_REGION").ok().unwrap_or_else(|| {
            endpoint
                .as_deref()
                .and_then(detect_region)
                .unwrap_or_else(|| "us-east-1".to_string())
        });

        let (region, path_style) = match endpoint {
            Some(endpoint) => {
                tracing::info!(s3_endpoint = %endpoint, "カスタムS3エンドポイントを使用");
                (
                    s3::Region::Custom {
                        region: region_name,
                        endpoint,
                    },
                    true,
                )
            }
            None => (
                region_name
                    .parse::<s3::Region>()
                    .map_err(|e| anyhow::anyhow!("S3_REGIONが不正です: {e}"))?,
                false,
            ),
        };

        let access_key = std::env::var("S3_ACCESS_KEY").ok();
        let secret_key = std::env::var("S3_SECRET_KEY").ok();
        let credentials = s3::creds::Credentials::new(
            access_key.as_deref(),
            secret_key.as_deref(),
            None,
            None,
            None,
        )?;

        Ok(Self::new(init_bucket(bucket_name, region, credentials, path_style)?))
    }

    /// 設定済みのバケットハンドル。別名のバケットは扱わない。
    fn bucket(&self, name: &str) -> Result<&s3::Bucket, ProxyError> {
        if self.bucket.name() != name {
            return Err(ProxyError::Backend(format!(
                "バケット {name} は設定されていません（設定: {}）",
                self.bucket.name()
            )));
        }
        Ok(&self.bucket)
    }
}

/// バケットハンドルを組み立てる（ネットワークアクセスは発生しない）。
fn init_bucket(
    name: &str,
    region: s3::Region,
    credentials: s3::creds::Credentials,
    path_style: bool,
) -> anyhow::Result<Box<s3::Bucket>> {
    let bucket = s3::Bucket::new(name, region, credentials)?;
    Ok(if path_style {
        bucket.with_path_style()
    } else {
        bucket
    })
}

/// AWS S3エンドポイント（`s3.REGION.amazonaws.com`）からリージョンを取り出す。
fn detect_region(endpoint: &str) -> Option<String> {
    let start = endpoint.find("s3.")?;
    let rest = &endpoint[start + 3..];
    rest.find(".amazonaws.com").map(|end| rest[..end].to_string())
}

/// S3のエラーレスポンス（XML）から `<Message>` を取り出す。
/// 取り出せない場合はHTTPステータスを含む汎用メッセージ。
fn error_message(status: u16, body: &[u8]) -> String {
    let body = String::from_utf8_lossy(body);
    body.find("<Message>")
        .and_then(|start| {
            let rest = &body[start + "<Message>".len()..];
            rest.find("</Message>").map(|end| rest[..end].to_string())
        })
        .unwrap_or_else(|| format!("S3がエラーを返しました: HTTP {status}"))
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<StoredObject, ProxyError> {
        let response = self
            .bucket(bucket)?
            .get_object(key)
            .await
            .map_err(|e| ProxyError::Backend(e.to_string()))?;

        let status = response.status_code();
        if status == 404 {
            return Err(ProxyError::Backend(NO_SUCH_KEY_MESSAGE.to_string()));
        }
        if !is_success(status) {
            return Err(ProxyError::Backend(error_message(status, response.bytes())));
        }

        Ok(StoredObject {
            content_type: response.headers().get("content-type").cloned(),
            content: response.bytes().to_vec(),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), ProxyError> {
        let response = self
            .bucket(bucket)?
            .put_object_with_content_type(key, content, content_type)
            .await
            .map_err(|e| ProxyError::Backend(e.to_string()))?;

        let status = response.status_code();
        if !is_success(status) {
            return Err(ProxyError::Backend(error_message(status, response.bytes())));
        }
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), ProxyError> {
        let response = self
            .bucket(bucket)?
            .delete_object(key)
            .await
            .map_err(|e| ProxyError::Backend(e.to_string()))?;

        // 存在しないキーでもS3は204を返す
        let status = response.status_code();
        if !is_success(status) {
            return Err(ProxyError::Backend(error_message(status, response.bytes())));
        }
        Ok(())
    }

    async fn list_keys(&self, bucket: &str) -> Result<Vec<String>, ProxyError> {
        // list_page はステータスを見る前にXMLを一覧としてデコードするため、
        // S3のエラーレスポンスはデコード失敗のメッセージとして返る
        let (page, _status) = self
            .bucket(bucket)?
            .list_page(String::new(), None, None, None, None)
            .await
            .map_err(|e| ProxyError::Backend(e.to_string()))?;

        if page.is_truncated {
            tracing::warn!(bucket, "一覧が1ページで打ち切られました");
        }

        Ok(page.contents.into_iter().map(|object| object.key).collect())
    }
}
