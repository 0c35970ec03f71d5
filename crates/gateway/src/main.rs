//! # docstore Gateway
//!
//! 単一バケットのJSONドキュメントをHTTPで読み書きするGateway。
//!
//! ## API エンドポイント
//! - `GET /{key}` — ドキュメント取得
//! - `GET /` — キー一覧（1ページ分）
//! - `POST /{key}` — ドキュメント書き込み
//! - `DELETE /{key}` — ドキュメント削除
//!
//! ## 環境変数
//! - `DATA_BUCKET` — バケット名（必須）
//! - `LISTEN_ADDR` — バインドアドレス（既定 `0.0.0.0:3000`）
//! - `STORAGE_BACKEND` — `s3`（既定）または `memory`
//! - `S3_ENDPOINT` / `S3_REGION` / `S3_ACCESS_KEY` / `S3_SECRET_KEY`

mod config;
mod documents;
mod error;
mod router;
mod storage;

#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use config::{GatewayConfig, GatewayState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = GatewayConfig::from_env()?;
    let store = config.build_store()?;
    tracing::info!(
        backend = store.name(),
        bucket = %config.bucket,
        "ストレージを初期化"
    );

    let state = Arc::new(GatewayState {
        bucket: config.bucket.clone(),
        store,
    });
    let app = router::build_router(state);

    tracing::info!("Gatewayを {} で起動します", config.listen_addr);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
