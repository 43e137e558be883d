use std::sync::Arc;

use color_eyre::Result;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tool_catalog::{web, CatalogService, Config, SqliteToolStore};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // 環境変数のロード (.env があれば読む)
    let config = Config::from_env();

    // ログ: 標準出力 + 日次ローテーションのファイル
    let file_appender = rolling::daily(&config.log_dir, "catalog.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // ファイルにANSIカラー不要
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    tracing::info!(target: "tool_catalog", ?config, "starting catalog service");

    let store = SqliteToolStore::open_or_create(&config.db_path)?;
    let service = CatalogService::new(Arc::new(store));
    let app = web::router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let addr = listener.local_addr()?;
    tracing::info!(target: "tool_catalog", "Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
