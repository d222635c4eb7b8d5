use serenity::gateway::ShardManager;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info,serenity=warn";

/// Installs the global tracing subscriber.
///
/// Log levels come from `RUST_LOG` when set, otherwise `info` for this crate with
/// Serenity's gateway chatter limited to warnings.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Shuts every shard down once the process receives Ctrl-C.
///
/// # Arguments
/// - `shard_manager` - Shard manager of the running bot client
pub async fn shutdown_on_ctrl_c(shard_manager: Arc<ShardManager>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        return;
    }

    tracing::info!("Shutdown signal received, disconnecting from Discord");
    shard_manager.shutdown_all().await;
}
