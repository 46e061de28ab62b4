use anyhow::Context;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod workers;

use config::settings::AppConfig;
use infrastructure::media::ffmpeg::FfmpegTranscoder;
use infrastructure::queue::rabbitmq::RabbitMqService;
use infrastructure::storage::build_storage;
use infrastructure::workdir::WorkDirs;
use modules::video::service::{StepTimeouts, VideoService};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting video processing service...");

    let config = AppConfig::new().context("Invalid configuration")?;

    let dirs = WorkDirs::new(&config.raw_video_dir, &config.processed_video_dir);
    dirs.ensure().context("Failed to create working directories")?;

    let storage = build_storage(&config)
        .await
        .context("Failed to initialise object storage")?;
    info!(backend = ?storage.backend_type(), "Object storage ready");

    let transcoder = Arc::new(FfmpegTranscoder::new(&config.ffmpeg_path));
    let videos = VideoService::new(storage, transcoder, dirs, StepTimeouts::from_config(&config));

    if let Some(url) = &config.amqp_url {
        match RabbitMqService::new(url).await {
            Ok(queue) => {
                tokio::spawn(workers::video_queue::start_video_worker(
                    queue,
                    videos.clone(),
                    config.video_queue_name.clone(),
                ));
            }
            Err(e) => warn!("Queue intake disabled: {}", e),
        }
    }

    let app = app::create_app(AppState::new(videos));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Video processing service started at http://localhost:{}", config.server_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
