use crate::infrastructure::queue::rabbitmq::{self, RabbitMqService};
use crate::modules::video::dto::ProcessVideoRequest;
use crate::modules::video::service::VideoService;
use anyhow::Result;
use futures_util::StreamExt;
use std::time::Duration;
use tracing::{error, info, warn};

const CONSUMER_TAG: &str = "video_processing_worker";
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Consume `{ "fileName": ... }` messages and process them one at a time.
///
/// Every message is acked once handled, whether or not processing
/// succeeded. Nothing is retried.
pub async fn start_video_worker(queue: RabbitMqService, videos: VideoService, queue_name: String) {
    info!("🎥 Starting video queue worker...");

    loop {
        if let Err(e) = consume(&queue, &videos, &queue_name).await {
            error!("Video queue consumer failed: {}", e);
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
        if let Err(e) = queue.reconnect().await {
            error!("RabbitMQ reconnect failed: {}", e);
        }
    }
}

async fn consume(queue: &RabbitMqService, videos: &VideoService, queue_name: &str) -> Result<()> {
    let mut consumer = queue.consume(queue_name, CONSUMER_TAG).await?;
    info!("🎥 Video queue worker listening on '{}'", queue_name);

    while let Some(delivery) = consumer.next().await {
        let delivery = delivery?;
        handle_delivery(videos, &delivery.data).await;
        rabbitmq::ack(&delivery).await?;
    }

    warn!("Consumer stream for '{}' ended", queue_name);
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Processed,
    Failed,
    Dropped,
}

/// Never fails: the caller acks the message whatever happens here.
async fn handle_delivery(videos: &VideoService, payload: &[u8]) -> Outcome {
    info!("📦 Received video processing message");

    let file_name = match parse_message(payload) {
        Ok(file_name) => file_name,
        Err(e) => {
            error!("❌ Dropping message: {}", e);
            return Outcome::Dropped;
        }
    };

    match videos.process(&file_name).await {
        Ok(video) => {
            info!("✅ Processed {} -> {}", video.file_name, video.processed_file_name);
            Outcome::Processed
        }
        Err(e) => {
            error!("❌ Failed to process {}: {}", file_name, e);
            Outcome::Failed
        }
    }
}

fn parse_message(payload: &[u8]) -> Result<String> {
    let request: ProcessVideoRequest = serde_json::from_slice(payload)?;
    Ok(request.into_file_name()?)
}
