//! Queue watcher binary.
//!
//! Connects to the platform API, loads one workspace's generation
//! queue, and streams queue events to the log until interrupted.

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polymuse_client::{PlatformApi, RemoteApi};
use polymuse_core::filter::GenerationFilters;
use polymuse_events::QueueEvent;
use polymuse_queue::QueueService;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polymuse=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::from_env();
    tracing::info!(
        api_url = %config.api_url,
        workspace_id = %config.workspace_id,
        "Loaded configuration"
    );

    // --- Service ---
    let api = PlatformApi::new(
        config.api_url.clone(),
        config.api_token.clone().unwrap_or_default(),
    );
    let service = QueueService::new(
        Arc::new(api) as Arc<dyn RemoteApi>,
        config.workspace_id.clone(),
        config.poll_interval,
    );
    let mut events = service.subscribe();

    service.mount().await;

    let records = service.visible_list(&GenerationFilters::default()).await;
    let counts = service.counts().await;
    tracing::info!(
        records = records.len(),
        image = counts.image,
        video = counts.video,
        chat = counts.chat,
        "Workspace queue loaded"
    );
    for record in &records {
        tracing::info!(
            id = %record.visible_id,
            model = %record.model_name,
            status = ?record.status,
            credits = record.credits,
            "queued generation"
        );
    }

    // --- Event loop ---
    tracing::info!("Watching queue; press Ctrl-C to exit");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(event) => log_event(&event),
                Err(e) => {
                    tracing::warn!(error = %e, "Event stream lagged or closed");
                    break;
                }
            },
        }
    }

    service.shutdown().await;
    tracing::info!("Shut down cleanly");
    Ok(())
}

fn log_event(event: &QueueEvent) {
    match event {
        QueueEvent::Inserted { ids } => tracing::info!(?ids, "generations inserted"),
        QueueEvent::Updated { ids } => tracing::info!(?ids, "generations updated"),
        QueueEvent::Removed { ids } => tracing::info!(?ids, "generations removed"),
        QueueEvent::CountsChanged { image, video, chat } => {
            tracing::info!(image, video, chat, "counts changed")
        }
        QueueEvent::PollStarted => tracing::debug!("poll loop started"),
        QueueEvent::PollStopped => tracing::debug!("poll loop stopped"),
    }
}
