use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};
use linegen::GeminiClient;
use log::{debug, info, warn};
use rizzroast::message_bus::{MessageBus, UiCommand};
use rizzroast::store::{self, FileStorage};
use rizzroast::RizzRoast;
use tokio::signal;
use utils::{print_err, unwrap_or_def_verbose, ResultExt as _};

mod api;
mod logging;
mod rizzroast;
mod utils;

async fn terminate_on_signal() -> Result<()> {
    let interrupt_signal: Pin<Box<dyn Future<Output = _>>> = Box::pin(async {
        signal::unix::signal(signal::unix::SignalKind::interrupt())
            .context("Failed to register terminate signal handlers!")?
            .recv()
            .await;
        Ok(())
    });
    let terminate_signal = Box::pin(async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to register terminate signal handlers!")?
            .recv()
            .await;
        Ok(())
    });
    futures_util::future::select_all([interrupt_signal, terminate_signal])
        .await
        .0
}

#[tokio::main]
async fn main() {
    let _logger = logging::init().inspect_err(|e| eprintln!("Logging disabled: {e:#}"));
    let config = unwrap_or_def_verbose(store::load_config());
    let gemini_config = config.gemini_config();
    if gemini_config.api_key.is_empty() {
        warn!("No Gemini API key configured, generation will fail.");
    }
    let message_bus = MessageBus::new();
    let rizzroast = RizzRoast::new(
        &config,
        Box::new(FileStorage::new(config.favorites_dir.clone())),
        Arc::new(GeminiClient::new(gemini_config)),
        message_bus.clone(),
    );
    let rizzroast_task = tokio::spawn(rizzroast.dispatch_ui_commands(message_bus.subscribe()));

    tokio::spawn({
        let message_bus = message_bus.clone();
        let config = config.clone();
        async move {
            api::serve(message_bus, config.serving_addr, &config.static_serving_dir)
                .await
                .print_err()
        }
    });

    info!("Running");
    let _ = terminate_on_signal().await.inspect_err(print_err);
    info!("Terminating.");
    message_bus.send(UiCommand::CloseApplication.into());

    debug!("Waiting for workers to stop...");
    let _ = rizzroast_task.await.inspect_err(print_err);
    debug!("All workers stopped.")
}
