#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::Args;
use clap::Parser;
use dashscribe_config::Config;
use dashscribe_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;

    // CLI flag wins over the config file
    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    let telemetry_guard = dashscribe_telemetry::init(config.telemetry.as_ref(), &args.log_filter)?;

    tracing::info!(
        config_path = args.config.as_ref().map(|path| path.display().to_string()),
        region = config.dashscope.region().as_str(),
        default_model = config.dashscope.default_model.as_deref(),
        trace_export = telemetry_guard.is_exporting(),
        "starting dashscribe"
    );

    let server = Server::new(&config)?;

    server.serve(cancel_on_signal()).await?;

    tracing::info!("dashscribe stopped");
    Ok(())
}

/// Token cancelled on the first `SIGINT` or `SIGTERM`
fn cancel_on_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(signal, "shutdown signal received");
        trigger.cancel();
    });

    token
}

async fn wait_for_signal() -> &'static str {
    let interrupt = async {
        tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
