use {
    kassa_relay::{
        AppState,
        adapters::{kassa_client::KassaClient, relay},
        config::Config,
        services::{
            completion::{AutoCapture, LogSucceeded},
            dispatcher::NotificationDispatcher,
        },
    },
    std::sync::Arc,
    tokio::signal,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");
    let kassa = Arc::new(
        KassaClient::new(config.credentials.clone(), config.client_options())
            .expect("failed to build gateway client"),
    );

    let dispatcher = NotificationDispatcher::new(
        Arc::new(AutoCapture::new(kassa.clone())),
        Arc::new(LogSucceeded),
    );

    let state = AppState {
        kassa,
        dispatcher: Arc::new(dispatcher),
    };

    let app = relay::router(state, config.request_timeout());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind");
    tracing::info!(shop_id = config.credentials.shop_id(), "listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

/// Resolves on ctrl-c or, on unix, SIGTERM. A listener that cannot be
/// installed never fires, so the other one still drains the server.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "ctrl-c listener unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM listener unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let source = tokio::select! {
        () = interrupt => "ctrl-c",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal = source, "draining relay before exit");
}
