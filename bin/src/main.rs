use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use clap::Parser;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use govlock_stream::{TimelockWatcher, WatcherEvent};

#[derive(Parser)]
#[command(name = "govlock-streamer")]
#[command(about = "WebSocket server for streaming timelock watcher events")]
struct Args {
    /// JSON-RPC endpoint (HTTP or WebSocket URL)
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// WebSocket server port
    #[arg(long, default_value = "9944")]
    port: u16,

    /// Reconstructed-transaction cache capacity
    #[arg(long, default_value = "256")]
    decode_cache: u32,
}

#[derive(Clone)]
struct AppState {
    event_tx: Arc<broadcast::Sender<String>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,govlock_streamer=debug,govlock_stream=debug")
        }))
        .init();

    let args = Args::parse();

    info!("Starting timelock watcher...");
    info!("RPC: {}", &args.rpc_url);
    info!("Port: {}", args.port);

    let watcher = TimelockWatcher::builder()
        .rpc_url(args.rpc_url.clone())
        .decode_cache_capacity(args.decode_cache)
        .build()
        .start()?;

    // Broadcast channel for WebSocket clients
    let (event_tx, _) = broadcast::channel::<String>(1024);
    let event_tx = Arc::new(event_tx);

    // Forward watcher events to connected clients as JSON
    let tx_clone = event_tx.clone();
    let mut event_stream = watcher.events();
    tokio::spawn(async move {
        while let Some(result) = event_stream.next().await {
            match result {
                Ok(event) => {
                    let label = match &event {
                        WatcherEvent::Scheduled(t) => {
                            format!("Scheduled(id={}, calls={})", t.id, t.scheduled.calls.len())
                        }
                        WatcherEvent::StateChange { id, state } => {
                            format!("StateChange(id={id}, state={state})")
                        }
                        WatcherEvent::NewBlock { number, .. } => format!("NewBlock({number})"),
                    };

                    match serde_json::to_string(&event) {
                        Ok(json) => {
                            if let Err(e) = tx_clone.send(json) {
                                debug!("no receivers for {}: {}", label, e);
                            }
                        }
                        Err(e) => error!("failed to serialize {}: {}", label, e),
                    }
                }
                Err(e) => warn!("watcher event error: {}", e),
            }
        }
    });

    // Drive the watcher itself
    let watcher = Arc::new(watcher);
    let runner = watcher.clone();
    tokio::spawn(async move {
        if let Err(e) = runner.run().await {
            error!("watcher stopped: {}", e);
        }
    });

    let state = AppState { event_tx };
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", args.port);
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.event_tx.subscribe();

    info!("WebSocket client connected");

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("client lagging, dropped {} events", n);
                }
            }
        }
    });

    // Drain (and ignore) incoming messages until the client disconnects
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("WebSocket client disconnected");
}
