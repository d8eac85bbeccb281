use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use serde::Serialize;
use tokio::time::interval;
use tracing::{error, info};

use crate::api::handlers::AppState;
use crate::domain::DashboardMetrics;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsMessage {
    Connected { message: String },
    Dashboard(DashboardMetrics),
    Error { message: String },
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(owner): Path<String>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| websocket_handler(socket, owner, state))
}

/// Pushes a fresh dashboard for today on every refresh tick until the client
/// goes away.
async fn websocket_handler(socket: WebSocket, owner: String, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    info!("Dashboard client connected for {}", owner);

    let welcome = WsMessage::Connected {
        message: format!("Streaming dashboard for {}", owner),
    };
    if send_json(&mut sender, &welcome).await.is_err() {
        return;
    }

    let mut ticker = interval(state.dashboard_refresh);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let message = match state.journal.dashboard(&owner, None).await {
                    Ok(metrics) => WsMessage::Dashboard(metrics),
                    Err(e) => {
                        error!("Failed to build dashboard for {}: {}", owner, e);
                        WsMessage::Error { message: e.to_string() }
                    }
                };

                if send_json(&mut sender, &message).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Dashboard client disconnected for {}", owner);
                        break;
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error for {}: {}", owner, e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

async fn send_json<S>(sender: &mut S, message: &WsMessage) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to encode websocket message: {}", e);
            return Err(());
        }
    };

    sender.send(Message::Text(text)).await.map_err(|e| {
        error!("Failed to send websocket message: {}", e);
    })
}
