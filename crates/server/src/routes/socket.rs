//! Optional socket echo channel.
//!
//! Text frames are broadcast to every live connection, the sender included.
//! Binary frames go back to the sender only.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::Response,
};
use service::realtime::ConnectionRegistry;
use tracing::debug;

use crate::routes::ServerState;

pub async fn upgrade(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> Response {
    let peer = peer.map(|ConnectInfo(addr)| addr.to_string());
    let registry = Arc::clone(&state.registry);
    ws.on_upgrade(move |socket| echo(socket, registry, peer))
}

async fn echo(mut socket: WebSocket, registry: Arc<ConnectionRegistry>, peer: Option<String>) {
    let (conn, mut outbound) = registry.register(peer);
    loop {
        tokio::select! {
            frame = socket.recv() => {
                let Some(frame) = frame else { break };
                match frame {
                    Ok(Message::Text(text)) => {
                        let delivered = registry.broadcast(&text);
                        debug!(connection = conn.id(), delivered, "text frame broadcast");
                    }
                    Ok(Message::Binary(data)) => {
                        if socket.send(Message::Binary(data)).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    // ping/pong are answered by the protocol layer
                    Ok(_) => {}
                    Err(e) => {
                        debug!(connection = conn.id(), error = %e, "socket receive failed");
                        break;
                    }
                }
            }
            Some(text) = outbound.recv() => {
                if socket.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    }
}
