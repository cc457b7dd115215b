use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tungstenite::protocol::Message as WsMessage;

use crate::service::{Handler, MemoryDirectory};
use crate::transport::message::{ClientMessage, ServerMessage};

/// Binds `addr` and serves connections until the task is dropped.
///
/// The `hello` frame's `user_id` is taken at face value, admin ids included.
/// This adapter must only be reachable through a trusted front end that
/// authenticates users and supplies their ids.
pub async fn start_websocket_server(
    addr: &str,
    handler: Arc<Handler>,
    directory: Arc<MemoryDirectory>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("WebSocket server listening on ws://{}", listener.local_addr()?);
    serve(listener, handler, directory).await;
    Ok(())
}

/// Accepts connections on an already bound listener.
pub async fn serve(listener: TcpListener, handler: Arc<Handler>, directory: Arc<MemoryDirectory>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("accept failed: {e}");
                continue;
            }
        };
        let handler = handler.clone();
        let directory = directory.clone();
        let conn_id = format!("conn-{}", uuid::Uuid::new_v4());
        tracing::debug!(%conn_id, %peer, "accepted connection");

        tokio::spawn(async move {
            handle_connection(stream, conn_id, handler, directory).await;
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    conn_id: String,
    handler: Arc<Handler>,
    directory: Arc<MemoryDirectory>,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::warn!(%conn_id, "WebSocket handshake error: {e}");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let mut user_id: Option<String> = None;

    while let Some(Ok(msg)) = ws_receiver.next().await {
        if msg.is_close() {
            break;
        }
        if !msg.is_text() {
            continue;
        }
        let Ok(text) = msg.to_text() else {
            continue;
        };

        let response = match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Hello {
                user_id: id,
                display_name,
            }) => {
                if user_id.is_some() {
                    ServerMessage::error("already_identified", "connection already identified")
                } else {
                    if let Some(name) = display_name.as_deref() {
                        directory.remember(&id, name);
                    }
                    tracing::info!(%conn_id, user = %id, "user identified");
                    let is_admin = handler.is_admin(&id);
                    user_id = Some(id.clone());
                    ServerMessage::Welcome {
                        user_id: id,
                        is_admin,
                    }
                }
            }

            Ok(ClientMessage::Action { action }) => match user_id.clone() {
                None => ServerMessage::error("not_identified", "must send hello first"),
                Some(user) => {
                    // Runs to completion even if this connection goes away,
                    // so a committed change is never abandoned half way.
                    let handler = handler.clone();
                    let result =
                        tokio::task::spawn_blocking(move || handler.handle(&user, action)).await;
                    match result {
                        Ok(Ok(reply)) => match ServerMessage::reply(&reply) {
                            Ok(frame) => frame,
                            Err(e) => {
                                tracing::error!(%conn_id, "failed to encode reply: {e}");
                                ServerMessage::error("internal", "failed to encode reply")
                            }
                        },
                        Ok(Err(e)) => ServerMessage::from_service_error(&e),
                        Err(e) => {
                            tracing::error!(%conn_id, "handler task failed: {e}");
                            ServerMessage::error("internal", "internal error, please try again")
                        }
                    }
                }
            },

            Err(err) => {
                tracing::warn!(%conn_id, "Invalid client message: {} | {}", err, text);
                ServerMessage::error("bad_request", err.to_string())
            }
        };

        let frame = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(%conn_id, "failed to serialize response: {e}");
                continue;
            }
        };
        if let Err(e) = ws_sender.send(WsMessage::text(frame)).await {
            tracing::debug!(%conn_id, "failed to send response: {e}");
            break;
        }
    }

    tracing::debug!(%conn_id, "disconnected");
}
