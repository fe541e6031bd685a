//! Actix-Web WebSocket handler for live updates.
//!
//! Served on the same port as the HTTP API. Clients receive `comment` and
//! `article:update` frames as they happen; nothing is pushed on connect.

use crate::gateway::events::EventBroadcaster;
use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::AggregatedMessage;
use futures_util::StreamExt;
use std::sync::Arc;

pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let broadcaster = state.broadcaster.clone();
    actix_web::rt::spawn(handle_ws_connection(session, msg_stream, broadcaster));

    Ok(response)
}

async fn handle_ws_connection(
    mut session: actix_ws::Session,
    msg_stream: actix_ws::MessageStream,
    broadcaster: Arc<EventBroadcaster>,
) {
    let mut msg_stream = msg_stream
        .aggregate_continuations()
        .max_continuation_size(64 * 1024);

    let (client_id, mut event_rx) = broadcaster.subscribe();
    log::info!(
        "Live client {} connected (total: {} clients)",
        client_id,
        broadcaster.client_count()
    );

    // Forward broadcast events to the socket
    let mut send_session = session.clone();
    let client_id_clone = client_id.clone();
    let send_task = actix_web::rt::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let Ok(json) = serde_json::to_string(&event) else {
                continue;
            };
            if send_session.text(json).await.is_err() {
                log::warn!(
                    "[WEBSOCKET] Failed to send '{}' event to client {}",
                    event.event,
                    client_id_clone
                );
                break;
            }
        }
    });

    // Inbound traffic is only used for liveness
    while let Some(msg_result) = msg_stream.next().await {
        match msg_result {
            Ok(AggregatedMessage::Ping(data)) => {
                if session.pong(&data).await.is_err() {
                    break;
                }
            }
            Ok(AggregatedMessage::Close(_)) => break,
            Ok(AggregatedMessage::Text(text)) => {
                log::debug!("Ignoring inbound text from client {}: {}", client_id, text);
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("WebSocket error: {:?}", e);
                break;
            }
        }
    }

    broadcaster.unsubscribe(&client_id);
    send_task.abort();
    let _ = session.close(None).await;
    log::info!(
        "Live client {} disconnected (total: {} clients)",
        client_id,
        broadcaster.client_count()
    );
}
