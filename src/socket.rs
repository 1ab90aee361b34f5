use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use rand::Rng;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::messages::OutboundMessage;
use crate::router::{EventRouter, ViewUpdate};

const RECONNECT_BASE_MS: u64 = 500;
const RECONNECT_MAX_MS: u64 = 30_000;
/// A connection that stayed up this long resets the backoff counter.
pub const RECONNECT_RESET_AFTER: Duration = Duration::from_secs(5 * 60);

/// Exponential backoff with ±10% jitter: 500ms doubling up to the 30s cap.
pub fn reconnect_delay(attempt: u32) -> Duration {
    let pow = 2u64.saturating_pow(attempt.saturating_sub(1).min(6));
    let delay_ms = RECONNECT_BASE_MS.saturating_mul(pow).min(RECONNECT_MAX_MS);
    let jitter = (delay_ms / 10).max(1);
    let offset = rand::thread_rng().gen_range(0..=jitter * 2);
    Duration::from_millis(delay_ms - jitter + offset)
}

/// Send guard: an empty or whitespace-only text produces no payload, so it
/// never reaches the socket. Sent text goes out trimmed.
pub fn outbound_payload(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::to_string(&OutboundMessage {
        text: trimmed.to_string(),
    })
    .ok()
}

/// Owns the chat room connection for the life of the page. Inbound text
/// frames go through the router and the resulting view updates out on
/// `updates`; chat texts arriving on `outbound` are guarded and sent. On a
/// drop the connection is re-established with backoff; the server replays
/// `history` and `user_list` on join, which restores the page state
/// wholesale. Returns when either channel peer goes away.
pub async fn run_chat(
    url: String,
    mut router: EventRouter,
    mut outbound: mpsc::UnboundedReceiver<String>,
    updates: mpsc::UnboundedSender<ViewUpdate>,
) {
    let mut attempt: u32 = 0;
    loop {
        let stream = match connect_async(url.as_str()).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                attempt += 1;
                let delay = reconnect_delay(attempt);
                error!(
                    "websocket connect to {url} failed ({e}); retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                continue;
            }
        };
        info!("websocket connected: {url}");
        let connected_at = Instant::now();
        let (mut ws_tx, mut ws_rx) = stream.split();

        let mut input_gone = false;
        loop {
            tokio::select! {
                frame = ws_rx.next() => match frame {
                    Some(Ok(Message::Text(text))) => {
                        for update in router.handle_raw(text.as_str()) {
                            if updates.send(update).is_err() {
                                info!("view side closed, shutting down socket loop");
                                return;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("server closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {
                        // binary/ping/pong frames are not part of the protocol
                    }
                    Some(Err(e)) => {
                        error!("websocket error: {e}");
                        break;
                    }
                    None => {
                        info!("websocket stream ended");
                        break;
                    }
                },
                text = outbound.recv() => match text {
                    Some(text) => {
                        if let Some(payload) = outbound_payload(&text) {
                            if let Err(e) = ws_tx.send(Message::text(payload)).await {
                                error!("failed to send message: {e}");
                                break;
                            }
                        }
                    }
                    None => {
                        input_gone = true;
                        break;
                    }
                },
            }
        }
        if input_gone {
            return;
        }

        if connected_at.elapsed() >= RECONNECT_RESET_AFTER {
            attempt = 0;
        }
        attempt += 1;
        let delay = reconnect_delay(attempt);
        warn!(
            "websocket disconnected; reconnecting in {}ms",
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;
    }
}
