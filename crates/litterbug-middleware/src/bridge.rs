//! WebSocket bridge between the event bus and external clients.
//!
//! [`DetectionBridge`]:
//!
//! 1. **Ingests** odometry, either programmatically via
//!    [`DetectionBridge::ingest_odometry`] or from inbound WebSocket frames,
//!    and publishes it on [`Topic::Odometry`].
//!
//! 2. **Serves** a WebSocket endpoint where clients receive every
//!    [`Topic::Detections`] event as a JSON text frame.
//!
//! Inbound frames use the rosbridge publish shape:
//!
//! ```json
//! {"op": "publish", "topic": "/odom",
//!  "msg": {"x": 1.0, "y": 2.0, "qx": 0.0, "qy": 0.0, "qz": 0.0, "qw": 1.0}}
//! ```
//!
//! Anything else is ignored.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use litterbug_types::{Event, EventPayload, LitterError, OdometryData};
use serde::Deserialize;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast::error::RecvError;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::bus::{EventBus, Topic};

/// Event `source` for odometry entering through the bridge.
pub const ODOMETRY_SOURCE: &str = "litterbug-middleware::bridge/odom";

const ODOMETRY_TOPIC: &str = "/odom";

#[derive(Debug, Deserialize)]
struct InboundFrame {
    topic: String,
    msg: serde_json::Value,
}

/// Bridge between WebSocket clients and the internal [`EventBus`].
#[derive(Clone)]
pub struct DetectionBridge {
    bus: EventBus,
}

impl DetectionBridge {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Publish an odometry sample on [`Topic::Odometry`].
    ///
    /// Returns the number of subscribers that received it.
    pub fn ingest_odometry(&self, odometry: OdometryData) -> usize {
        let event = Event::new(ODOMETRY_SOURCE, EventPayload::Odometry(odometry));
        self.bus.publish_to(Topic::Odometry, event)
    }

    // -----------------------------------------------------------------------
    // WebSocket server
    // -----------------------------------------------------------------------

    /// Accept WebSocket clients on `addr` until the task is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`LitterError::Channel`] if the TCP listener cannot be bound.
    pub async fn run_ws_server(self, addr: SocketAddr) -> Result<(), LitterError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| LitterError::Channel(format!("ws bind error on {addr}: {e}")))?;
        info!(%addr, "detection bridge listening");

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let bridge = self.clone();
                    tokio::spawn(async move {
                        if let Err(e) = bridge.handle_ws_client(stream, peer).await {
                            error!(peer = %peer, error = %e, "ws client error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "ws accept error");
                }
            }
        }
    }

    async fn handle_ws_client(&self, stream: TcpStream, peer: SocketAddr) -> Result<(), LitterError> {
        let ws_stream = accept_async(stream)
            .await
            .map_err(|e| LitterError::Channel(format!("ws handshake from {peer}: {e}")))?;
        debug!(peer = %peer, "ws client connected");

        let (mut ws_tx, mut ws_rx) = ws_stream.split();
        let mut rx = self.bus.subscribe_to(Topic::Detections);

        loop {
            tokio::select! {
                result = rx.recv() => {
                    match result {
                        Ok(event) => {
                            let json = serde_json::to_string(&event)
                                .map_err(|e| LitterError::Serialization(e.to_string()))?;
                            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Lagged(n)) => {
                            warn!(peer = %peer, lagged_by = n, "ws client lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
                msg = ws_rx.next() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(_)) => break,
                        Some(Ok(Message::Text(text))) => {
                            if let Err(e) = self.handle_incoming_ws_message(text.as_str()) {
                                debug!(peer = %peer, error = %e, "ignored inbound frame");
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        debug!(peer = %peer, "ws client disconnected");
        Ok(())
    }

    /// Parse one inbound text frame. `/odom` publishes are republished on the
    /// bus; frames for other topics are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LitterError::Serialization`] for frames that are not JSON
    /// or whose `/odom` payload is incomplete.
    fn handle_incoming_ws_message(&self, text: &str) -> Result<(), LitterError> {
        let frame: InboundFrame =
            serde_json::from_str(text).map_err(|e| LitterError::Serialization(e.to_string()))?;

        if frame.topic != ODOMETRY_TOPIC {
            return Ok(());
        }

        let odometry: OdometryData = serde_json::from_value(frame.msg)
            .map_err(|e| LitterError::Serialization(format!("bad /odom payload: {e}")))?;
        self.ingest_odometry(odometry);
        Ok(())
    }
}
