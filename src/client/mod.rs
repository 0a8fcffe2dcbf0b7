//! WebSocket transport between the aggregator and the scanning backend.
//!
//! One [`ScanClient`] owns the live connection and one [`ScanSession`].
//! Frames are pulled one at a time, classified at the boundary, and applied
//! to the session; protocol noise is logged and dropped. Connection loss
//! while a scan is in flight fails the session through the same recovery
//! path as a backend error, keeping findings already received.

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::VigilError;
use crate::events::InboundEvent;
use crate::session::{Phase, ScanSession, SessionSnapshot};

pub struct ScanClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    session: ScanSession,
}

impl ScanClient {
    /// Open the duplex channel to the backend and pair it with a fresh
    /// session.
    pub async fn connect(config: &ClientConfig) -> Result<Self, VigilError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| VigilError::Config(format!("invalid endpoint {}: {}", config.endpoint, e)))?;

        debug!(endpoint = %endpoint, "connecting to scan backend");
        let (ws, _) = connect_async(endpoint.as_str())
            .await
            .map_err(|e| VigilError::Connection(format!("cannot reach {}: {}", endpoint, e)))?;

        Ok(Self {
            ws,
            session: ScanSession::new(config.expected_host.clone()),
        })
    }

    /// Validate the repository reference, arm the session, and send the
    /// request frame. A rejected reference sends nothing and leaves the
    /// session untouched.
    pub async fn submit(&mut self, repository_url: &str) -> Result<(), VigilError> {
        let request = self.session.submit(repository_url)?;
        let frame = serde_json::to_string(&request)?;
        self.ws
            .send(Message::Text(frame))
            .await
            .map_err(|e| VigilError::Connection(format!("send failed: {}", e)))?;
        Ok(())
    }

    /// Pull frames until the next recognized event, apply it to the
    /// session, and return it. Returns `None` once the stream is exhausted
    /// or the connection drops; a drop mid-scan fails the session.
    pub async fn next_event(&mut self) -> Option<InboundEvent> {
        while let Some(frame) = self.ws.next().await {
            match frame {
                Ok(Message::Text(text)) => match InboundEvent::from_frame(&text) {
                    Some(event) => {
                        self.session.handle_event(event.clone());
                        return Some(event);
                    }
                    None => {
                        warn!(frame = %text, "dropping unrecognized frame");
                    }
                },
                Ok(Message::Close(_)) => break,
                // Ping/pong are handled by tungstenite; binary frames carry
                // no events and are dropped like unrecognized text.
                Ok(_) => {}
                Err(e) => {
                    self.fail_in_flight(format!("connection error: {}", e));
                    return None;
                }
            }
        }
        self.fail_in_flight("connection to backend closed unexpectedly".to_string());
        None
    }

    /// Drive the stream until the session reaches a terminal phase or the
    /// connection drops, then return the final snapshot.
    pub async fn run_to_completion(&mut self) -> SessionSnapshot {
        while !self.session.phase().is_terminal() {
            if self.next_event().await.is_none() {
                break;
            }
        }
        self.session.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    /// Close the connection and dispose the session. The only cancellation
    /// path: in-flight aggregator state is discarded with the session.
    pub async fn close(&mut self) {
        let _ = self.ws.close(None).await;
        self.session.dispose();
    }

    fn fail_in_flight(&mut self, message: String) {
        if matches!(self.session.phase(), Phase::Submitted | Phase::Running) {
            warn!("{}", message);
            self.session.fail(message);
        }
    }
}
