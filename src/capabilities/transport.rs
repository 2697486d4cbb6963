//! Real-time transport capability.
//!
//! # Responsibilities
//! - connect / send / receive / disconnect over a WebSocket
//! - Hide the socket behind a trait so the application root can hold any transport
//!
//! # Design Decisions
//! - Text frames only at the trait surface; binary frames are decoded lossily
//! - Ping/pong handled by the socket, never surfaced
//! - A close frame ends the stream (`receive` returns `None`)
//! - Sink and stream halves are locked separately, so `send` and
//!   `disconnect` never wait behind a pending `receive`

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Writer = SplitSink<Socket, Message>;
type Reader = SplitStream<Socket>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport is not connected")]
    NotConnected,

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Bidirectional message channel installed on the application root.
pub trait Transport: Send + Sync {
    fn connect(&self) -> BoxFuture<'_, Result<(), TransportError>>;

    fn send(&self, message: String) -> BoxFuture<'_, Result<(), TransportError>>;

    /// Next text message, or `None` once the peer closed the connection.
    fn receive(&self) -> BoxFuture<'_, Result<Option<String>, TransportError>>;

    fn disconnect(&self) -> BoxFuture<'_, Result<(), TransportError>>;
}

/// WebSocket client transport.
pub struct WsTransport {
    url: String,
    writer: Mutex<Option<Writer>>,
    reader: Mutex<Option<Reader>>,
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport").field("url", &self.url).finish()
    }
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            writer: Mutex::new(None),
            reader: Mutex::new(None),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// True while the write half is open.
    pub async fn is_connected(&self) -> bool {
        self.writer.lock().await.is_some()
    }
}

impl Transport for WsTransport {
    fn connect(&self) -> BoxFuture<'_, Result<(), TransportError>> {
        async move {
            let mut writer = self.writer.lock().await;
            if writer.is_some() {
                return Ok(());
            }
            let (socket, _response) = connect_async(self.url.as_str()).await?;
            let (sink, stream) = socket.split();
            *self.reader.lock().await = Some(stream);
            *writer = Some(sink);
            tracing::info!(url = %self.url, "Transport connected");
            Ok(())
        }
        .boxed()
    }

    fn send(&self, message: String) -> BoxFuture<'_, Result<(), TransportError>> {
        async move {
            let mut writer = self.writer.lock().await;
            let sink = writer.as_mut().ok_or(TransportError::NotConnected)?;
            sink.send(Message::text(message)).await?;
            Ok(())
        }
        .boxed()
    }

    fn receive(&self) -> BoxFuture<'_, Result<Option<String>, TransportError>> {
        async move {
            let mut reader = self.reader.lock().await;
            let stream = reader.as_mut().ok_or(TransportError::NotConnected)?;
            while let Some(frame) = stream.next().await {
                match frame? {
                    Message::Text(text) => return Ok(Some(text.as_str().to_owned())),
                    Message::Binary(bytes) => return Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
                    Message::Close(_) => {
                        tracing::debug!(url = %self.url, "Transport closed by peer");
                        *reader = None;
                        return Ok(None);
                    }
                    Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
                }
            }
            *reader = None;
            Ok(None)
        }
        .boxed()
    }

    fn disconnect(&self) -> BoxFuture<'_, Result<(), TransportError>> {
        async move {
            let Some(mut sink) = self.writer.lock().await.take() else {
                return Ok(());
            };
            // The reader sees the peer's close reply and ends on its own.
            sink.close().await?;
            tracing::info!(url = %self.url, "Transport disconnected");
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;

    async fn echo_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            while let Some(Ok(msg)) = ws.next().await {
                if msg.is_text() {
                    ws.send(msg).await.unwrap();
                } else if msg.is_close() {
                    break;
                }
            }
        });
        format!("ws://{}", addr)
    }

    #[tokio::test]
    async fn test_send_before_connect_fails() {
        let transport = WsTransport::new("ws://127.0.0.1:1");
        let err = transport.send("hello".into()).await.unwrap_err();
        assert!(matches!(err, TransportError::NotConnected));
        assert!(transport.disconnect().await.is_ok());
    }

    #[tokio::test]
    async fn test_round_trip_through_echo() {
        let transport = WsTransport::new(echo_server().await);
        transport.connect().await.unwrap();
        assert!(transport.is_connected().await);

        transport.send("robot:forward".into()).await.unwrap();
        let reply = transport.receive().await.unwrap();
        assert_eq!(reply.as_deref(), Some("robot:forward"));

        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected().await);
    }

    #[tokio::test]
    async fn test_send_while_receive_pending() {
        let transport = Arc::new(WsTransport::new(echo_server().await));
        transport.connect().await.unwrap();

        let pending = {
            let transport = transport.clone();
            tokio::spawn(async move { transport.receive().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        tokio::time::timeout(Duration::from_secs(2), transport.send("ping".into()))
            .await
            .expect("send waited behind receive")
            .unwrap();

        let echoed = tokio::time::timeout(Duration::from_secs(2), pending)
            .await
            .expect("echo never arrived")
            .unwrap()
            .unwrap();
        assert_eq!(echoed.as_deref(), Some("ping"));

        tokio::time::timeout(Duration::from_secs(2), transport.disconnect())
            .await
            .expect("disconnect waited behind receive")
            .unwrap();
    }
}
