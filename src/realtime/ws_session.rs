//! Per-connection socket loop. Pings every 5s and drops clients idle for
//! more than 10s; events for the user arrive through the hub channel.

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{sync::mpsc::UnboundedReceiver, time};

use super::hub::{ConnectionId, RealtimeHub};

#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HubClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    Network(Closed),
}

pub struct WsSession {
    hub: Arc<RealtimeHub>,
    user_id: String,
    connection: ConnectionId,
}

impl WsSession {
    pub fn new(hub: Arc<RealtimeHub>, user_id: String, connection: ConnectionId) -> Self {
        Self {
            hub,
            user_id,
            connection,
        }
    }

    pub async fn run(
        self,
        mut session: Session,
        mut stream: MessageStream,
        mut events: UnboundedReceiver<String>,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    Self::handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    Self::handle_stream_message(&mut session, &mut last_heartbeat, message).await
                }
                event = events.recv() => match event {
                    Some(payload) => session.text(payload).await.map_err(SessionError::Network),
                    None => Err(SessionError::HubClosed),
                },
            };

            if let Err(error) = result {
                self.shutdown(session, error).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }
        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message.map_err(SessionError::Protocol)? {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session.pong(&payload).await.map_err(SessionError::Network)
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
            // Clients only listen; any other frame just proves liveness.
            _ => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
        }
    }

    async fn shutdown(&self, session: Session, error: SessionError) {
        self.hub.leave(&self.user_id, self.connection);

        let reason = match error {
            SessionError::HeartbeatTimeout => {
                log::warn!("Socket heartbeat timeout for user {}", self.user_id);
                Some(CloseReason {
                    code: CloseCode::Normal,
                    description: Some("heartbeat timeout".to_owned()),
                })
            }
            SessionError::Protocol(err) => {
                log::warn!("Socket protocol error for user {}: {}", self.user_id, err);
                Some(CloseReason {
                    code: CloseCode::Protocol,
                    description: Some("protocol error".to_owned()),
                })
            }
            SessionError::ClientClosed(reason) => reason,
            SessionError::HubClosed => Some(CloseReason {
                code: CloseCode::Away,
                description: None,
            }),
            SessionError::StreamClosed | SessionError::Network(_) => return,
        };

        if let Err(err) = session.close(reason).await {
            log::debug!("Socket already closed for user {}: {}", self.user_id, err);
        }
    }
}
