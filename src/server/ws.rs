use crate::models::{ChangeOp, ClientCommand, ServerEvent, WatchedTable, WsEnvelope};
use dioxus::prelude::*;

#[cfg(feature = "server")]
use {
    dioxus::logger::tracing,
    dioxus_fullstack::http::Uri,
    dioxus_fullstack::{WebSocketOptions, Websocket},
    tokio::sync::broadcast,
};

#[cfg(feature = "server")]
use crate::server::middleware::cors::api_cors_layer;

/// Process-wide change feed. Every committed mutation on a watched table is
/// published here; connected clients receive the subset they subscribed to.
#[cfg(feature = "server")]
static CHANGES: once_cell::sync::Lazy<broadcast::Sender<WsEnvelope<ServerEvent>>> =
    once_cell::sync::Lazy::new(|| {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        tx
    });

#[cfg(feature = "server")]
const CHANNEL_CAPACITY: usize = 100;

/// Publish a table change to all connected clients. Called after the write
/// has been committed; lagging receivers drop events rather than block.
#[cfg(feature = "server")]
pub fn publish_change(table: WatchedTable, op: ChangeOp, company_id: Option<String>) {
    let event = WsEnvelope {
        id: uuid::Uuid::new_v4().to_string(),
        payload: ServerEvent::Change {
            table,
            op,
            company_id,
        },
        ts: chrono::Utc::now(),
        correlation_id: None,
    };
    let _ = CHANGES.send(event);
}

/// Per-connection subscription state: which tables the client watches, and
/// an optional company filter for the messages table.
#[cfg(feature = "server")]
#[derive(Default)]
struct Subscriptions {
    tables: std::collections::HashMap<WatchedTable, Option<String>>,
}

#[cfg(feature = "server")]
impl Subscriptions {
    fn wants(&self, event: &ServerEvent) -> bool {
        let ServerEvent::Change {
            table, company_id, ..
        } = event
        else {
            return false;
        };
        match self.tables.get(table) {
            None => false,
            Some(None) => true,
            Some(Some(filter)) => company_id.as_deref() == Some(filter.as_str()),
        }
    }
}

/// Change-feed endpoint. Browser websockets cannot set headers, so the
/// bearer token arrives as a query parameter.
#[cfg(feature = "server")]
#[dioxus_fullstack::get("/api/changes", uri: Uri)]
#[middleware(api_cors_layer())]
pub async fn changes_handler(
    options: WebSocketOptions,
) -> Result<Websocket<WsEnvelope<ClientCommand>, WsEnvelope<ServerEvent>>, ServerFnError> {
    let token = uri
        .query()
        .and_then(|q| {
            q.split('&')
                .find_map(|pair| pair.strip_prefix("token="))
                .map(|t| t.to_string())
        })
        .ok_or_else(|| ServerFnError::new("Unauthorized: missing token"))?;

    let claims = crate::server::jwt::validate_access_token(&token).map_err(|e| {
        tracing::error!("Change feed auth failed: {}", e);
        ServerFnError::new("Unauthorized: invalid token")
    })?;

    tracing::info!("Change feed connected for user: {}", claims.sub);

    Ok(options.on_upgrade(move |mut socket| async move {
        let mut subs = Subscriptions::default();
        let mut rx = CHANGES.subscribe();

        loop {
            tokio::select! {
                msg = socket.recv() => {
                    match msg {
                        Ok(envelope) => {
                            handle_client_command(&envelope, &mut subs, &mut socket).await;
                        }
                        Err(e) => {
                            tracing::debug!("Change feed receive error (client disconnected?): {:?}", e);
                            break;
                        }
                    }
                }

                event = rx.recv() => {
                    match event {
                        Ok(event) => {
                            if subs.wants(&event.payload) {
                                let _ = socket.send(event).await;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("Change feed lagged, skipped {} events", skipped);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        tracing::info!("Change feed closed for user: {}", claims.sub);
    }))
}

#[cfg(feature = "server")]
async fn handle_client_command(
    envelope: &WsEnvelope<ClientCommand>,
    subs: &mut Subscriptions,
    socket: &mut dioxus_fullstack::TypedWebsocket<
        WsEnvelope<ClientCommand>,
        WsEnvelope<ServerEvent>,
    >,
) {
    match &envelope.payload {
        ClientCommand::Subscribe { table, company_id } => {
            subs.tables.insert(*table, company_id.clone());
        }
        ClientCommand::Unsubscribe { table } => {
            subs.tables.remove(table);
        }
    }

    let ack = WsEnvelope {
        id: uuid::Uuid::new_v4().to_string(),
        payload: ServerEvent::Ack {
            nonce: envelope.id.clone(),
        },
        ts: chrono::Utc::now(),
        correlation_id: Some(envelope.id.clone()),
    };
    let _ = socket.send(ack).await;
}

// Client-side stub (required for fullstack compilation)
#[cfg(not(feature = "server"))]
pub async fn changes_handler() -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server feature not enabled"))
}
