//! Client side of the change feed: one websocket per session, with screens
//! acquiring table interest on mount and releasing it on unmount.

use std::collections::HashMap;

use dioxus::prelude::*;
use dioxus_fullstack::{
    use_websocket, ClientRequest, FromResponse, IntoRequest, UseWebsocket, WebSocketOptions,
    Websocket,
};

use crate::auth_session::use_session;
use crate::models::{ClientCommand, ServerEvent, WatchedTable, WsEnvelope};
use crate::queries::use_query_client;

#[derive(Clone, Copy)]
pub struct RealtimeContext {
    ws: UseWebsocket<WsEnvelope<ClientCommand>, WsEnvelope<ServerEvent>>,
    /// Mounted-screen interest per table; the server subscription lives
    /// while the count is non-zero.
    interest: Signal<HashMap<WatchedTable, usize>>,
}

impl RealtimeContext {
    pub fn acquire(&self, table: WatchedTable, company_id: Option<String>) {
        let mut interest = self.interest;
        let count = {
            let mut map = interest.write();
            let count = map.entry(table).or_insert(0);
            *count += 1;
            *count
        };
        // First interested screen opens the server-side subscription. With
        // overlapping screens the most recent filter wins.
        if count == 1 || company_id.is_some() {
            self.send(ClientCommand::Subscribe { table, company_id });
        }
    }

    pub fn release(&self, table: WatchedTable) {
        let mut interest = self.interest;
        let remaining = {
            let mut map = interest.write();
            match map.get_mut(&table) {
                Some(count) => {
                    *count = count.saturating_sub(1);
                    *count
                }
                None => return,
            }
        };
        if remaining == 0 {
            self.send(ClientCommand::Unsubscribe { table });
        }
    }

    fn send(&self, command: ClientCommand) {
        let ws = self.ws;
        let envelope = WsEnvelope {
            id: uuid::Uuid::new_v4().to_string(),
            payload: command,
            ts: chrono::Utc::now(),
            correlation_id: None,
        };
        spawn(async move {
            let _ = ws.send(envelope).await;
        });
    }
}

/// Register this screen's interest in a table for as long as it is
/// mounted.
pub fn use_realtime(table: WatchedTable, company_id: Option<String>) {
    let Some(ctx) = try_use_context::<RealtimeContext>() else {
        return;
    };
    use_hook(|| {
        ctx.acquire(table, company_id.clone());
    });
    use_drop(move || {
        ctx.release(table);
    });
}

#[component]
pub fn RealtimeProvider(children: Element) -> Element {
    let session = use_session();
    let user_id = session.identity().map(|i| i.id).unwrap_or_default();

    rsx! {
        RealtimeConnection { key: "{user_id}", children }
    }
}

#[component]
fn RealtimeConnection(children: Element) -> Element {
    let session = use_session();
    let queries = use_query_client();

    let ws = use_websocket(move || {
        let token = session.token().unwrap_or_default();
        async move {
            use dioxus_fullstack::http::{Extensions, HeaderMap, Method};

            let url = ws_url(&format!(
                "/api/changes?token={}",
                urlencoding::encode(&token)
            ));
            let url = url.parse().expect("Invalid URL");

            let request = ClientRequest {
                url,
                headers: HeaderMap::new(),
                method: Method::GET,
                extensions: Extensions::new(),
            };

            let options = WebSocketOptions::default();

            let upgrading = options
                .into_request(request)
                .await
                .map_err(|e| dioxus::CapturedError::from_display(format!("{e:?}")))?;

            let websocket: Websocket<WsEnvelope<ClientCommand>, WsEnvelope<ServerEvent>> =
                Websocket::from_response(upgrading)
                    .await
                    .map_err(|e| dioxus::CapturedError::from_display(format!("{e:?}")))?;

            Ok::<_, dioxus::CapturedError>(websocket)
        }
    });

    use_future(move || {
        let mut ws = ws.clone();
        async move {
            while let Ok(msg) = ws.recv().await {
                if let ServerEvent::Change {
                    table, company_id, ..
                } = msg.payload
                {
                    queries.apply_change(table, company_id.as_deref());
                }
            }
        }
    });

    let interest = use_signal(HashMap::new);
    use_context_provider(|| RealtimeContext { ws, interest });

    children
}

/// Absolutize a path against the page origin with the matching ws scheme.
fn ws_url(path: &str) -> String {
    #[cfg(target_arch = "wasm32")]
    if let Some(window) = web_sys::window() {
        if let Ok(origin) = window.location().origin() {
            let ws_origin = if origin.starts_with("https://") {
                origin.replacen("https://", "wss://", 1)
            } else {
                origin.replacen("http://", "ws://", 1)
            };
            return format!("{}{}", ws_origin.trim_end_matches('/'), path);
        }
    }
    format!("ws://localhost:8080{path}")
}
