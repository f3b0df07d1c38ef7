//! WebSocket upgrade + session loop.
//!
//! One connection is one page instance. The session task owns its
//! `ViewState`; calls to the scoring service run on spawned tasks and report
//! back through a channel, so the page stays responsive while they are in
//! flight. After every state change the full view is pushed to the client.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, Instrument};
use uuid::Uuid;

use crate::logic::{evaluation_event, health_event};
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::{AppState, ViewEvent, ViewState};
use crate::view::compose;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "answer_eval_console", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let session_id = Uuid::new_v4();
  let span = tracing::info_span!("session", %session_id);
  async move {
    info!(target: "session", "WebSocket connected");
    let (tx, mut rx) = mpsc::channel::<ViewEvent>(8);
    let mut view = ViewState::default();

    // Startup health check, once per page.
    spawn_health(&state, &tx);
    if send_view(&mut socket, &view, &state).await.is_err() {
      return;
    }

    loop {
      tokio::select! {
        incoming = socket.recv() => {
          let msg = match incoming {
            Some(Ok(msg)) => msg,
            _ => break,
          };
          match msg {
            Message::Text(txt) => {
              let reply = match serde_json::from_str::<ClientWsMessage>(&txt) {
                Ok(incoming) => {
                  debug!(target: "session", "WS received: {:?}", &incoming);
                  let (next, reply) = handle_client_ws(incoming, view, &state, &tx);
                  view = next;
                  reply
                }
                Err(e) => Some(ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }),
              };
              if let Some(reply) = reply {
                if send(&mut socket, &reply).await.is_err() { break; }
              } else if send_view(&mut socket, &view, &state).await.is_err() {
                break;
              }
            }
            Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
            Message::Close(_) => break,
            _ => {}
          }
        }
        Some(event) = rx.recv() => {
          view = view.reduce(event);
          if send_view(&mut socket, &view, &state).await.is_err() { break; }
        }
      }
    }
    info!(target: "session", "WebSocket disconnected");
  }
  .instrument(span)
  .await
}

/// Apply one client message. Returns the new view and, for messages that do
/// not change the view, the direct reply to send instead of a view update.
fn handle_client_ws(
  msg: ClientWsMessage,
  view: ViewState,
  state: &Arc<AppState>,
  tx: &mpsc::Sender<ViewEvent>,
) -> (ViewState, Option<ServerWsMessage>) {
  match msg {
    ClientWsMessage::Ping => (view, Some(ServerWsMessage::Pong)),
    ClientWsMessage::UpdateField { field, value } => (view.reduce(ViewEvent::FieldChanged { field, value }), None),
    ClientWsMessage::LoadSample => (view.reduce(ViewEvent::SampleLoaded(state.settings.sample.clone())), None),
    ClientWsMessage::DismissError => (view.reduce(ViewEvent::AlertDismissed), None),
    ClientWsMessage::CheckHealth => {
      spawn_health(state, tx);
      (view, None)
    }
    ClientWsMessage::Submit => {
      let (view, request) = view.begin_submit();
      if let Some(request) = request {
        let state = state.clone();
        let tx = tx.clone();
        tokio::spawn(
          async move {
            let ev = evaluation_event(&state.client, request).await;
            let _ = tx.send(ev).await;
          }
          .in_current_span(),
        );
      }
      (view, None)
    }
  }
}

fn spawn_health(state: &Arc<AppState>, tx: &mpsc::Sender<ViewEvent>) {
  let state = state.clone();
  let tx = tx.clone();
  tokio::spawn(
    async move {
      let ev = health_event(&state.client).await;
      let _ = tx.send(ev).await;
    }
    .in_current_span(),
  );
}

async fn send_view(socket: &mut WebSocket, view: &ViewState, state: &AppState) -> Result<(), axum::Error> {
  let page = compose(view, state.client.base_url());
  send(socket, &ServerWsMessage::View { view: Box::new(page) }).await
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  socket.send(Message::Text(out)).await.map_err(|e| {
    error!(target: "session", error = %e, "WS send error");
    e
  })
}
