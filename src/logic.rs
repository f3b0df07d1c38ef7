//! Core flows shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - running an evaluation and folding its outcome into a view state
//!   - running a health check and folding it into connectivity
//!
//! Scoring failures stop here: they become alerts and connectivity changes,
//! never errors for the caller.

use tracing::{info, instrument, warn};

use crate::client::ScoringClient;
use crate::domain::EvaluationRequest;
use crate::error::ClientError;
use crate::state::{ViewEvent, ViewState};

/// Call the service for an already-validated request. Meant to run on its own
/// task; the returned event is applied by whoever owns the view state.
#[instrument(level = "info", skip(client, request), fields(rubrics = request.rubrics.len()))]
pub async fn evaluation_event(client: &ScoringClient, request: EvaluationRequest) -> ViewEvent {
  let outcome = client.evaluate(request).await;
  match &outcome {
    Ok(resp) => info!(target: "session", percentage = resp.percentage, suggested_grade = resp.suggested_grade, "Evaluation completed"),
    Err(ClientError::Unexpected { detail }) => warn!(target: "session", %detail, "Evaluation failed unexpectedly"),
    Err(e) => warn!(target: "session", kind = ?e.kind(), connection = e.is_connection(), error = %e, "Evaluation failed"),
  }
  ViewEvent::EvaluationFinished(outcome)
}

#[instrument(level = "info", skip(client))]
pub async fn health_event(client: &ScoringClient) -> ViewEvent {
  let ok = client.check_health().await.is_ok();
  info!(target: "session", %ok, "Health check finished");
  ViewEvent::HealthChecked { ok }
}

/// Submit the form held by `state` and wait for the outcome.
/// Invalid forms and duplicate submissions never reach the network.
pub async fn submit(client: &ScoringClient, state: ViewState) -> ViewState {
  let (state, request) = state.begin_submit();
  match request {
    Some(req) => {
      let ev = evaluation_event(client, req).await;
      state.reduce(ev)
    }
    None => state,
  }
}

pub async fn refresh_health(client: &ScoringClient, state: ViewState) -> ViewState {
  let ev = health_event(client).await;
  state.reduce(ev)
}
