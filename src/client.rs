//! Minimal client for the external scoring service.
//!
//! Two calls: `POST /evaluate` and `GET /health`. One round trip each, no
//! retries and no caching. Failures are classified here, at the boundary:
//! a reqwest transport error means the service was never reached
//! (`Connection`), a non-success status means it answered with a failure
//! (`Evaluation`), anything else is `Unexpected`.
//!
//! NOTE: request bodies carry student answers, so only sizes are logged.

use std::time::Instant;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{EvaluationRequest, EvaluationResponse, HealthStatus};
use crate::error::{ClientError, CONNECT_FAILED_MSG, EVALUATION_FAILED_MSG, HEALTH_FAILED_MSG};
use crate::util::{join_url, trunc_for_log};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug)]
pub struct ScoringClient {
  client: reqwest::Client,
  base_url: String,
}

impl ScoringClient {
  pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("answer-eval-console/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Submit one evaluation. The request is consumed: once handed over it
  /// belongs to this call.
  #[instrument(
    level = "info",
    target = "scoring_client",
    skip(self, request),
    fields(rubrics = request.rubrics.len(), answer_len = request.student_answer.len(), total_marks = request.total_marks)
  )]
  pub async fn evaluate(&self, request: EvaluationRequest) -> Result<EvaluationResponse, ClientError> {
    let url = join_url(&self.base_url, "/evaluate");
    let start = Instant::now();

    let res = self.client.post(&url)
      .header(CONTENT_TYPE, "application/json")
      .json(&request)
      .send()
      .await
      .map_err(|e| classify_send_error(&url, e))?;

    let status = res.status();
    let elapsed = start.elapsed();

    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      let msg = extract_detail(&body).unwrap_or_else(|| EVALUATION_FAILED_MSG.to_string());
      warn!(target: "scoring_client", %url, %status, ?elapsed, body = %trunc_for_log(&body, 300), "Scoring service rejected evaluation");
      return Err(ClientError::Evaluation(msg));
    }

    let bytes = res.bytes().await.map_err(|e| {
      error!(target: "scoring_client", %url, error = %e, "Connection dropped while reading evaluation body");
      ClientError::Connection(CONNECT_FAILED_MSG.into())
    })?;

    let parsed = serde_json::from_slice::<EvaluationResponse>(&bytes).map_err(|e| {
      error!(target: "scoring_client", %url, error = %e, body_len = bytes.len(), "Evaluation body does not match the expected shape");
      ClientError::Unexpected { detail: format!("JSON parse error: {e}") }
    })?;

    info!(target: "scoring_client", %status, ?elapsed, percentage = parsed.percentage, "Evaluation received");
    Ok(parsed)
  }

  /// Check that the service answers. Any 2xx means reachable; every failure, whatever its
  /// cause, is a connection failure.
  #[instrument(level = "info", target = "scoring_client", skip(self))]
  pub async fn check_health(&self) -> Result<HealthStatus, ClientError> {
    let url = join_url(&self.base_url, "/health");
    let start = Instant::now();

    let unreachable = |reason: String| {
      warn!(target: "scoring_client", %url, %reason, "Health check failed");
      ClientError::Connection(HEALTH_FAILED_MSG.into())
    };

    let res = self.client.get(&url).send().await.map_err(|e| unreachable(e.to_string()))?;
    let status = res.status();
    if !status.is_success() {
      return Err(unreachable(format!("HTTP {status}")));
    }
    // Any success counts; the payload is kept as-is, raw text when it is not JSON.
    let body = res.bytes().await.map_err(|e| unreachable(e.to_string()))?;
    let health = HealthStatus(match serde_json::from_slice(&body) {
      Ok(value) => value,
      Err(_) if body.is_empty() => serde_json::Value::Null,
      Err(_) => serde_json::Value::String(String::from_utf8_lossy(&body).into_owned()),
    });

    debug!(target: "scoring_client", elapsed = ?start.elapsed(), status = ?health.status(), models_loaded = ?health.models_loaded(), "Health check ok");
    Ok(health)
  }
}

/// A send error without a response is a transport failure, unless the
/// request itself could not be built or redirects looped.
fn classify_send_error(url: &str, e: reqwest::Error) -> ClientError {
  if e.is_builder() || e.is_redirect() {
    error!(target: "scoring_client", %url, error = %e, "Request could not be issued");
    return ClientError::Unexpected { detail: e.to_string() };
  }
  warn!(target: "scoring_client", %url, error = %e, timeout = e.is_timeout(), connect = e.is_connect(), "Scoring service unreachable");
  ClientError::Connection(CONNECT_FAILED_MSG.into())
}

/// Pull a human message out of an error body.
/// Accepts `{"detail": "..."}` and the list form `{"detail": [{"msg": "..."}]}`.
fn extract_detail(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Detail {
    Text(String),
    Records(Vec<Record>),
  }
  #[derive(Deserialize)]
  struct Record { msg: String }
  #[derive(Deserialize)]
  struct Wrap { detail: Option<Detail> }

  let wrap = serde_json::from_str::<Wrap>(body).ok()?;
  let msg = match wrap.detail? {
    Detail::Text(s) => s,
    Detail::Records(rs) => rs.into_iter().map(|r| r.msg).collect::<Vec<_>>().join("; "),
  };
  if msg.trim().is_empty() { None } else { Some(msg) }
}
