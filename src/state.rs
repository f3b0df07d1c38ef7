//! Application and view state.
//!
//! `AppState` is immutable after startup and shared through `Arc`: the
//! scoring client plus resolved settings.
//!
//! `ViewState` is everything one page instance shows. It is owned by exactly
//! one session (a WebSocket task, or a single HTTP request) and changes only
//! through `reduce`, a pure `(state, event) -> state` function, so the whole
//! lifecycle can be tested without a socket or a browser.

use serde::Serialize;
use tracing::{debug, info};

use crate::client::ScoringClient;
use crate::config::Settings;
use crate::connectivity::{ConnectivityEvent, ConnectivityStatus};
use crate::domain::{EvaluationRequest, EvaluationResponse};
use crate::error::{ClientError, ErrorKind, FormError};
use crate::form::{FormField, FormState};

pub struct AppState {
    pub client: ScoringClient,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, reqwest::Error> {
        let client = ScoringClient::new(&settings.base_url)?;
        info!(target: "answer_eval_console", base_url = %client.base_url(), "Scoring client ready");
        Ok(Self { client, settings })
    }
}

/// Inline alert under the banner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: ErrorKind,
    pub title: &'static str,
    pub message: String,
}

impl Alert {
    fn from_form(e: &FormError) -> Self {
        Alert { kind: ErrorKind::Validation, title: "Invalid Form", message: e.to_string() }
    }

    fn from_client(e: &ClientError) -> Self {
        let title = match e.kind() {
            ErrorKind::Connection => "Connection Error",
            ErrorKind::Unexpected => "Unexpected Error",
            _ => "Evaluation Error",
        };
        Alert { kind: e.kind(), title, message: e.to_string() }
    }
}

#[derive(Debug)]
pub enum ViewEvent {
    FieldChanged { field: FormField, value: String },
    SampleLoaded(FormState),
    AlertDismissed,
    SubmitRejected(FormError),
    SubmitStarted,
    EvaluationFinished(Result<EvaluationResponse, ClientError>),
    HealthChecked { ok: bool },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub form: FormState,
    pub loading: bool,
    pub results: Option<EvaluationResponse>,
    pub alert: Option<Alert>,
    pub connectivity: ConnectivityStatus,
}

impl ViewState {
    pub fn reduce(mut self, event: ViewEvent) -> ViewState {
        match event {
            // Inputs are disabled while a submission is in flight.
            ViewEvent::FieldChanged { .. } | ViewEvent::SampleLoaded(_) if self.loading => {
                debug!(target: "session", "Ignoring form edit while loading");
            }
            ViewEvent::FieldChanged { field, value } => self.form.update_field(field, &value),
            ViewEvent::SampleLoaded(sample) => self.form.load_sample(&sample),
            ViewEvent::AlertDismissed => self.alert = None,
            ViewEvent::SubmitRejected(e) => self.alert = Some(Alert::from_form(&e)),
            ViewEvent::SubmitStarted => {
                self.loading = true;
                self.alert = None;
                self.results = None;
            }
            ViewEvent::EvaluationFinished(Ok(resp)) => {
                self.loading = false;
                self.results = Some(resp);
                self.connectivity = self.connectivity.next(ConnectivityEvent::EvaluationSucceeded);
            }
            ViewEvent::EvaluationFinished(Err(e)) => {
                self.loading = false;
                self.results = None;
                self.alert = Some(Alert::from_client(&e));
                self.connectivity = self.connectivity.next(ConnectivityEvent::EvaluationFailed(e.kind()));
            }
            ViewEvent::HealthChecked { ok } => {
                let ev = if ok { ConnectivityEvent::HealthSucceeded } else { ConnectivityEvent::HealthFailed };
                self.connectivity = self.connectivity.next(ev);
            }
        }
        self
    }

    /// Start a submission. Returns the request to send, or `None` when the
    /// form is invalid or another evaluation is already in flight.
    pub fn begin_submit(self) -> (ViewState, Option<EvaluationRequest>) {
        if self.loading {
            debug!(target: "session", "Submit ignored: evaluation already in flight");
            return (self, None);
        }
        match self.form.build_request() {
            Ok(req) => (self.reduce(ViewEvent::SubmitStarted), Some(req)),
            Err(e) => (self.reduce(ViewEvent::SubmitRejected(e)), None),
        }
    }
}
