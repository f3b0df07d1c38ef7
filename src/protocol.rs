//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve the server and the page independently.

use serde::{Deserialize, Serialize};

use crate::connectivity::{Banner, ConnectivityStatus};
use crate::error::ErrorKind;
use crate::form::{FormField, FormState};
use crate::presenter::ResultView;
use crate::view::PageView;

/// Messages the page can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    UpdateField { field: FormField, value: String },
    LoadSample,
    Submit,
    DismissError,
    CheckHealth,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    View { view: Box<PageView> },
    Error { message: String },
}

//
// HTTP request/response DTOs
//

/// Raw form as posted to `/api/v1/evaluate`; rubrics are comma-separated.
/// `total_marks` is a string or a number, coerced like the form input.
#[derive(Debug, Deserialize)]
pub struct EvaluateIn {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub rubrics: String,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub student_answer: String,
    #[serde(default)]
    pub total_marks: Option<serde_json::Value>,
}

impl EvaluateIn {
    pub fn into_form(self) -> FormState {
        let mut form = FormState::default();
        form.update_field(FormField::Question, &self.question);
        form.update_field(FormField::Rubrics, &self.rubrics);
        form.update_field(FormField::CorrectAnswer, &self.correct_answer);
        form.update_field(FormField::StudentAnswer, &self.student_answer);
        match self.total_marks {
            Some(serde_json::Value::String(s)) => form.update_field(FormField::TotalMarks, &s),
            Some(v) => form.update_field(FormField::TotalMarks, &v.to_string()),
            None => {}
        }
        form
    }
}

#[derive(Debug, Serialize)]
pub struct EvaluateOut {
    pub result: ResultView,
    pub connectivity: ConnectivityStatus,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connectivity: Option<ConnectivityStatus>,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub connectivity: ConnectivityStatus,
    pub status_text: &'static str,
    pub banner: Option<Banner>,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse() {
        let m: ClientWsMessage =
            serde_json::from_str(r#"{"type":"update_field","field":"total_marks","value":"7.5"}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::UpdateField { field: FormField::TotalMarks, ref value } if value == "7.5"));
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"submit"}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::Submit));
        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"type":"update_field","field":"grade","value":"1"}"#).is_err());
    }

    #[test]
    fn evaluate_in_coerces_total_marks() {
        let body: EvaluateIn =
            serde_json::from_str(r#"{"question":"q","rubrics":"a,b","total_marks":"abc"}"#).unwrap();
        assert_eq!(body.into_form().total_marks, 0.0);

        let body: EvaluateIn = serde_json::from_str(r#"{"rubrics":"a","total_marks":7.5}"#).unwrap();
        assert_eq!(body.into_form().total_marks, 7.5);

        let body: EvaluateIn = serde_json::from_str(r#"{"rubrics":"a"}"#).unwrap();
        assert_eq!(body.into_form().total_marks, 10.0);
    }

    #[test]
    fn server_messages_are_tagged() {
        let out = serde_json::to_value(ServerWsMessage::Error { message: "x".into() }).unwrap();
        assert_eq!(out, serde_json::json!({"type": "error", "message": "x"}));
        let out = serde_json::to_value(ServerWsMessage::Pong).unwrap();
        assert_eq!(out, serde_json::json!({"type": "pong"}));
    }
}
