//! Domain models exchanged with the scoring service: the evaluation request,
//! the evaluation response (scores + rubric analysis), and the health payload.

use serde::{Deserialize, Serialize};

/// Payload posted to `POST /evaluate`.
/// `rubrics` is always the normalized list, never the raw comma string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
  pub question: String,
  pub rubrics: Vec<String>,
  pub correct_answer: String,
  pub student_answer: String,
  pub total_marks: f64,
}

/// The four sub-scores, each conventionally in [0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
  pub rubric_score: f64,
  pub semantic_score: f64,
  pub nli_score: f64,
  pub final_score: f64,
}

/// Concept coverage as reported by the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RubricAnalysis {
  #[serde(default)] pub covered_concepts: Vec<String>,
  /// Absent, empty and non-empty are three different cases for display.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub partial_concepts: Option<Vec<String>>,
  #[serde(default)] pub missing_concepts: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub total_rubrics: Option<u32>,
}

/// Successful body of `POST /evaluate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResponse {
  pub scores: ScoreBreakdown,
  pub suggested_grade: f64,
  pub total_marks: f64,
  pub percentage: f64,
  pub feedback: String,
  pub rubric_analysis: RubricAnalysis,
}

/// Body of `GET /health`. The payload is not part of the contract, so it is
/// kept verbatim; the conventional fields are exposed as optional accessors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthStatus(pub serde_json::Value);

impl HealthStatus {
  pub fn status(&self) -> Option<&str> {
    self.0.get("status").and_then(|v| v.as_str())
  }

  pub fn models_loaded(&self) -> Option<bool> {
    self.0.get("models_loaded").and_then(|v| v.as_bool())
  }
}
