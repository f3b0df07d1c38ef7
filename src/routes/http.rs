//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Every request gets a fresh view state; nothing is kept between requests.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, instrument};

use crate::error::ErrorKind;
use crate::form::FormState;
use crate::logic::{refresh_health, submit};
use crate::presenter::present;
use crate::protocol::*;
use crate::state::{AppState, ViewState};

/// Failure body for `/api/v1/evaluate`, mapped to a status by kind.
pub struct ApiError(ErrorOut);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Connection => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Evaluation | ErrorKind::Unexpected => StatusCode::BAD_GATEWAY,
        };
        (status, Json(self.0)).into_response()
    }
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let view = refresh_health(&state.client, ViewState::default()).await;
    let service = state.client.base_url().to_string();
    Json(HealthOut {
        connectivity: view.connectivity,
        status_text: view.connectivity.label(),
        banner: view.connectivity.banner(&service),
        service,
    })
}

#[instrument(level = "info", skip(state))]
pub async fn http_sample(State(state): State<Arc<AppState>>) -> Json<FormState> {
    Json(state.settings.sample.clone())
}

#[instrument(level = "info", skip(state, body), fields(rubrics_len = body.rubrics.len(), answer_len = body.student_answer.len()))]
pub async fn http_evaluate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EvaluateIn>,
) -> Result<Json<EvaluateOut>, ApiError> {
    let view = ViewState { form: body.into_form(), ..ViewState::default() };
    let view = submit(&state.client, view).await;

    if let Some(resp) = &view.results {
        info!(target: "answer_eval_console", percentage = resp.percentage, "HTTP evaluation served");
        return Ok(Json(EvaluateOut { result: present(resp), connectivity: view.connectivity }));
    }

    let (kind, message) = match view.alert {
        Some(alert) => (alert.kind, alert.message),
        None => (ErrorKind::Unexpected, "An unexpected error occurred".to_string()),
    };
    let connectivity = (kind != ErrorKind::Validation).then_some(view.connectivity);
    Err(ApiError(ErrorOut { kind, message, connectivity }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::routes::build_router;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn app(base_url: &str) -> axum::Router {
        let settings = Settings::resolve(None, |k: &str| match k {
            "EVAL_API_BASE_URL" => Some(base_url.to_string()),
            _ => None,
        });
        build_router(Arc::new(AppState::new(settings).unwrap()))
    }

    async fn call(app: axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_evaluate(body: serde_json::Value) -> Request<Body> {
        Request::post("/api/v1/evaluate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn evaluate_returns_presented_result() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/evaluate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "scores": {"rubric_score": 0.6, "semantic_score": 0.6, "nli_score": 0.6, "final_score": 0.6},
                "percentage": 60.0,
                "suggested_grade": 6.0,
                "total_marks": 10.0,
                "feedback": "Line one\n\nLine two",
                "rubric_analysis": {"covered_concepts": ["a"], "partial_concepts": ["b"], "missing_concepts": ["c"]}
            })))
            .mount(&server)
            .await;

        let (status, body) = call(
            app(&server.uri()),
            post_evaluate(serde_json::json!({"question": "q", "rubrics": "a, b, c", "correct_answer": "x", "student_answer": "y", "total_marks": 10})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["connectivity"], "connected");
        assert_eq!(body["result"]["grade_text"], "6.00 / 10");
        assert_eq!(body["result"]["tier"], "tier3");
        assert_eq!(body["result"]["concept_groups"].as_array().unwrap().len(), 3);
        assert_eq!(body["result"]["feedback"], serde_json::json!(["Line one", "", "Line two"]));
    }

    #[tokio::test]
    async fn evaluate_rejects_empty_rubrics_with_422() {
        let (status, body) = call(app("http://127.0.0.1:9"), post_evaluate(serde_json::json!({"rubrics": " , "}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "validation");
        assert_eq!(body["message"], "at least one rubric required");
        assert!(body.get("connectivity").is_none());
    }

    #[tokio::test]
    async fn evaluate_maps_service_errors_to_502() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({"detail": "Services not initialized. Please try again."})))
            .mount(&server)
            .await;

        let (status, body) = call(app(&server.uri()), post_evaluate(serde_json::json!({"rubrics": "a"}))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["kind"], "evaluation");
        assert_eq!(body["message"], "Services not initialized. Please try again.");
        assert_eq!(body["connectivity"], "checking");
    }

    #[tokio::test]
    async fn health_reports_disconnected_when_service_is_down() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let req = Request::get("/api/v1/health").body(Body::empty()).unwrap();
        let (status, body) = call(app(&server.uri()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["connectivity"], "disconnected");
        assert_eq!(body["status_text"], "Backend Disconnected");
        assert_eq!(body["banner"]["title"], "Backend Server Not Running");
    }

    #[tokio::test]
    async fn sample_endpoint_serves_demo_record() {
        let req = Request::get("/api/v1/sample").body(Body::empty()).unwrap();
        let (status, body) = call(app("http://127.0.0.1:9"), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_marks"], 10.0);
        assert!(body["rubrics"].as_str().unwrap().contains("Types of machine learning"));
    }
}
