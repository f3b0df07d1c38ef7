//! Page composition: the serializable view model the browser renders.
//! Pure wiring of connectivity, alert, form and presenter output.

use serde::Serialize;

use crate::connectivity::{Banner, ConnectivityStatus};
use crate::form::FormState;
use crate::presenter::{present, ResultView};
use crate::state::{Alert, ViewState};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageView {
    pub connectivity: ConnectivityStatus,
    pub status_text: &'static str,
    pub banner: Option<Banner>,
    pub alert: Option<Alert>,
    pub form: FormState,
    pub loading: bool,
    pub submit_enabled: bool,
    pub submit_text: &'static str,
    pub result: Option<ResultView>,
    /// The "how it works" section is shown only on an idle, empty page.
    pub show_info: bool,
}

pub fn compose(state: &ViewState, base_url: &str) -> PageView {
    PageView {
        connectivity: state.connectivity,
        status_text: state.connectivity.label(),
        banner: state.connectivity.banner(base_url),
        alert: state.alert.clone(),
        form: state.form.clone(),
        loading: state.loading,
        submit_enabled: !state.loading,
        submit_text: if state.loading { "Evaluating..." } else { "Evaluate Answer" },
        result: state.results.as_ref().map(present),
        show_info: state.results.is_none() && !state.loading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ViewEvent;

    #[test]
    fn fresh_page_is_checking_with_info() {
        let page = compose(&ViewState::default(), "http://localhost:8000");
        assert_eq!(page.status_text, "Checking...");
        assert!(page.banner.is_none());
        assert!(page.show_info && page.submit_enabled);
        assert_eq!(page.submit_text, "Evaluate Answer");
        assert!(page.result.is_none());
    }

    #[test]
    fn loading_disables_submit_and_hides_info() {
        let mut s = ViewState::default();
        s.form.rubrics = "a".into();
        let (s, _) = s.begin_submit();
        let page = compose(&s, "http://localhost:8000");
        assert!(!page.submit_enabled);
        assert_eq!(page.submit_text, "Evaluating...");
        assert!(!page.show_info);
    }

    #[test]
    fn disconnected_page_has_banner() {
        let s = ViewState::default().reduce(ViewEvent::HealthChecked { ok: false });
        let page = compose(&s, "http://scoring:8000");
        assert_eq!(page.status_text, "Backend Disconnected");
        assert!(page.banner.unwrap().message.contains("http://scoring:8000"));
    }

    #[test]
    fn serializes_snake_case_tokens() {
        let json = serde_json::to_value(compose(&ViewState::default(), "x")).unwrap();
        assert_eq!(json["connectivity"], "checking");
        assert_eq!(json["form"]["total_marks"], 10.0);
    }
}
