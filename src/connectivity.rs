//! Backend reachability as seen from the console.
//!
//! The status only moves as a side effect of a health check or an
//! evaluation; there is no background polling, so a service that comes back
//! is noticed on the next user action.

use serde::Serialize;

use crate::error::ErrorKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityStatus {
    #[default]
    Checking,
    Connected,
    Disconnected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectivityEvent {
    HealthSucceeded,
    HealthFailed,
    EvaluationSucceeded,
    EvaluationFailed(ErrorKind),
}

/// Persistent banner shown while the backend is unreachable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub title: String,
    pub message: String,
}

impl ConnectivityStatus {
    pub fn next(self, event: ConnectivityEvent) -> Self {
        match event {
            ConnectivityEvent::HealthSucceeded | ConnectivityEvent::EvaluationSucceeded => {
                ConnectivityStatus::Connected
            }
            ConnectivityEvent::HealthFailed => ConnectivityStatus::Disconnected,
            ConnectivityEvent::EvaluationFailed(ErrorKind::Connection) => ConnectivityStatus::Disconnected,
            ConnectivityEvent::EvaluationFailed(_) => self,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectivityStatus::Checking => "Checking...",
            ConnectivityStatus::Connected => "Backend Connected",
            ConnectivityStatus::Disconnected => "Backend Disconnected",
        }
    }

    pub fn banner(self, base_url: &str) -> Option<Banner> {
        match self {
            ConnectivityStatus::Disconnected => Some(Banner {
                title: "Backend Server Not Running".into(),
                message: format!("Please start the scoring service at {base_url}"),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectivityEvent::*;
    use ConnectivityStatus::*;

    #[test]
    fn starts_checking() {
        assert_eq!(ConnectivityStatus::default(), Checking);
        assert_eq!(Checking.label(), "Checking...");
    }

    #[test]
    fn health_check_settles_the_status() {
        assert_eq!(Checking.next(HealthSucceeded), Connected);
        assert_eq!(Checking.next(HealthFailed), Disconnected);
        assert_eq!(Connected.next(HealthFailed), Disconnected);
    }

    #[test]
    fn evaluation_outcomes() {
        assert_eq!(Disconnected.next(EvaluationSucceeded), Connected);
        assert_eq!(Connected.next(EvaluationFailed(ErrorKind::Connection)), Disconnected);
        for kind in [ErrorKind::Evaluation, ErrorKind::Unexpected, ErrorKind::Validation] {
            for s in [Checking, Connected, Disconnected] {
                assert_eq!(s.next(EvaluationFailed(kind)), s);
            }
        }
    }

    #[test]
    fn banner_only_when_disconnected() {
        assert!(Connected.banner("http://localhost:8000").is_none());
        assert!(Checking.banner("http://localhost:8000").is_none());
        let b = Disconnected.banner("http://localhost:8000").unwrap();
        assert_eq!(b.title, "Backend Server Not Running");
        assert!(b.message.ends_with("http://localhost:8000"));
    }
}
