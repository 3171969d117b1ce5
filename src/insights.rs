//! Best-effort dashboard and analytics loading.
//!
//! Each fetch fails independently: a failed fetch is logged and yields
//! `None` without affecting the others.

use tracing::warn;

use crate::api::{Dashboard, ProgressReport, StudentAnalytics, TutorApi};
use crate::session::Session;
use crate::Result;

/// Data behind the dashboard view.
#[derive(Debug, Clone, Default)]
pub struct Overview {
    pub dashboard: Option<Dashboard>,
    pub analytics: Option<StudentAnalytics>,
}

/// Data behind the progress analytics view.
#[derive(Debug, Clone, Default)]
pub struct ProgressView {
    pub analytics: Option<StudentAnalytics>,
    pub report: Option<ProgressReport>,
}

fn optional<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to load {}: {}", what, e);
            None
        }
    }
}

/// Fetch dashboard data and analytics concurrently.
pub async fn load_overview(api: &dyn TutorApi, student_id: &str) -> Overview {
    let (dashboard, analytics) = tokio::join!(api.dashboard(student_id), api.student_analytics(student_id));

    Overview {
        dashboard: optional("dashboard", dashboard),
        analytics: optional("analytics", analytics),
    }
}

/// Fetch analytics and, when a session exists, its progress report.
pub async fn load_progress(
    api: &dyn TutorApi,
    student_id: &str,
    session: Option<&Session>,
) -> ProgressView {
    let report = async {
        match session {
            Some(session) => optional("progress report", api.progress_report(&session.id).await),
            None => None,
        }
    };
    let (analytics, report) = tokio::join!(api.student_analytics(student_id), report);

    ProgressView {
        analytics: optional("analytics", analytics),
        report,
    }
}
