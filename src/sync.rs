//! One sync cycle per signed-in identity.
//!
//! Order: sync (must succeed) -> stored emails + stored meetings (concurrent,
//! best-effort) -> classify (best-effort). The loading flag is raised first
//! and cleared last whatever happened in between.

use serde::Serialize;

use crate::api::MailService;
use crate::dashboard::state::{CycleToken, Dashboard};
use crate::domain::category::CLASSIFY_LIMIT;
use crate::error::ApiError;
use crate::session::{Identity, SessionContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepStatus {
    Applied,
    Failed(String),
    /// Not attempted because the sync step failed.
    Skipped,
    /// Completed, but a newer cycle had already started.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub sync: StepStatus,
    pub emails: StepStatus,
    pub meetings: StepStatus,
    pub classify: StepStatus,
}

impl CycleReport {
    fn aborted(error: String) -> Self {
        Self {
            sync: StepStatus::Failed(error),
            emails: StepStatus::Skipped,
            meetings: StepStatus::Skipped,
            classify: StepStatus::Skipped,
        }
    }
}

pub struct SyncOrchestrator<S> {
    service: S,
}

impl<S: MailService> SyncOrchestrator<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run the cycle for a freshly started session.
    pub async fn run_session(&self, session: &SessionContext) -> CycleReport {
        self.run(&session.identity, &session.dashboard).await
    }

    pub async fn run(&self, identity: &Identity, dashboard: &Dashboard) -> CycleReport {
        let cycle = dashboard.apply(|s| s.begin_cycle());
        log::info!("sync cycle started for {identity}");

        if let Err(e) = self.service.synchronize(identity).await {
            log::error!("sync failed for {identity}: {e}");
            let text = e.to_string();
            dashboard.apply(|s| {
                s.record_error(cycle, text.clone());
                s.finish_cycle(cycle);
            });
            return CycleReport::aborted(text);
        }

        let (emails, meetings) = tokio::join!(
            self.load_emails(identity, dashboard, cycle),
            self.load_meetings(identity, dashboard, cycle),
        );
        let classify = self.classify(identity, dashboard, cycle).await;

        dashboard.apply(|s| s.finish_cycle(cycle));
        log::info!("sync cycle finished for {identity}");

        CycleReport {
            sync: StepStatus::Applied,
            emails,
            meetings,
            classify,
        }
    }

    async fn load_emails(&self, identity: &Identity, dashboard: &Dashboard, cycle: CycleToken) -> StepStatus {
        match self.service.stored_emails(identity).await {
            Ok(emails) => {
                log::debug!("received {} stored emails", emails.len());
                applied(dashboard.apply(|s| s.replace_emails(cycle, emails)))
            }
            Err(e) => best_effort_failure("stored emails", e),
        }
    }

    async fn load_meetings(&self, identity: &Identity, dashboard: &Dashboard, cycle: CycleToken) -> StepStatus {
        match self.service.stored_meetings(identity).await {
            Ok(meetings) => {
                log::debug!("received {} stored meetings", meetings.len());
                applied(dashboard.apply(|s| s.replace_meetings(cycle, meetings)))
            }
            Err(e) => best_effort_failure("stored meetings", e),
        }
    }

    async fn classify(&self, identity: &Identity, dashboard: &Dashboard, cycle: CycleToken) -> StepStatus {
        match self.service.classify(identity, CLASSIFY_LIMIT).await {
            Ok(result) => applied(dashboard.apply(|s| s.replace_classification(cycle, result))),
            Err(e) => best_effort_failure("classify", e),
        }
    }
}

fn applied(current: bool) -> StepStatus {
    if current {
        StepStatus::Applied
    } else {
        StepStatus::Discarded
    }
}

fn best_effort_failure(step: &str, e: ApiError) -> StepStatus {
    log::warn!("{step} failed, keeping previous data: {e}");
    StepStatus::Failed(e.to_string())
}
