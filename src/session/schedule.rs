//! Periodic validation as a cancellable task

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::{CredentialValidator, CycleOutcome, EndReason};

/// One completed cycle, as seen by a reporter
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub finished_at: DateTime<Local>,
    pub outcome: CycleOutcome,
}

/// Runs validation cycles one period apart.
///
/// The wait starts after a cycle finishes, so cycles never overlap.
pub struct ValidationSchedule {
    validator: Arc<CredentialValidator>,
    period: Duration,
    eager: bool,
    reporter: Option<mpsc::UnboundedSender<CycleReport>>,
}

impl ValidationSchedule {
    pub fn new(validator: Arc<CredentialValidator>, period: Duration) -> Self {
        Self {
            validator,
            period,
            eager: false,
            reporter: None,
        }
    }

    /// Run the first cycle immediately instead of after one period
    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Send a report after every cycle
    pub fn with_reporter(mut self, reporter: mpsc::UnboundedSender<CycleReport>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Start the schedule on the current runtime
    pub fn spawn(self) -> ScheduleHandle {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(cancel_rx));
        ScheduleHandle {
            cancel: cancel_tx,
            task,
        }
    }

    async fn run(self, mut cancel: watch::Receiver<bool>) -> Option<EndReason> {
        log::debug!("Validation schedule started, period {:?}", self.period);
        let mut first = true;

        loop {
            if !(first && self.eager) {
                tokio::select! {
                    _ = tokio::time::sleep(self.period) => {}
                    _ = cancel.changed() => {
                        log::debug!("Validation schedule cancelled");
                        return None;
                    }
                }
            }
            first = false;

            // Cancellation drops an in-flight cycle wherever it is
            let outcome = tokio::select! {
                outcome = self.validator.check_now() => outcome,
                _ = cancel.changed() => {
                    log::debug!("Validation schedule cancelled mid-cycle");
                    return None;
                }
            };

            if let Some(reporter) = &self.reporter {
                let _ = reporter.send(CycleReport {
                    finished_at: Local::now(),
                    outcome,
                });
            }

            if let CycleOutcome::Ended(reason) = outcome {
                log::debug!("Validation schedule stopped: {}", reason);
                return Some(reason);
            }
        }
    }
}

/// Handle to a running schedule
pub struct ScheduleHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<Option<EndReason>>,
}

impl ScheduleHandle {
    /// Stop the schedule; an in-flight cycle is abandoned
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    /// Wait for the schedule to stop. Returns the end reason when the
    /// session was torn down, `None` when cancelled.
    pub async fn join(self) -> Option<EndReason> {
        match self.task.await {
            Ok(reason) => reason,
            Err(e) => {
                log::warn!("Validation task failed: {}", e);
                None
            }
        }
    }
}
