use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::domain::ApplicationRecord;
use super::lock;
use super::persistence::StoragePort;
use super::schema::{validate_record, ValidationReport};
use super::store::FormStore;

/// Message shown to the applicant for any failed submission.
pub const SUBMIT_ERROR_MESSAGE: &str =
    "There was an error submitting your application. Please check all fields and try again.";

pub const DEFAULT_SUBMIT_LATENCY: Duration = Duration::from_millis(1500);

/// Reference handed back once an application is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationReference(pub String);

impl fmt::Display for ApplicationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub reference: ApplicationReference,
    pub accepted_at: DateTime<Utc>,
}

/// Remote destination for completed applications.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    async fn submit(&self, record: &ApplicationRecord)
        -> Result<SubmissionReceipt, EndpointError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("submission endpoint rejected the application: {0}")]
    Rejected(String),
    #[error("submission endpoint unreachable: {0}")]
    Unreachable(String),
}

static REFERENCE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reference() -> ApplicationReference {
    let id = REFERENCE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationReference(format!("pup-{id:06}"))
}

/// Stand-in endpoint: waits a fixed latency, then accepts every application.
#[derive(Debug, Clone)]
pub struct SimulatedEndpoint {
    latency: Duration,
}

impl SimulatedEndpoint {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_LATENCY)
    }
}

#[async_trait]
impl SubmissionEndpoint for SimulatedEndpoint {
    async fn submit(
        &self,
        record: &ApplicationRecord,
    ) -> Result<SubmissionReceipt, EndpointError> {
        tokio::time::sleep(self.latency).await;
        let receipt = SubmissionReceipt {
            reference: next_reference(),
            accepted_at: Utc::now(),
        };
        info!(
            reference = %receipt.reference,
            breeds = record.chosen_breeds().count(),
            "simulated endpoint accepted application"
        );
        Ok(receipt)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::Succeeded => "succeeded",
            SubmissionState::Failed => "failed",
        }
    }
}

/// Why a submission attempt ended in `Failed`. Both kinds surface the same message to the
/// applicant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionFailure {
    #[error("application failed validation on: {0}")]
    Invalid(ValidationReport),
    #[error(transparent)]
    Transport(#[from] EndpointError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error(transparent)]
    Failed(#[from] SubmissionFailure),
}

/// Read model of the submission lifecycle for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionStatusView {
    pub state: SubmissionState,
    pub is_submitting: bool,
    pub submit_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_receipt: Option<SubmissionReceipt>,
}

#[derive(Debug, Default)]
struct Tracker {
    state: SubmissionState,
    error: Option<String>,
    last_receipt: Option<SubmissionReceipt>,
}

/// Drives `Idle -> Submitting -> {Succeeded, Failed}` with at most one attempt in flight.
pub struct SubmissionController<E> {
    endpoint: Arc<E>,
    tracker: Arc<Mutex<Tracker>>,
}

impl<E: SubmissionEndpoint + 'static> SubmissionController<E> {
    pub fn new(endpoint: Arc<E>) -> Self {
        Self {
            endpoint,
            tracker: Arc::new(Mutex::new(Tracker::default())),
        }
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.tracker).state
    }

    pub fn is_submitting(&self) -> bool {
        self.state() == SubmissionState::Submitting
    }

    pub fn submit_error(&self) -> Option<String> {
        lock(&self.tracker).error.clone()
    }

    pub fn last_receipt(&self) -> Option<SubmissionReceipt> {
        lock(&self.tracker).last_receipt.clone()
    }

    pub fn status(&self) -> SubmissionStatusView {
        let tracker = lock(&self.tracker);
        SubmissionStatusView {
            state: tracker.state,
            is_submitting: tracker.state == SubmissionState::Submitting,
            submit_error: tracker.error.clone(),
            last_receipt: tracker.last_receipt.clone(),
        }
    }

    /// Validate the whole record held by `store`, deliver it, and reset the form on success.
    ///
    /// Delivery runs on its own task, so an attempt that has started always settles in
    /// `Succeeded` or `Failed` even when the caller stops waiting for it. The store lock is
    /// only taken for the snapshot and the reset, never across the endpoint call. A failed
    /// attempt leaves the record untouched.
    pub async fn submit<S: StoragePort + 'static>(
        &self,
        store: &Arc<Mutex<FormStore<S>>>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        begin(&self.tracker)?;

        let record = lock(store).record().clone();
        let report = validate_record(&record);
        if !report.is_valid() {
            warn!(fields = %report, "application failed validation at submit");
            return Err(fail(&self.tracker, SubmissionFailure::Invalid(report)));
        }

        let delivery = tokio::spawn(deliver(
            Arc::clone(&self.endpoint),
            Arc::clone(&self.tracker),
            Arc::clone(store),
            record,
        ));

        match delivery.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                error!(error = %join_error, "application delivery task aborted");
                let failure = EndpointError::Unreachable(join_error.to_string());
                Err(fail(&self.tracker, SubmissionFailure::Transport(failure)))
            }
        }
    }
}

async fn deliver<E, S>(
    endpoint: Arc<E>,
    tracker: Arc<Mutex<Tracker>>,
    store: Arc<Mutex<FormStore<S>>>,
    record: ApplicationRecord,
) -> Result<SubmissionReceipt, SubmitError>
where
    E: SubmissionEndpoint,
    S: StoragePort,
{
    match endpoint.submit(&record).await {
        Ok(receipt) => {
            lock(&store).reset_record();
            info!(reference = %receipt.reference, "application submitted");
            succeed(&tracker, receipt.clone());
            Ok(receipt)
        }
        Err(err) => {
            error!(error = %err, "application delivery failed");
            Err(fail(&tracker, SubmissionFailure::Transport(err)))
        }
    }
}

fn begin(tracker: &Mutex<Tracker>) -> Result<(), SubmitError> {
    let mut tracker = lock(tracker);
    if tracker.state == SubmissionState::Submitting {
        warn!("ignoring submit while another submission is in flight");
        return Err(SubmitError::AlreadySubmitting);
    }
    tracker.state = SubmissionState::Submitting;
    tracker.error = None;
    Ok(())
}

fn succeed(tracker: &Mutex<Tracker>, receipt: SubmissionReceipt) {
    let mut tracker = lock(tracker);
    tracker.state = SubmissionState::Succeeded;
    tracker.last_receipt = Some(receipt);
}

fn fail(tracker: &Mutex<Tracker>, failure: SubmissionFailure) -> SubmitError {
    let mut tracker = lock(tracker);
    tracker.state = SubmissionState::Failed;
    tracker.error = Some(SUBMIT_ERROR_MESSAGE.to_string());
    SubmitError::Failed(failure)
}
