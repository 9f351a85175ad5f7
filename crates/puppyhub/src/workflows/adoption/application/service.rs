use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::domain::{
    ActivityLevel, ApplicationRecord, BreedId, DeliveryMethod, FormError, PaymentMethod,
    PickupLocation, PreferredGender, Step,
};
use super::fields::{ApplicationPatch, FlagField, NumberField, TagSelection, TextField};
use super::lock;
use super::persistence::{PersistenceAdapter, StoragePort};
use super::schema::{validate_record, ValidationReport};
use super::steps::{is_step_valid, step_report};
use super::store::FormStore;
use super::submission::{
    SubmissionController, SubmissionEndpoint, SubmissionReceipt, SubmissionState,
    SubmissionStatusView, SubmitError,
};

/// One applicant's form session: the shared store plus its submission lifecycle.
///
/// Built once per session and shared by reference (typically `Arc`) with every caller
/// that reads or edits the application.
pub struct ApplicationFormService<S, E> {
    store: Arc<Mutex<FormStore<S>>>,
    submissions: SubmissionController<E>,
}

/// Everything a renderer needs in one read.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSnapshot {
    pub record: ApplicationRecord,
    pub step: Step,
    pub steps: Vec<StepStatusView>,
    pub submission: SubmissionStatusView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatusView {
    pub step: Step,
    pub label: &'static str,
    pub valid: bool,
}

impl<S, E> ApplicationFormService<S, E>
where
    S: StoragePort + 'static,
    E: SubmissionEndpoint + 'static,
{
    /// Open a session, restoring saved progress from the adapter's slot when present.
    pub fn new(persistence: PersistenceAdapter<S>, endpoint: Arc<E>) -> Self {
        Self::with_store(FormStore::restore(persistence), endpoint)
    }

    pub fn with_store(store: FormStore<S>, endpoint: Arc<E>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            submissions: SubmissionController::new(endpoint),
        }
    }

    pub fn record(&self) -> ApplicationRecord {
        lock(&self.store).record().clone()
    }

    pub fn step(&self) -> Step {
        lock(&self.store).step()
    }

    pub fn update_fields(&self, patch: ApplicationPatch) {
        lock(&self.store).update_fields(patch);
    }

    pub fn set_text(&self, field: TextField, value: impl Into<String>) {
        lock(&self.store).set_text(field, value);
    }

    pub fn set_flag(&self, field: FlagField, value: bool) {
        lock(&self.store).set_flag(field, value);
    }

    pub fn set_number(&self, field: NumberField, value: u32) {
        lock(&self.store).set_number(field, value);
    }

    pub fn set_tag(&self, selection: TagSelection, checked: bool) {
        lock(&self.store).set_tag(selection, checked);
    }

    pub fn set_breed_choice(&self, index: usize, breed: BreedId) {
        lock(&self.store).set_breed_choice(index, breed);
    }

    pub fn set_preferred_gender(&self, gender: Option<PreferredGender>) {
        lock(&self.store).set_preferred_gender(gender);
    }

    pub fn set_activity_level(&self, level: Option<ActivityLevel>) {
        lock(&self.store).set_activity_level(level);
    }

    pub fn set_pickup_location(&self, location: Option<PickupLocation>) {
        lock(&self.store).set_pickup_location(location);
    }

    pub fn set_second_pickup_location(&self, location: Option<PickupLocation>) {
        lock(&self.store).set_second_pickup_location(location);
    }

    pub fn set_delivery_method(&self, method: DeliveryMethod) {
        lock(&self.store).set_delivery_method(method);
    }

    pub fn set_payment_method(&self, method: Option<PaymentMethod>) {
        lock(&self.store).set_payment_method(method);
    }

    pub fn advance_step(&self) -> Step {
        lock(&self.store).advance_step()
    }

    pub fn retreat_step(&self) -> Step {
        lock(&self.store).retreat_step()
    }

    /// Jump to step `number`; the current step is kept when `number` is out of range.
    pub fn set_step(&self, number: u8) -> Result<Step, FormError> {
        let mut store = lock(&self.store);
        if store.set_step(number) {
            Ok(store.step())
        } else {
            Err(FormError::InvalidStep(number))
        }
    }

    pub fn is_step_valid(&self, step: Step) -> bool {
        is_step_valid(step, lock(&self.store).record())
    }

    pub fn step_report(&self, step: Step) -> ValidationReport {
        step_report(step, lock(&self.store).record())
    }

    /// Whole-record validation, the same check `submit` applies.
    pub fn validate(&self) -> ValidationReport {
        validate_record(lock(&self.store).record())
    }

    pub fn reset_record(&self) {
        lock(&self.store).reset_record();
    }

    pub fn has_saved_progress(&self) -> bool {
        lock(&self.store).persistence().has_saved()
    }

    /// Submit the application; `true` once it was accepted and the form reset.
    pub async fn submit(&self) -> bool {
        self.submit_detailed().await.is_ok()
    }

    pub async fn submit_detailed(&self) -> Result<SubmissionReceipt, SubmitError> {
        self.submissions.submit(&self.store).await
    }

    pub fn is_submitting(&self) -> bool {
        self.submissions.is_submitting()
    }

    pub fn submit_error(&self) -> Option<String> {
        self.submissions.submit_error()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submissions.state()
    }

    pub fn submission_status(&self) -> SubmissionStatusView {
        self.submissions.status()
    }

    pub fn snapshot(&self) -> ApplicationSnapshot {
        let (record, step) = {
            let store = lock(&self.store);
            (store.record().clone(), store.step())
        };
        let steps = Step::ALL
            .into_iter()
            .map(|candidate| StepStatusView {
                step: candidate,
                label: candidate.label(),
                valid: is_step_valid(candidate, &record),
            })
            .collect();

        ApplicationSnapshot {
            record,
            step,
            steps,
            submission: self.submissions.status(),
        }
    }
}
