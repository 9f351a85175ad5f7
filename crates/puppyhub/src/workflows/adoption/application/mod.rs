//! Four-step adoption application: answers, validation, saved progress, and submission.
//!
//! [`ApplicationFormService`] is the entry point. It owns a [`FormStore`] (answers plus the
//! active [`Step`]) that writes through to a [`PersistenceAdapter`], and a
//! [`SubmissionController`] that hands validated applications to a [`SubmissionEndpoint`].

pub mod domain;
pub mod fields;
pub mod persistence;
pub mod router;
pub mod schema;
pub mod service;
pub mod steps;
pub mod store;
pub mod submission;

#[cfg(test)]
mod tests;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use domain::{
    ActivityLevel, ApplicationRecord, BreedChoice, BreedId, CoatType, ColorTag, DeliveryMethod,
    FormError, PaymentMethod, PickupLocation, PreferredGender, SizeTag, Step,
    DEFAULT_DEPOSIT_AMOUNT, MAX_BREED_CHOICES,
};
pub use fields::{ApplicationPatch, FieldName, FlagField, NumberField, TagSelection, TextField};
pub use persistence::{
    FileStorage, MemoryStorage, PersistenceAdapter, StorageError, StoragePort, DEFAULT_SLOT,
};
pub use router::application_router;
pub use schema::{field_issue, validate_fields, validate_record, FieldIssue, ValidationReport};
pub use service::{ApplicationFormService, ApplicationSnapshot, StepStatusView};
pub use steps::{first_invalid_step, is_step_valid, step_fields, step_report};
pub use store::FormStore;
pub use submission::{
    ApplicationReference, EndpointError, SimulatedEndpoint, SubmissionController,
    SubmissionEndpoint, SubmissionFailure, SubmissionReceipt, SubmissionState,
    SubmissionStatusView, SubmitError, DEFAULT_SUBMIT_LATENCY, SUBMIT_ERROR_MESSAGE,
};

/// Acquire `mutex`, recovering the guard if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
