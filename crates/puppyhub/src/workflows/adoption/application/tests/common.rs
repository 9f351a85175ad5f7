use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::adoption::application::{
    ActivityLevel, ApplicationFormService, ApplicationRecord, ApplicationReference, BreedChoice,
    BreedId, CoatType, ColorTag, EndpointError, FormStore, MemoryStorage, PersistenceAdapter,
    PickupLocation, PreferredGender, SizeTag, StorageError, StoragePort, SubmissionEndpoint,
    SubmissionReceipt,
};

pub(super) type MemoryService = ApplicationFormService<MemoryStorage, CountingEndpoint>;

/// A record that passes every rule.
pub(super) fn complete_record() -> ApplicationRecord {
    ApplicationRecord {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: "12 Analytical Way".to_string(),
        city: "Denver".to_string(),
        state: "CO".to_string(),
        zip_code: "80202".to_string(),
        mobile_number: "3035550100".to_string(),
        email: "ada@example.com".to_string(),
        confirm_email: "ada@example.com".to_string(),
        breed_choices: vec![BreedChoice {
            priority: 1,
            breed: BreedId::new("maltipoo"),
        }],
        preferred_sizes: BTreeSet::from([SizeTag::Mini]),
        preferred_gender: Some(PreferredGender::Either),
        preferred_colors: BTreeSet::from([ColorTag::Apricot]),
        preferred_coat_types: BTreeSet::from([CoatType::Curly]),
        activity_level: Some(ActivityLevel::Moderate),
        pickup_location: Some(PickupLocation::Denver),
        has_fence: true,
        lifestyle: "Remote worker with a big backyard".to_string(),
        typical_day: "Morning walk, lunch play, evening fetch".to_string(),
        why_good_fit: "We have raised two doodles already".to_string(),
        spay_neuter_agreement: true,
        ..ApplicationRecord::default()
    }
}

pub(super) fn memory_adapter() -> (MemoryStorage, PersistenceAdapter<MemoryStorage>) {
    let storage = MemoryStorage::default();
    let adapter = PersistenceAdapter::with_default_slot(Arc::new(storage.clone()));
    (storage, adapter)
}

pub(super) fn memory_store() -> (MemoryStorage, FormStore<MemoryStorage>) {
    let (storage, adapter) = memory_adapter();
    (storage, FormStore::new(adapter))
}

pub(super) fn build_service(
    endpoint: CountingEndpoint,
) -> (Arc<MemoryService>, MemoryStorage, Arc<CountingEndpoint>) {
    let (storage, adapter) = memory_adapter();
    let endpoint = Arc::new(endpoint);
    let service = Arc::new(ApplicationFormService::new(adapter, Arc::clone(&endpoint)));
    (service, storage, endpoint)
}

/// Endpoint fake that counts deliveries and optionally fails them.
pub(super) struct CountingEndpoint {
    latency: Duration,
    failure: Option<EndpointError>,
    calls: AtomicUsize,
}

impl CountingEndpoint {
    pub(super) fn accepting(latency: Duration) -> Self {
        Self {
            latency,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing(error: EndpointError) -> Self {
        Self {
            latency: Duration::ZERO,
            failure: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionEndpoint for CountingEndpoint {
    async fn submit(
        &self,
        _record: &ApplicationRecord,
    ) -> Result<SubmissionReceipt, EndpointError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.latency).await;
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(SubmissionReceipt {
                reference: ApplicationReference(format!("test-{call}")),
                accepted_at: Utc::now(),
            }),
        }
    }
}

/// Storage that fails every operation.
pub(super) struct FailingStorage;

impl StoragePort for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

pub(super) async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
