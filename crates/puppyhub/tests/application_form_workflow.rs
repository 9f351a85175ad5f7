use std::sync::Arc;
use std::time::Duration;

use puppyhub::workflows::adoption::application::{
    is_step_valid, ApplicationFormService, ApplicationPatch, ApplicationRecord, FileStorage,
    FlagField, MemoryStorage, PaymentMethod, PersistenceAdapter, SimulatedEndpoint, Step,
    StoragePort, TextField, DEFAULT_SLOT,
};
use serde_json::json;

fn complete_patch() -> ApplicationPatch {
    serde_json::from_value(json!({
        "firstName": "Grace",
        "lastName": "Hopper",
        "address": "1 Compiler Court",
        "city": "Chicago",
        "state": "IL",
        "zipCode": "60601",
        "mobileNumber": "3125550199",
        "email": "grace@example.com",
        "confirmEmail": "grace@example.com",
        "breedChoices": [
            { "priority": 1, "breed": "goldendoodle" },
            { "priority": 2, "breed": "" }
        ],
        "preferredSizes": ["medium"],
        "preferredGender": "female",
        "preferredColors": ["red", "apricot"],
        "preferredCoatTypes": ["wavy"],
        "activityLevel": "high",
        "pickupLocation": "chicago",
        "deliveryMethod": "pickup",
        "hasFence": true,
        "lifestyle": "Active family that hikes on weekends",
        "typicalDay": "Kids at school, parents work from home",
        "whyGoodFit": "Fenced yard and plenty of time for training",
        "spayNeuterAgreement": true
    }))
    .expect("complete patch")
}

fn complete_record() -> ApplicationRecord {
    let mut record = ApplicationRecord::default();
    complete_patch().apply_to(&mut record);
    record
}

fn memory_service(
    latency: Duration,
) -> (
    Arc<ApplicationFormService<MemoryStorage, SimulatedEndpoint>>,
    MemoryStorage,
) {
    let storage = MemoryStorage::default();
    let service = ApplicationFormService::new(
        PersistenceAdapter::with_default_slot(Arc::new(storage.clone())),
        Arc::new(SimulatedEndpoint::new(latency)),
    );
    (Arc::new(service), storage)
}

#[test]
fn saved_application_survives_a_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = Arc::new(FileStorage::open(dir.path()).expect("file storage"));
    let adapter = PersistenceAdapter::with_default_slot(Arc::clone(&storage));

    let mut record = complete_record();
    record.payment_method = Some(PaymentMethod::BankTransfer);
    record.allergies = "Mild dander allergy".to_string();
    adapter.save(&record);

    let reloaded = PersistenceAdapter::with_default_slot(Arc::new(FileStorage::new(dir.path())))
        .load()
        .expect("record reloads");
    assert_eq!(reloaded, record);
}

#[test]
fn filling_optional_fields_keeps_steps_valid() {
    let record = complete_record();
    let mut enriched = record.clone();
    enriched.referral_source = Some("vet".to_string());
    enriched.allergies = "None".to_string();
    enriched.second_pickup_location = None;
    enriched.text_alerts = true;
    enriched.previous_puppies = 2;
    enriched.payment_method = Some(PaymentMethod::CreditCard);

    for step in Step::ALL {
        assert!(is_step_valid(step, &record));
        assert!(is_step_valid(step, &enriched), "step {step} regressed");
    }
}

#[test]
fn confirm_email_must_match_email() {
    let mut record = complete_record();
    for (email, confirm) in [
        ("grace@example.com", "grace@example.org"),
        ("grace@example.com", "Grace@example.com"),
        ("grace@example.com", ""),
    ] {
        record.email = email.to_string();
        record.confirm_email = confirm.to_string();
        assert!(!is_step_valid(Step::Identity, &record), "{email} vs {confirm:?}");
    }

    record.confirm_email = record.email.clone();
    assert!(is_step_valid(Step::Identity, &record));
}

#[test]
fn conditional_household_answers() {
    let (service, _) = memory_service(Duration::ZERO);
    service.update_fields(complete_patch());
    assert!(service.is_step_valid(Step::Household));

    service.set_flag(FlagField::OtherPets, true);
    assert!(!service.is_step_valid(Step::Household));
    service.set_text(TextField::PetTypes, "cat");
    assert!(service.is_step_valid(Step::Household));

    service.set_flag(FlagField::HasChildren, true);
    assert!(!service.is_step_valid(Step::Household));
    service.set_text(TextField::ChildrenAges, "3, 7");
    assert!(service.is_step_valid(Step::Household));

    service.set_flag(FlagField::HasFence, false);
    assert!(!service.is_step_valid(Step::Household));
    service.set_text(TextField::AlternativeExercise, "Two long walks a day");
    assert!(service.is_step_valid(Step::Household));
}

#[tokio::test(start_paused = true)]
async fn second_submit_is_ignored_while_first_is_in_flight() {
    let (service, _) = memory_service(Duration::from_millis(1500));
    service.update_fields(complete_patch());

    let second = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(service.is_submitting());
        service.submit().await
    };
    let (first, second) = tokio::join!(service.submit(), second);

    assert!(first);
    assert!(!second);
    assert!(!service.is_submitting());
    assert_eq!(service.submit_error(), None);
}

#[test]
fn reset_clears_answers_step_and_slot() {
    let (service, storage) = memory_service(Duration::ZERO);
    service.update_fields(complete_patch());
    service.set_step(3).expect("valid step");
    assert!(service.has_saved_progress());

    service.reset_record();

    assert_eq!(service.record(), ApplicationRecord::default());
    assert_eq!(service.step(), Step::Identity);
    assert_eq!(storage.get(DEFAULT_SLOT).expect("memory get"), None);
    assert!(!service.has_saved_progress());
}

#[tokio::test(start_paused = true)]
async fn complete_application_submits_and_resets() {
    let (service, storage) = memory_service(Duration::from_millis(1500));
    assert_eq!(service.record(), ApplicationRecord::default());

    service.update_fields(complete_patch());
    let record = service.record();
    for step in Step::ALL {
        assert!(is_step_valid(step, &record), "step {step} should pass");
        service.advance_step();
    }
    assert_eq!(service.step(), Step::Agreements);

    assert!(service.submit().await);
    assert_eq!(service.record(), ApplicationRecord::default());
    assert_eq!(service.step(), Step::Identity);
    assert!(!service.is_submitting());
    assert!(!storage.contains(DEFAULT_SLOT));
    assert!(service
        .submission_status()
        .last_receipt
        .is_some_and(|receipt| receipt.reference.0.starts_with("pup-")));
}

#[tokio::test]
async fn missing_agreement_fails_without_resetting() {
    let (service, _) = memory_service(Duration::ZERO);
    service.update_fields(complete_patch());
    service.set_flag(FlagField::SpayNeuterAgreement, false);
    let before = service.record();

    assert!(!service.submit().await);

    assert!(service
        .submit_error()
        .is_some_and(|message| !message.is_empty()));
    assert_eq!(service.record(), before);
    assert!(!service.is_submitting());
}

#[test]
fn reopened_service_restores_saved_answers() {
    let storage = MemoryStorage::default();
    let first = ApplicationFormService::new(
        PersistenceAdapter::with_default_slot(Arc::new(storage.clone())),
        Arc::new(SimulatedEndpoint::default()),
    );
    first.update_fields(complete_patch());
    first.advance_step();

    let reopened = ApplicationFormService::new(
        PersistenceAdapter::with_default_slot(Arc::new(storage)),
        Arc::new(SimulatedEndpoint::default()),
    );
    assert_eq!(reopened.record(), complete_record());
    assert_eq!(reopened.step(), Step::Identity);
}
