use super::domain::{ApplicationRecord, Step};
use super::fields::FieldName;
use super::schema::{validate_fields, ValidationReport};

const IDENTITY_FIELDS: &[FieldName] = &[
    FieldName::FirstName,
    FieldName::LastName,
    FieldName::Address,
    FieldName::City,
    FieldName::State,
    FieldName::ZipCode,
    FieldName::MobileNumber,
    FieldName::Email,
    FieldName::ConfirmEmail,
];

const PREFERENCE_FIELDS: &[FieldName] = &[
    FieldName::BreedChoices,
    FieldName::PreferredSizes,
    FieldName::PreferredGender,
    FieldName::PreferredColors,
    FieldName::PreferredCoatTypes,
    FieldName::ActivityLevel,
    FieldName::PickupLocation,
    FieldName::DeliveryMethod,
];

// The conditional fields carry the otherPets/hasChildren/hasFence rules.
const HOUSEHOLD_FIELDS: &[FieldName] = &[
    FieldName::Lifestyle,
    FieldName::TypicalDay,
    FieldName::WhyGoodFit,
    FieldName::PetTypes,
    FieldName::ChildrenAges,
    FieldName::AlternativeExercise,
];

const AGREEMENT_FIELDS: &[FieldName] = &[FieldName::SpayNeuterAgreement];

/// Fields whose rules gate leaving `step`.
pub fn step_fields(step: Step) -> &'static [FieldName] {
    match step {
        Step::Identity => IDENTITY_FIELDS,
        Step::Preferences => PREFERENCE_FIELDS,
        Step::Household => HOUSEHOLD_FIELDS,
        Step::Agreements => AGREEMENT_FIELDS,
    }
}

pub fn step_report(step: Step, record: &ApplicationRecord) -> ValidationReport {
    validate_fields(record, step_fields(step))
}

/// Whether the answers held for `step` are complete and consistent.
pub fn is_step_valid(step: Step, record: &ApplicationRecord) -> bool {
    step_report(step, record).is_valid()
}

/// Earliest step that still blocks submission.
pub fn first_invalid_step(record: &ApplicationRecord) -> Option<Step> {
    Step::ALL
        .into_iter()
        .find(|step| !is_step_valid(*step, record))
}
