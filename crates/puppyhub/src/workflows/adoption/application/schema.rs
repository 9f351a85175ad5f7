use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::domain::ApplicationRecord;
use super::fields::FieldName;

pub const MIN_ZIP_CODE_LEN: usize = 5;
pub const MIN_MOBILE_NUMBER_LEN: usize = 10;

const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$";

/// A single failed constraint, reported against the field the applicant has to fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: FieldName,
    pub message: &'static str,
}

/// Outcome of evaluating a set of field rules. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    issues: Vec<FieldIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    pub fn message_for(&self, field: FieldName) -> Option<&'static str> {
        self.issues
            .iter()
            .find(|issue| issue.field == field)
            .map(|issue| issue.message)
    }

    /// Field name to message map, the shape UI layers bind error labels to.
    pub fn to_field_map(&self) -> BTreeMap<&'static str, &'static str> {
        self.issues
            .iter()
            .map(|issue| (issue.field.as_str(), issue.message))
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.issues.iter().map(|issue| issue.field.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Evaluate only the rules attached to `fields`, in the given order.
pub fn validate_fields(record: &ApplicationRecord, fields: &[FieldName]) -> ValidationReport {
    let issues = fields
        .iter()
        .filter_map(|field| field_issue(*field, record))
        .collect();
    ValidationReport { issues }
}

/// Evaluate every rule in the schema, including the cross-field ones.
pub fn validate_record(record: &ApplicationRecord) -> ValidationReport {
    validate_fields(record, &FieldName::ALL)
}

/// First failing rule for `field`, if any.
pub fn field_issue(field: FieldName, record: &ApplicationRecord) -> Option<FieldIssue> {
    check(field, record).map(|message| FieldIssue { field, message })
}

fn check(field: FieldName, record: &ApplicationRecord) -> Option<&'static str> {
    match field {
        FieldName::FirstName => present(&record.first_name, "First name is required"),
        FieldName::LastName => present(&record.last_name, "Last name is required"),
        FieldName::Address => present(&record.address, "Street address is required"),
        FieldName::City => present(&record.city, "City is required"),
        FieldName::State => present(&record.state, "State is required"),
        FieldName::ZipCode => require(
            char_len(&record.zip_code) >= MIN_ZIP_CODE_LEN,
            "Valid zip code is required",
        ),
        FieldName::MobileNumber => require(
            char_len(&record.mobile_number) >= MIN_MOBILE_NUMBER_LEN,
            "Valid phone number is required",
        ),
        FieldName::Email => require(is_email(&record.email), "Valid email is required"),
        FieldName::ConfirmEmail => {
            require(is_email(&record.confirm_email), "Valid email is required").or_else(|| {
                require(
                    record.email == record.confirm_email,
                    "Email addresses do not match",
                )
            })
        }
        FieldName::BreedChoices => match record.breed_choices.first() {
            None => Some("At least one breed choice is required"),
            Some(first) if first.breed.is_blank() => Some("Please select your first breed choice"),
            Some(_) => None,
        },
        FieldName::PreferredSizes => require(
            !record.preferred_sizes.is_empty(),
            "At least one size preference is required",
        ),
        FieldName::PreferredGender => require(
            record.preferred_gender.is_some(),
            "Gender preference is required",
        ),
        FieldName::PreferredColors => require(
            !record.preferred_colors.is_empty(),
            "At least one color preference is required",
        ),
        FieldName::PreferredCoatTypes => require(
            !record.preferred_coat_types.is_empty(),
            "At least one coat type is required",
        ),
        FieldName::ActivityLevel => require(
            record.activity_level.is_some(),
            "Activity level is required",
        ),
        FieldName::PickupLocation => require(
            record.pickup_location.is_some(),
            "Pickup location is required",
        ),
        FieldName::PetTypes => require(
            !record.other_pets || !record.pet_types.is_empty(),
            "Please tell us what other pets you have",
        ),
        FieldName::ChildrenAges => require(
            !record.has_children || !record.children_ages.is_empty(),
            "Please tell us the ages of your children",
        ),
        FieldName::AlternativeExercise => require(
            record.has_fence || !record.alternative_exercise.is_empty(),
            "Please describe how your puppy will get exercise without a fenced yard",
        ),
        FieldName::Lifestyle => present(&record.lifestyle, "Lifestyle description is required"),
        FieldName::TypicalDay => {
            present(&record.typical_day, "Description of typical day is required")
        }
        FieldName::WhyGoodFit => present(
            &record.why_good_fit,
            "Description of why you are a good fit is required",
        ),
        FieldName::SpayNeuterAgreement => require(
            record.spay_neuter_agreement,
            "You must agree to the spay/neuter agreement",
        ),
        FieldName::OutsideUs
        | FieldName::TextAlerts
        | FieldName::ReferralSource
        | FieldName::SecondPickupLocation
        | FieldName::DeliveryMethod
        | FieldName::OtherPets
        | FieldName::Allergies
        | FieldName::HasChildren
        | FieldName::HasFence
        | FieldName::FirstDog
        | FieldName::PreviousPuppies
        | FieldName::InterestedInTraining
        | FieldName::OptInCommunications
        | FieldName::WelcomeCall
        | FieldName::PaymentMethod
        | FieldName::DepositAmount => None,
    }
}

fn require(ok: bool, message: &'static str) -> Option<&'static str> {
    (!ok).then_some(message)
}

fn present(value: &str, message: &'static str) -> Option<&'static str> {
    require(!value.is_empty(), message)
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn is_email(candidate: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
        .is_match(candidate)
}
