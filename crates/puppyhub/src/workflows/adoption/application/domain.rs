use std::collections::BTreeSet;
use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Breed identifier as published by the catalog. An empty id means "no choice".
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BreedId(pub String);

impl BreedId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BreedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ranked breed preference. Priorities are 1-based and follow list position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedChoice {
    pub priority: u8,
    pub breed: BreedId,
}

/// The form offers at most this many ranked breed choices.
pub const MAX_BREED_CHOICES: usize = 3;

impl BreedChoice {
    pub fn blank(priority: u8) -> Self {
        Self {
            priority,
            breed: BreedId::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeTag {
    Toy,
    Mini,
    Medium,
    Standard,
}

impl SizeTag {
    pub const ALL: [SizeTag; 4] = [Self::Toy, Self::Mini, Self::Medium, Self::Standard];

    pub const fn label(self) -> &'static str {
        match self {
            SizeTag::Toy => "Toy / Petite / Micro Mini (5-24 lbs)",
            SizeTag::Mini => "Traditional Mini (25-40 lbs)",
            SizeTag::Medium => "Medium (41-55 lbs)",
            SizeTag::Standard => "Standard (over 55 lbs)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorTag {
    Apricot,
    Black,
    Blenheim,
    Caramel,
    Chocolate,
    Merle,
    PartiColor,
    PhantomBi,
    PhantomTri,
    Red,
    Silver,
    Tan,
    White,
}

impl ColorTag {
    pub const ALL: [ColorTag; 13] = [
        Self::Apricot,
        Self::Black,
        Self::Blenheim,
        Self::Caramel,
        Self::Chocolate,
        Self::Merle,
        Self::PartiColor,
        Self::PhantomBi,
        Self::PhantomTri,
        Self::Red,
        Self::Silver,
        Self::Tan,
        Self::White,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ColorTag::Apricot => "Apricot",
            ColorTag::Black => "Black",
            ColorTag::Blenheim => "Blenheim",
            ColorTag::Caramel => "Caramel",
            ColorTag::Chocolate => "Chocolate",
            ColorTag::Merle => "Merle",
            ColorTag::PartiColor => "Parti-Color",
            ColorTag::PhantomBi => "Phantom-Bi",
            ColorTag::PhantomTri => "Phantom-Tri",
            ColorTag::Red => "Red",
            ColorTag::Silver => "Silver",
            ColorTag::Tan => "Tan",
            ColorTag::White => "White",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoatType {
    Straight,
    Wavy,
    Curly,
}

impl CoatType {
    pub const ALL: [CoatType; 3] = [Self::Straight, Self::Wavy, Self::Curly];

    pub const fn label(self) -> &'static str {
        match self {
            CoatType::Straight => "Straight (flat)",
            CoatType::Wavy => "Wavy (shaggy)",
            CoatType::Curly => "Curly (wooly)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredGender {
    Male,
    Female,
    Either,
}

impl PreferredGender {
    pub const ALL: [PreferredGender; 3] = [Self::Male, Self::Female, Self::Either];

    pub const fn label(self) -> &'static str {
        match self {
            PreferredGender::Male => "Male",
            PreferredGender::Female => "Female",
            PreferredGender::Either => "Either Gender",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        Self::VeryLow,
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::VeryHigh,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ActivityLevel::VeryLow => "Very Low - Couch Potato",
            ActivityLevel::Low => "Low - Short Walks Only",
            ActivityLevel::Moderate => "Moderate - Regular Exercise",
            ActivityLevel::High => "High - Very Active",
            ActivityLevel::VeryHigh => "Very High - Athletic/Working Dog",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickupLocation {
    Denver,
    Chicago,
    Dallas,
    Seattle,
    Miami,
}

impl PickupLocation {
    pub const ALL: [PickupLocation; 5] = [
        Self::Denver,
        Self::Chicago,
        Self::Dallas,
        Self::Seattle,
        Self::Miami,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PickupLocation::Denver => "Denver, CO (Headquarters)",
            PickupLocation::Chicago => "Chicago, IL",
            PickupLocation::Dallas => "Dallas, TX",
            PickupLocation::Seattle => "Seattle, WA",
            PickupLocation::Miami => "Miami, FL",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Pickup,
    Delivery,
}

impl DeliveryMethod {
    pub const ALL: [DeliveryMethod; 2] = [Self::Pickup, Self::Delivery];

    pub const fn label(self) -> &'static str {
        match self {
            DeliveryMethod::Pickup => "Pick-up",
            DeliveryMethod::Delivery => "Delivery to anywhere in the Contiguous U.S.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
    Crypto,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::CreditCard, Self::BankTransfer, Self::Crypto];

    pub const fn label(self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::BankTransfer => "Bank transfer",
            PaymentMethod::Crypto => "Cryptocurrency",
        }
    }
}

pub const DEFAULT_DEPOSIT_AMOUNT: u32 = 300;

/// Every answer collected by the four-step adoption application.
///
/// The serialized shape (camelCase keys, string enum values) is the format stored in the
/// persistence slot, so field names must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationRecord {
    // Identity
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(rename = "outsideUS")]
    pub outside_us: bool,
    pub mobile_number: String,
    pub email: String,
    pub confirm_email: String,
    pub text_alerts: bool,
    #[serde(deserialize_with = "blank_as_none")]
    pub referral_source: Option<String>,

    // Preferences
    pub breed_choices: Vec<BreedChoice>,
    pub preferred_sizes: BTreeSet<SizeTag>,
    #[serde(deserialize_with = "blank_as_none")]
    pub preferred_gender: Option<PreferredGender>,
    pub preferred_colors: BTreeSet<ColorTag>,
    pub preferred_coat_types: BTreeSet<CoatType>,
    #[serde(deserialize_with = "blank_as_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(deserialize_with = "blank_as_none")]
    pub pickup_location: Option<PickupLocation>,
    #[serde(deserialize_with = "blank_as_none")]
    pub second_pickup_location: Option<PickupLocation>,
    pub delivery_method: DeliveryMethod,

    // Household
    pub other_pets: bool,
    pub pet_types: String,
    pub allergies: String,
    pub has_children: bool,
    pub children_ages: String,
    pub has_fence: bool,
    pub alternative_exercise: String,
    pub lifestyle: String,
    pub typical_day: String,
    pub why_good_fit: String,
    pub first_dog: bool,
    pub previous_puppies: u32,
    pub interested_in_training: bool,

    // Agreements
    pub spay_neuter_agreement: bool,
    pub opt_in_communications: bool,
    pub welcome_call: bool,

    // Payment
    #[serde(deserialize_with = "blank_as_none")]
    pub payment_method: Option<PaymentMethod>,
    pub deposit_amount: u32,
}

impl Default for ApplicationRecord {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            outside_us: false,
            mobile_number: String::new(),
            email: String::new(),
            confirm_email: String::new(),
            text_alerts: false,
            referral_source: None,
            breed_choices: vec![BreedChoice::blank(1)],
            preferred_sizes: BTreeSet::new(),
            preferred_gender: None,
            preferred_colors: BTreeSet::new(),
            preferred_coat_types: BTreeSet::new(),
            activity_level: None,
            pickup_location: None,
            second_pickup_location: None,
            delivery_method: DeliveryMethod::Pickup,
            other_pets: false,
            pet_types: String::new(),
            allergies: String::new(),
            has_children: false,
            children_ages: String::new(),
            has_fence: false,
            alternative_exercise: String::new(),
            lifestyle: String::new(),
            typical_day: String::new(),
            why_good_fit: String::new(),
            first_dog: false,
            previous_puppies: 0,
            interested_in_training: false,
            spay_neuter_agreement: false,
            opt_in_communications: false,
            welcome_call: false,
            payment_method: None,
            deposit_amount: DEFAULT_DEPOSIT_AMOUNT,
        }
    }
}

impl ApplicationRecord {
    /// Preferred breeds in priority order, skipping blank slots.
    pub fn chosen_breeds(&self) -> impl Iterator<Item = &BreedId> {
        self.breed_choices
            .iter()
            .map(|choice| &choice.breed)
            .filter(|breed| !breed.is_blank())
    }

    /// Fold values that would not survive a save/load cycle into their canonical form.
    ///
    /// A blank referral source is stored as unset, and an emptied breed list keeps one blank
    /// first-priority entry.
    pub fn normalize(&mut self) {
        if self
            .referral_source
            .as_deref()
            .is_some_and(str::is_empty)
        {
            self.referral_source = None;
        }
        if self.breed_choices.is_empty() {
            self.breed_choices.push(BreedChoice::blank(1));
        }
    }

    pub fn applicant_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Section of the application currently shown to the applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    Identity = 1,
    Preferences = 2,
    Household = 3,
    Agreements = 4,
}

impl Step {
    pub const FIRST: Step = Step::Identity;
    pub const LAST: Step = Step::Agreements;
    pub const ALL: [Step; 4] = [
        Self::Identity,
        Self::Preferences,
        Self::Household,
        Self::Agreements,
    ];

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Step::Identity),
            2 => Some(Step::Preferences),
            3 => Some(Step::Household),
            4 => Some(Step::Agreements),
            _ => None,
        }
    }

    /// Following step, saturating at the last one.
    pub const fn next(self) -> Self {
        match self {
            Step::Identity => Step::Preferences,
            Step::Preferences => Step::Household,
            Step::Household | Step::Agreements => Step::Agreements,
        }
    }

    /// Preceding step, saturating at the first one.
    pub const fn previous(self) -> Self {
        match self {
            Step::Identity | Step::Preferences => Step::Identity,
            Step::Household => Step::Preferences,
            Step::Agreements => Step::Household,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Step::Identity => "Basic Info",
            Step::Preferences => "Puppy Preferences",
            Step::Household => "Household Info",
            Step::Agreements => "Agreements",
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = FormError;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Step::from_number(number).ok_or(FormError::InvalidStep(number))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.label())
    }
}

/// Caller errors raised at the boundary of the form (bad step numbers and similar).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("step {0} is outside the application (expected 1-4)")]
    InvalidStep(u8),
    #[error("{0:?} is not a step number (expected 1-4)")]
    UnrecognizedStep(String),
}

/// Treats a missing value, `null`, or `""` as "not selected".
///
/// The site historically stored unselected dropdowns as empty strings.
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(D::Error::custom),
    }
}
