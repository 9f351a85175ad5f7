use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{
    blank_as_none, ActivityLevel, ApplicationRecord, BreedChoice, CoatType, ColorTag,
    DeliveryMethod, PaymentMethod, PickupLocation, PreferredGender, SizeTag,
};

/// Name of every field in an [`ApplicationRecord`], serialized with its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    Address,
    City,
    State,
    ZipCode,
    #[serde(rename = "outsideUS")]
    OutsideUs,
    MobileNumber,
    Email,
    ConfirmEmail,
    TextAlerts,
    ReferralSource,
    BreedChoices,
    PreferredSizes,
    PreferredGender,
    PreferredColors,
    PreferredCoatTypes,
    ActivityLevel,
    PickupLocation,
    SecondPickupLocation,
    DeliveryMethod,
    OtherPets,
    PetTypes,
    Allergies,
    HasChildren,
    ChildrenAges,
    HasFence,
    AlternativeExercise,
    Lifestyle,
    TypicalDay,
    WhyGoodFit,
    FirstDog,
    PreviousPuppies,
    InterestedInTraining,
    SpayNeuterAgreement,
    OptInCommunications,
    WelcomeCall,
    PaymentMethod,
    DepositAmount,
}

impl FieldName {
    pub const ALL: [FieldName; 39] = [
        Self::FirstName,
        Self::LastName,
        Self::Address,
        Self::City,
        Self::State,
        Self::ZipCode,
        Self::OutsideUs,
        Self::MobileNumber,
        Self::Email,
        Self::ConfirmEmail,
        Self::TextAlerts,
        Self::ReferralSource,
        Self::BreedChoices,
        Self::PreferredSizes,
        Self::PreferredGender,
        Self::PreferredColors,
        Self::PreferredCoatTypes,
        Self::ActivityLevel,
        Self::PickupLocation,
        Self::SecondPickupLocation,
        Self::DeliveryMethod,
        Self::OtherPets,
        Self::PetTypes,
        Self::Allergies,
        Self::HasChildren,
        Self::ChildrenAges,
        Self::HasFence,
        Self::AlternativeExercise,
        Self::Lifestyle,
        Self::TypicalDay,
        Self::WhyGoodFit,
        Self::FirstDog,
        Self::PreviousPuppies,
        Self::InterestedInTraining,
        Self::SpayNeuterAgreement,
        Self::OptInCommunications,
        Self::WelcomeCall,
        Self::PaymentMethod,
        Self::DepositAmount,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::Address => "address",
            FieldName::City => "city",
            FieldName::State => "state",
            FieldName::ZipCode => "zipCode",
            FieldName::OutsideUs => "outsideUS",
            FieldName::MobileNumber => "mobileNumber",
            FieldName::Email => "email",
            FieldName::ConfirmEmail => "confirmEmail",
            FieldName::TextAlerts => "textAlerts",
            FieldName::ReferralSource => "referralSource",
            FieldName::BreedChoices => "breedChoices",
            FieldName::PreferredSizes => "preferredSizes",
            FieldName::PreferredGender => "preferredGender",
            FieldName::PreferredColors => "preferredColors",
            FieldName::PreferredCoatTypes => "preferredCoatTypes",
            FieldName::ActivityLevel => "activityLevel",
            FieldName::PickupLocation => "pickupLocation",
            FieldName::SecondPickupLocation => "secondPickupLocation",
            FieldName::DeliveryMethod => "deliveryMethod",
            FieldName::OtherPets => "otherPets",
            FieldName::PetTypes => "petTypes",
            FieldName::Allergies => "allergies",
            FieldName::HasChildren => "hasChildren",
            FieldName::ChildrenAges => "childrenAges",
            FieldName::HasFence => "hasFence",
            FieldName::AlternativeExercise => "alternativeExercise",
            FieldName::Lifestyle => "lifestyle",
            FieldName::TypicalDay => "typicalDay",
            FieldName::WhyGoodFit => "whyGoodFit",
            FieldName::FirstDog => "firstDog",
            FieldName::PreviousPuppies => "previousPuppies",
            FieldName::InterestedInTraining => "interestedInTraining",
            FieldName::SpayNeuterAgreement => "spayNeuterAgreement",
            FieldName::OptInCommunications => "optInCommunications",
            FieldName::WelcomeCall => "welcomeCall",
            FieldName::PaymentMethod => "paymentMethod",
            FieldName::DepositAmount => "depositAmount",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FirstName,
    LastName,
    Address,
    City,
    State,
    ZipCode,
    MobileNumber,
    Email,
    ConfirmEmail,
    ReferralSource,
    PetTypes,
    Allergies,
    ChildrenAges,
    AlternativeExercise,
    Lifestyle,
    TypicalDay,
    WhyGoodFit,
}

impl TextField {
    pub const fn field(self) -> FieldName {
        match self {
            TextField::FirstName => FieldName::FirstName,
            TextField::LastName => FieldName::LastName,
            TextField::Address => FieldName::Address,
            TextField::City => FieldName::City,
            TextField::State => FieldName::State,
            TextField::ZipCode => FieldName::ZipCode,
            TextField::MobileNumber => FieldName::MobileNumber,
            TextField::Email => FieldName::Email,
            TextField::ConfirmEmail => FieldName::ConfirmEmail,
            TextField::ReferralSource => FieldName::ReferralSource,
            TextField::PetTypes => FieldName::PetTypes,
            TextField::Allergies => FieldName::Allergies,
            TextField::ChildrenAges => FieldName::ChildrenAges,
            TextField::AlternativeExercise => FieldName::AlternativeExercise,
            TextField::Lifestyle => FieldName::Lifestyle,
            TextField::TypicalDay => FieldName::TypicalDay,
            TextField::WhyGoodFit => FieldName::WhyGoodFit,
        }
    }

    pub(crate) fn write(self, record: &mut ApplicationRecord, value: String) {
        let slot = match self {
            TextField::ReferralSource => {
                record.referral_source = (!value.is_empty()).then_some(value);
                return;
            }
            TextField::FirstName => &mut record.first_name,
            TextField::LastName => &mut record.last_name,
            TextField::Address => &mut record.address,
            TextField::City => &mut record.city,
            TextField::State => &mut record.state,
            TextField::ZipCode => &mut record.zip_code,
            TextField::MobileNumber => &mut record.mobile_number,
            TextField::Email => &mut record.email,
            TextField::ConfirmEmail => &mut record.confirm_email,
            TextField::PetTypes => &mut record.pet_types,
            TextField::Allergies => &mut record.allergies,
            TextField::ChildrenAges => &mut record.children_ages,
            TextField::AlternativeExercise => &mut record.alternative_exercise,
            TextField::Lifestyle => &mut record.lifestyle,
            TextField::TypicalDay => &mut record.typical_day,
            TextField::WhyGoodFit => &mut record.why_good_fit,
        };
        *slot = value;
    }
}

/// Yes/no and checkbox inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagField {
    OutsideUs,
    TextAlerts,
    OtherPets,
    HasChildren,
    HasFence,
    FirstDog,
    InterestedInTraining,
    SpayNeuterAgreement,
    OptInCommunications,
    WelcomeCall,
}

impl FlagField {
    pub const fn field(self) -> FieldName {
        match self {
            FlagField::OutsideUs => FieldName::OutsideUs,
            FlagField::TextAlerts => FieldName::TextAlerts,
            FlagField::OtherPets => FieldName::OtherPets,
            FlagField::HasChildren => FieldName::HasChildren,
            FlagField::HasFence => FieldName::HasFence,
            FlagField::FirstDog => FieldName::FirstDog,
            FlagField::InterestedInTraining => FieldName::InterestedInTraining,
            FlagField::SpayNeuterAgreement => FieldName::SpayNeuterAgreement,
            FlagField::OptInCommunications => FieldName::OptInCommunications,
            FlagField::WelcomeCall => FieldName::WelcomeCall,
        }
    }

    pub(crate) fn slot(self, record: &mut ApplicationRecord) -> &mut bool {
        match self {
            FlagField::OutsideUs => &mut record.outside_us,
            FlagField::TextAlerts => &mut record.text_alerts,
            FlagField::OtherPets => &mut record.other_pets,
            FlagField::HasChildren => &mut record.has_children,
            FlagField::HasFence => &mut record.has_fence,
            FlagField::FirstDog => &mut record.first_dog,
            FlagField::InterestedInTraining => &mut record.interested_in_training,
            FlagField::SpayNeuterAgreement => &mut record.spay_neuter_agreement,
            FlagField::OptInCommunications => &mut record.opt_in_communications,
            FlagField::WelcomeCall => &mut record.welcome_call,
        }
    }
}

/// Whole-number inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberField {
    PreviousPuppies,
    DepositAmount,
}

impl NumberField {
    pub const fn field(self) -> FieldName {
        match self {
            NumberField::PreviousPuppies => FieldName::PreviousPuppies,
            NumberField::DepositAmount => FieldName::DepositAmount,
        }
    }

    pub(crate) fn slot(self, record: &mut ApplicationRecord) -> &mut u32 {
        match self {
            NumberField::PreviousPuppies => &mut record.previous_puppies,
            NumberField::DepositAmount => &mut record.deposit_amount,
        }
    }
}

/// One checkbox in a multi-select group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagSelection {
    Size(SizeTag),
    Color(ColorTag),
    CoatType(CoatType),
}

impl TagSelection {
    pub const fn field(self) -> FieldName {
        match self {
            TagSelection::Size(_) => FieldName::PreferredSizes,
            TagSelection::Color(_) => FieldName::PreferredColors,
            TagSelection::CoatType(_) => FieldName::PreferredCoatTypes,
        }
    }

    pub(crate) fn write(self, record: &mut ApplicationRecord, checked: bool) {
        match self {
            TagSelection::Size(tag) => toggle(&mut record.preferred_sizes, tag, checked),
            TagSelection::Color(tag) => toggle(&mut record.preferred_colors, tag, checked),
            TagSelection::CoatType(tag) => toggle(&mut record.preferred_coat_types, tag, checked),
        }
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, tag: T, checked: bool) {
    if checked {
        set.insert(tag);
    } else {
        set.remove(&tag);
    }
}

/// Partial update of an [`ApplicationRecord`].
///
/// Every field that is present replaces the stored value wholesale; collections are never
/// merged element-wise. For optional record fields an explicit `null` (or `""`) clears the
/// value while an absent key leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ApplicationPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    #[serde(rename = "outsideUS")]
    pub outside_us: Option<bool>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub confirm_email: Option<String>,
    pub text_alerts: Option<bool>,
    #[serde(deserialize_with = "explicit")]
    pub referral_source: Option<Option<String>>,
    pub breed_choices: Option<Vec<BreedChoice>>,
    pub preferred_sizes: Option<BTreeSet<SizeTag>>,
    #[serde(deserialize_with = "explicit")]
    pub preferred_gender: Option<Option<PreferredGender>>,
    pub preferred_colors: Option<BTreeSet<ColorTag>>,
    pub preferred_coat_types: Option<BTreeSet<CoatType>>,
    #[serde(deserialize_with = "explicit")]
    pub activity_level: Option<Option<ActivityLevel>>,
    #[serde(deserialize_with = "explicit")]
    pub pickup_location: Option<Option<PickupLocation>>,
    #[serde(deserialize_with = "explicit")]
    pub second_pickup_location: Option<Option<PickupLocation>>,
    pub delivery_method: Option<DeliveryMethod>,
    pub other_pets: Option<bool>,
    pub pet_types: Option<String>,
    pub allergies: Option<String>,
    pub has_children: Option<bool>,
    pub children_ages: Option<String>,
    pub has_fence: Option<bool>,
    pub alternative_exercise: Option<String>,
    pub lifestyle: Option<String>,
    pub typical_day: Option<String>,
    pub why_good_fit: Option<String>,
    pub first_dog: Option<bool>,
    pub previous_puppies: Option<u32>,
    pub interested_in_training: Option<bool>,
    pub spay_neuter_agreement: Option<bool>,
    pub opt_in_communications: Option<bool>,
    pub welcome_call: Option<bool>,
    #[serde(deserialize_with = "explicit")]
    pub payment_method: Option<Option<PaymentMethod>>,
    pub deposit_amount: Option<u32>,
}

fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    blank_as_none(deserializer).map(Some)
}

macro_rules! patch_fields {
    ($($field:ident => $name:ident),+ $(,)?) => {
        impl ApplicationPatch {
            /// Shallow-merge the present fields into `record`, then normalize it.
            pub fn apply_to(self, record: &mut ApplicationRecord) {
                $(
                    if let Some(value) = self.$field {
                        record.$field = value;
                    }
                )+
                record.normalize();
            }

            /// Names of the fields this patch carries.
            pub fn fields(&self) -> Vec<FieldName> {
                let mut present = Vec::new();
                $(
                    if self.$field.is_some() {
                        present.push(FieldName::$name);
                    }
                )+
                present
            }
        }

        impl From<ApplicationRecord> for ApplicationPatch {
            fn from(record: ApplicationRecord) -> Self {
                Self {
                    $($field: Some(record.$field),)+
                }
            }
        }
    };
}

patch_fields! {
    first_name => FirstName,
    last_name => LastName,
    address => Address,
    city => City,
    state => State,
    zip_code => ZipCode,
    outside_us => OutsideUs,
    mobile_number => MobileNumber,
    email => Email,
    confirm_email => ConfirmEmail,
    text_alerts => TextAlerts,
    referral_source => ReferralSource,
    breed_choices => BreedChoices,
    preferred_sizes => PreferredSizes,
    preferred_gender => PreferredGender,
    preferred_colors => PreferredColors,
    preferred_coat_types => PreferredCoatTypes,
    activity_level => ActivityLevel,
    pickup_location => PickupLocation,
    second_pickup_location => SecondPickupLocation,
    delivery_method => DeliveryMethod,
    other_pets => OtherPets,
    pet_types => PetTypes,
    allergies => Allergies,
    has_children => HasChildren,
    children_ages => ChildrenAges,
    has_fence => HasFence,
    alternative_exercise => AlternativeExercise,
    lifestyle => Lifestyle,
    typical_day => TypicalDay,
    why_good_fit => WhyGoodFit,
    first_dog => FirstDog,
    previous_puppies => PreviousPuppies,
    interested_in_training => InterestedInTraining,
    spay_neuter_agreement => SpayNeuterAgreement,
    opt_in_communications => OptInCommunications,
    welcome_call => WelcomeCall,
    payment_method => PaymentMethod,
    deposit_amount => DepositAmount,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }
}
