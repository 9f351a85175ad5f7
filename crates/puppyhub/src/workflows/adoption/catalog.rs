//! Read-only breed catalog and the option tables the application form renders.

use serde::Serialize;

use super::application::{
    ActivityLevel, BreedId, CoatType, ColorTag, DeliveryMethod, PaymentMethod, PickupLocation,
    PreferredGender, SizeTag,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreedSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub origin: &'static str,
    pub life_expectancy: &'static str,
}

impl BreedSummary {
    pub fn breed_id(&self) -> BreedId {
        BreedId::new(self.id)
    }
}

const BREEDS: [BreedSummary; 4] = [
    BreedSummary {
        id: "maltipoo",
        name: "Maltipoo",
        origin: "United States, 1990s",
        life_expectancy: "10-15 years",
    },
    BreedSummary {
        id: "goldendoodle",
        name: "Goldendoodle",
        origin: "United States, 1990s",
        life_expectancy: "10-15 years",
    },
    BreedSummary {
        id: "labradoodle",
        name: "Labradoodle",
        origin: "Australia, 1980s",
        life_expectancy: "12-15 years",
    },
    BreedSummary {
        id: "bernedoodle",
        name: "Bernedoodle",
        origin: "Canada, 2000s",
        life_expectancy: "12-18 years",
    },
];

pub fn breeds() -> &'static [BreedSummary] {
    &BREEDS
}

pub fn find_breed(id: &str) -> Option<&'static BreedSummary> {
    BREEDS.iter().find(|breed| breed.id == id)
}

/// Referral sources offered by the "How did you hear about us?" question.
pub const REFERRAL_SOURCES: [(&str, &str); 6] = [
    ("google", "Google Search"),
    ("facebook", "Facebook"),
    ("instagram", "Instagram"),
    ("friend", "Friend or Family"),
    ("vet", "Veterinarian"),
    ("other", "Other"),
];

/// A selectable value paired with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: &'static str,
}

impl ChoiceOption {
    fn of<T: Serialize>(value: T, label: &'static str) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(serde_json::Value::String(value)) => value,
            Ok(other) => other.to_string(),
            Err(_) => String::new(),
        };
        Self { value, label }
    }
}

/// Every option list the form renders, keyed the same way as the record fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOptions {
    pub referral_sources: Vec<ChoiceOption>,
    pub breeds: Vec<ChoiceOption>,
    pub preferred_sizes: Vec<ChoiceOption>,
    pub preferred_gender: Vec<ChoiceOption>,
    pub preferred_colors: Vec<ChoiceOption>,
    pub preferred_coat_types: Vec<ChoiceOption>,
    pub activity_level: Vec<ChoiceOption>,
    pub pickup_locations: Vec<ChoiceOption>,
    pub delivery_method: Vec<ChoiceOption>,
    pub payment_method: Vec<ChoiceOption>,
}

pub fn choice_options() -> ChoiceOptions {
    ChoiceOptions {
        referral_sources: REFERRAL_SOURCES
            .iter()
            .map(|&(value, label)| ChoiceOption {
                value: value.to_string(),
                label,
            })
            .collect(),
        breeds: BREEDS
            .iter()
            .map(|breed| ChoiceOption {
                value: breed.id.to_string(),
                label: breed.name,
            })
            .collect(),
        preferred_sizes: SizeTag::ALL
            .into_iter()
            .map(|tag| ChoiceOption::of(tag, tag.label()))
            .collect(),
        preferred_gender: PreferredGender::ALL
            .into_iter()
            .map(|gender| ChoiceOption::of(gender, gender.label()))
            .collect(),
        preferred_colors: ColorTag::ALL
            .into_iter()
            .map(|tag| ChoiceOption::of(tag, tag.label()))
            .collect(),
        preferred_coat_types: CoatType::ALL
            .into_iter()
            .map(|coat| ChoiceOption::of(coat, coat.label()))
            .collect(),
        activity_level: ActivityLevel::ALL
            .into_iter()
            .map(|level| ChoiceOption::of(level, level.label()))
            .collect(),
        pickup_locations: PickupLocation::ALL
            .into_iter()
            .map(|location| ChoiceOption::of(location, location.label()))
            .collect(),
        delivery_method: DeliveryMethod::ALL
            .into_iter()
            .map(|method| ChoiceOption::of(method, method.label()))
            .collect(),
        payment_method: PaymentMethod::ALL
            .into_iter()
            .map(|method| ChoiceOption::of(method, method.label()))
            .collect(),
    }
}
