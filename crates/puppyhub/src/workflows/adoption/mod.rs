pub mod application;
pub mod catalog;

pub use catalog::{breeds, choice_options, find_breed, BreedSummary, ChoiceOption, ChoiceOptions};
