use tracing::{debug, info, warn};

use super::domain::{
    ActivityLevel, ApplicationRecord, BreedChoice, BreedId, DeliveryMethod, PaymentMethod,
    PickupLocation, PreferredGender, Step, MAX_BREED_CHOICES,
};
use super::fields::{ApplicationPatch, FlagField, NumberField, TagSelection, TextField};
use super::persistence::{PersistenceAdapter, StoragePort};

/// Holds the in-progress application and the active step.
///
/// Every change to the record is written through to the persistence slot. The active step
/// is not persisted; a restored form always reopens on step 1.
#[derive(Debug)]
pub struct FormStore<S> {
    record: ApplicationRecord,
    step: Step,
    persistence: PersistenceAdapter<S>,
}

impl<S: StoragePort> FormStore<S> {
    /// Fresh form with default answers. The slot is left untouched until the first change.
    pub fn new(persistence: PersistenceAdapter<S>) -> Self {
        Self {
            record: ApplicationRecord::default(),
            step: Step::FIRST,
            persistence,
        }
    }

    /// Reopen the form from the slot, falling back to defaults.
    pub fn restore(persistence: PersistenceAdapter<S>) -> Self {
        let record = match persistence.load() {
            Some(record) => {
                info!(slot = %persistence.slot(), "restored saved application form");
                record
            }
            None => ApplicationRecord::default(),
        };

        Self {
            record,
            step: Step::FIRST,
            persistence,
        }
    }

    pub fn record(&self) -> &ApplicationRecord {
        &self.record
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    pub fn update_fields(&mut self, patch: ApplicationPatch) {
        debug!(fields = ?patch.fields(), "merging application fields");
        self.mutate(|record| patch.apply_to(record));
    }

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let value = value.into();
        self.mutate(|record| field.write(record, value));
    }

    pub fn set_flag(&mut self, field: FlagField, value: bool) {
        self.mutate(|record| *field.slot(record) = value);
    }

    pub fn set_number(&mut self, field: NumberField, value: u32) {
        self.mutate(|record| *field.slot(record) = value);
    }

    pub fn set_tag(&mut self, selection: TagSelection, checked: bool) {
        self.mutate(|record| selection.write(record, checked));
    }

    /// Set the breed ranked at `index` (0-based), padding with blank choices as needed.
    /// Indexes at or past [`MAX_BREED_CHOICES`] are ignored.
    pub fn set_breed_choice(&mut self, index: usize, breed: BreedId) {
        if index >= MAX_BREED_CHOICES {
            warn!(index, max = MAX_BREED_CHOICES, "ignoring out-of-range breed choice");
            return;
        }
        self.mutate(|record| {
            while record.breed_choices.len() <= index {
                let priority = u8::try_from(record.breed_choices.len() + 1).unwrap_or(u8::MAX);
                record.breed_choices.push(BreedChoice::blank(priority));
            }
            record.breed_choices[index].breed = breed;
        });
    }

    pub fn set_preferred_gender(&mut self, gender: Option<PreferredGender>) {
        self.mutate(|record| record.preferred_gender = gender);
    }

    pub fn set_activity_level(&mut self, level: Option<ActivityLevel>) {
        self.mutate(|record| record.activity_level = level);
    }

    pub fn set_pickup_location(&mut self, location: Option<PickupLocation>) {
        self.mutate(|record| record.pickup_location = location);
    }

    pub fn set_second_pickup_location(&mut self, location: Option<PickupLocation>) {
        self.mutate(|record| record.second_pickup_location = location);
    }

    pub fn set_delivery_method(&mut self, method: DeliveryMethod) {
        self.mutate(|record| record.delivery_method = method);
    }

    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.mutate(|record| record.payment_method = method);
    }

    pub fn advance_step(&mut self) -> Step {
        self.move_to(self.step.next())
    }

    pub fn retreat_step(&mut self) -> Step {
        self.move_to(self.step.previous())
    }

    /// Jump to step `number`. Out-of-range numbers are ignored; returns whether it applied.
    pub fn set_step(&mut self, number: u8) -> bool {
        match Step::from_number(number) {
            Some(step) => {
                self.move_to(step);
                true
            }
            None => {
                debug!(number, "ignoring out-of-range step");
                false
            }
        }
    }

    /// Back to defaults on step 1 with the slot cleared.
    pub fn reset_record(&mut self) {
        self.record = ApplicationRecord::default();
        self.step = Step::FIRST;
        self.persistence.clear();
        info!(slot = %self.persistence.slot(), "application form reset");
    }

    fn move_to(&mut self, step: Step) -> Step {
        if step != self.step {
            debug!(from = self.step.number(), to = step.number(), "changing application step");
            self.step = step;
        }
        self.step
    }

    fn mutate(&mut self, change: impl FnOnce(&mut ApplicationRecord)) {
        change(&mut self.record);
        self.record.normalize();
        self.persistence.save(&self.record);
    }
}
