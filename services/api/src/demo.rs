use clap::Args;
use puppyhub::error::AppError;
use puppyhub::workflows::adoption::application::{
    ActivityLevel, ApplicationFormService, BreedId, CoatType, ColorTag, FlagField, MemoryStorage,
    PersistenceAdapter, PickupLocation, PreferredGender, SimulatedEndpoint, SizeTag, Step,
    SubmitError, TagSelection, TextField,
};
use puppyhub::workflows::adoption::find_breed;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Simulated submission latency in milliseconds.
    #[arg(long, default_value_t = 1500)]
    pub(crate) latency_ms: u64,
}

type DemoService = ApplicationFormService<MemoryStorage, SimulatedEndpoint>;

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let storage = MemoryStorage::default();
    let service = ApplicationFormService::new(
        PersistenceAdapter::with_default_slot(Arc::new(storage)),
        Arc::new(SimulatedEndpoint::new(Duration::from_millis(args.latency_ms))),
    );

    println!("Puppy adoption application demo");
    for step in Step::ALL {
        fill_step(&service, step);
        let report = service.step_report(step);
        if !report.is_valid() {
            println!("- Step {step}: blocked on {report}");
            return Ok(());
        }
        println!("- Step {step}: complete");
        if step != Step::LAST {
            service.advance_step();
        }
    }

    let record = service.record();
    let breeds: Vec<&str> = record
        .chosen_breeds()
        .map(|breed| find_breed(breed.as_str()).map_or(breed.as_str(), |found| found.name))
        .collect();
    println!(
        "\nSubmitting application for {} (breeds: {})",
        record.applicant_name(),
        breeds.join(", ")
    );

    match service.submit_detailed().await {
        Ok(receipt) => {
            println!(
                "  Accepted as {} at {}",
                receipt.reference,
                receipt.accepted_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!(
                "  Form reset to step {} with saved progress cleared: {}",
                service.step().number(),
                !service.has_saved_progress()
            );
        }
        Err(SubmitError::AlreadySubmitting) => println!("  Submission already in flight"),
        Err(SubmitError::Failed(failure)) => {
            println!(
                "  {}",
                service.submit_error().unwrap_or_else(|| failure.to_string())
            );
            println!("  Detail: {failure}");
        }
    }

    Ok(())
}

fn fill_step(service: &DemoService, step: Step) {
    match step {
        Step::Identity => {
            for (field, value) in [
                (TextField::FirstName, "Jordan"),
                (TextField::LastName, "Rivera"),
                (TextField::Address, "410 Larimer St"),
                (TextField::City, "Denver"),
                (TextField::State, "CO"),
                (TextField::ZipCode, "80202"),
                (TextField::MobileNumber, "7205550142"),
                (TextField::Email, "jordan.rivera@example.com"),
                (TextField::ConfirmEmail, "jordan.rivera@example.com"),
                (TextField::ReferralSource, "friend"),
            ] {
                service.set_text(field, value);
            }
            service.set_flag(FlagField::TextAlerts, true);
        }
        Step::Preferences => {
            service.set_breed_choice(0, BreedId::new("bernedoodle"));
            service.set_breed_choice(1, BreedId::new("goldendoodle"));
            service.set_tag(TagSelection::Size(SizeTag::Medium), true);
            service.set_tag(TagSelection::Color(ColorTag::PhantomTri), true);
            service.set_tag(TagSelection::CoatType(CoatType::Wavy), true);
            service.set_preferred_gender(Some(PreferredGender::Either));
            service.set_activity_level(Some(ActivityLevel::High));
            service.set_pickup_location(Some(PickupLocation::Denver));
        }
        Step::Household => {
            service.set_flag(FlagField::OtherPets, true);
            service.set_text(TextField::PetTypes, "One senior cat");
            service.set_flag(FlagField::HasFence, true);
            service.set_text(TextField::Lifestyle, "Hybrid office schedule, weekend hikes");
            service.set_text(TextField::TypicalDay, "Walk at 7, lunch break play, evening park");
            service.set_text(
                TextField::WhyGoodFit,
                "Fenced yard, flexible schedule, puppy class booked",
            );
            service.set_flag(FlagField::InterestedInTraining, true);
        }
        Step::Agreements => {
            service.set_flag(FlagField::SpayNeuterAgreement, true);
            service.set_flag(FlagField::WelcomeCall, true);
        }
    }
}
