use clap::Args;
use puppyhub::error::AppError;
use puppyhub::workflows::adoption::application::{
    step_report, validate_record, ApplicationRecord, Step,
};
use puppyhub::workflows::adoption::find_breed;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Path to a saved application document (JSON, as stored in the persistence slot)
    pub(crate) path: PathBuf,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.path)?;
    let record: ApplicationRecord = serde_json::from_str(&raw)?;

    println!("Application check for {}", args.path.display());
    for line in summarize(&record) {
        println!("{line}");
    }
    Ok(())
}

fn summarize(record: &ApplicationRecord) -> Vec<String> {
    let mut lines = Vec::new();
    for step in Step::ALL {
        let report = step_report(step, record);
        if report.is_valid() {
            lines.push(format!("- Step {step}: complete"));
            continue;
        }
        lines.push(format!("- Step {step}: {} issue(s)", report.len()));
        for issue in report.issues() {
            lines.push(format!("    {}: {}", issue.field, issue.message));
        }
    }

    for breed in record.chosen_breeds() {
        if find_breed(breed.as_str()).is_none() {
            lines.push(format!("- Note: breed '{breed}' is not in the catalog"));
        }
    }

    let ready = validate_record(record).is_valid();
    lines.push(format!(
        "Ready to submit: {}",
        if ready { "yes" } else { "no" }
    ));
    lines
}
