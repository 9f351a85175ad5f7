//! Puppy adoption application: form state, validation, saved progress and submission.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
