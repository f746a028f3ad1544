//! Tower Layer implementations for the A2A endpoint

pub mod validation;

pub use validation::{A2AValidationLayer, A2AValidationService};
