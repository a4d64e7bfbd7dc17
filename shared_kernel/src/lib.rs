pub mod configuration;
pub mod non_empty_string;
pub mod tracing;
