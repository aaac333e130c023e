pub mod devices;
pub mod jobs;
pub mod metrics;
