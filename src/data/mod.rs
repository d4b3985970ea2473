//! Incident data ingestion

pub mod loader;

pub use loader::{load_incidents, LoadOptions};
