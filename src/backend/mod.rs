pub mod client;
pub mod types;

pub use client::{BackendClient, BackendError};
pub use types::{Assignee, Incident, IncidentCreated, KbReference};
