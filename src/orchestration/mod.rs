//! Coordinates the settlement engine with bill storage.

pub mod orchestrator;

pub use orchestrator::{
    OrchestrationError, Orchestrator, ShareLink, ShareLinkRequest, StatusChangeRequest,
};
