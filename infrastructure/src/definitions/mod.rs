//! RACI and approval-flow tables read from JSON files.

mod json_loader;

pub use json_loader::{APPROVAL_FLOWS_FILE, DefinitionLoadError, JsonDefinitionLoader, RACI_FILE};
