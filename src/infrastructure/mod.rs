//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits, the manifest-backed
//! command registry, and wires up services.

pub mod di;
pub mod error;
pub mod manifest;
pub mod traits;

pub use error::InfraError;
pub use manifest::{Manifest, ManifestCommand, ManifestRegistry};
