//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner, etc.)
//! but are themselves concrete structs, not traits.

mod catalog;
mod dispatcher;
mod resolver;

pub use catalog::{CatalogEntry, CommandCatalog};
pub use dispatcher::{Dispatcher, Outcome};
pub use resolver::{CommandResolver, Resolution, TreeLayout};
