//! Domain layer: definitions, values and the binding state machine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod binder;
pub mod definition;
pub mod error;
pub mod invocation;
pub mod path;
pub mod value;

pub use binder::{BindOutcome, Binder, Token};
pub use definition::{CommandDefinition, CommandDefinitionBuilder, OptionDefinition, ParamDefinition};
pub use error::DomainError;
pub use invocation::{BoundArguments, Call, Invocation, InvocationContext, OptionsRecord};
pub use path::{is_command_name, CommandPath};
pub use value::{coerce, parse_number, Value, ValueType};

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
///
/// Returns the input unchanged when expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
