//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => infra_exit_code(e),
        }
    }
}

fn infra_exit_code(e: &InfraError) -> i32 {
    match e {
        InfraError::Io { .. } => crate::exitcode::IOERR,
        InfraError::Manifest { .. } => crate::exitcode::CONFIG,
        InfraError::Exec { exit_code, .. } => exit_code.unwrap_or(crate::exitcode::SOFTWARE),
        InfraError::Application(app) => match app {
            ApplicationError::Domain(_) => crate::exitcode::USAGE,
            ApplicationError::CommandNotFound(_) => crate::exitcode::USAGE,
            ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            ApplicationError::OperationFailed { source, .. } => {
                match source.downcast_ref::<InfraError>() {
                    Some(inner) => infra_exit_code(inner),
                    None if source.is::<std::io::Error>() => crate::exitcode::IOERR,
                    None => crate::exitcode::SOFTWARE,
                }
            }
        },
    }
}
