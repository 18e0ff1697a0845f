//! Domain-level errors (no external dependencies)

use itertools::Itertools;
use thiserror::Error;

/// Binding errors. All of them are fatal and abort before dispatch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("unknown option: --{0}")]
    UnknownOptionName(String),

    #[error("unknown flag: -{0}")]
    UnknownOptionFlag(char),

    #[error("missing value for option: --{0}")]
    MissingOptionValue(String),

    #[error("value for option --{option} looks like an option: {value}")]
    OptionValueLooksLikeOption { option: String, value: String },

    #[error("only the last flag in a sequence may take a value: -{flag} (--{option})")]
    NonTerminalFlagTakesValue { flag: char, option: String },

    #[error("expected at least {expected} argument(s), got {actual}")]
    InsufficientPositionalArguments { expected: usize, actual: usize },

    #[error("missing required option(s): {}", .0.iter().map(|n| format!("--{n}")).join(", "))]
    MissingRequiredOptions(Vec<String>),
}
