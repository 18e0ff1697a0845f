//! Dispatch service
//!
//! Loads the resolved command, binds its argv tail, validates the result
//! and invokes `execute` exactly once, or `help` when help was requested.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::registry::CommandRegistry;
use crate::application::services::Resolution;
use crate::application::ApplicationResult;
use crate::domain::{BindOutcome, Binder, Call};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Help was shown; `execute` was not called.
    Help,
    /// `execute` was called and returned successfully.
    Dispatched,
}

/// Service that turns a resolution plus argv into exactly one command call.
pub struct Dispatcher {
    registry: Arc<dyn CommandRegistry>,
    cwd: PathBuf,
}

impl Dispatcher {
    /// Create a dispatcher; `cwd` is reported to commands in their context.
    pub fn new(registry: Arc<dyn CommandRegistry>, cwd: PathBuf) -> Self {
        Self { registry, cwd }
    }

    #[instrument(level = "debug", skip(self, argv), fields(command = %resolution.command_path))]
    pub fn dispatch(&self, resolution: &Resolution, argv: &[String]) -> ApplicationResult<Outcome> {
        let command = self.registry.load(resolution)?;
        let definition = command.definition();
        let args = resolution.args(argv);
        debug!("dispatch: binding {} token(s)", args.len());

        match Binder::new(definition).bind(args)? {
            BindOutcome::Help => {
                command.help(&resolution.command_path)?;
                Ok(Outcome::Help)
            }
            BindOutcome::Bound(invocation) => {
                let bound = invocation.finalize(definition)?;
                let call = Call::new(bound, self.cwd.clone(), resolution.command_path.clone());
                info!("dispatch: executing {}", resolution.command_path);
                command.execute(call)?;
                Ok(Outcome::Dispatched)
            }
        }
    }
}
