//! Working state of a single parse and the call handed to a command

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use tracing::debug;

use crate::domain::definition::CommandDefinition;
use crate::domain::error::DomainError;
use crate::domain::path::CommandPath;
use crate::domain::value::{coerce, Value};

/// Option name → current value.
pub type OptionsRecord = BTreeMap<String, Value>;

/// Mutable state of one parse, threaded through classification, binding
/// and dispatch. Exactly one exists per run.
#[derive(Debug, Clone)]
pub struct Invocation {
    params: Vec<Value>,
    options: OptionsRecord,
    pending_required: Vec<String>,
    pending_params: VecDeque<usize>,
    extra: Vec<String>,
}

impl Invocation {
    /// Seed options with `false` (toggles) or their defaults, queue every
    /// parameter slot and mark every required option as pending.
    pub fn new(definition: &CommandDefinition) -> Self {
        let options = definition
            .options
            .iter()
            .map(|o| (o.name.clone(), o.initial_value()))
            .collect();
        let pending_required = definition
            .options
            .iter()
            .filter(|o| o.required)
            .map(|o| o.name.clone())
            .collect();

        Self {
            params: Vec::with_capacity(definition.params.len()),
            options,
            pending_required,
            pending_params: (0..definition.params.len()).collect(),
            extra: Vec::new(),
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn options(&self) -> &OptionsRecord {
        &self.options
    }

    pub fn extra(&self) -> &[String] {
        &self.extra
    }

    pub fn pending_required(&self) -> &[String] {
        &self.pending_required
    }

    pub fn set_option(&mut self, name: &str, value: Value) {
        self.options.insert(name.to_string(), value);
    }

    pub fn satisfy(&mut self, name: &str) {
        self.pending_required.retain(|n| n != name);
    }

    /// Fill the next parameter slot, or overflow once all slots are taken.
    pub fn bind_positional(&mut self, definition: &CommandDefinition, token: &str) {
        match self.pending_params.pop_front() {
            Some(idx) => {
                let param = &definition.params[idx];
                debug!("positional {:?} -> {}", token, param.name);
                self.params.push(coerce(token, param.value_type));
            }
            None => {
                debug!("positional {:?} -> extra", token);
                self.extra.push(token.to_string());
            }
        }
    }

    /// Check completeness and fill defaults for unfilled parameter slots.
    pub fn finalize(mut self, definition: &CommandDefinition) -> Result<BoundArguments, DomainError> {
        let required = definition.required_param_count();
        if self.params.len() < required {
            return Err(DomainError::InsufficientPositionalArguments {
                expected: required,
                actual: self.params.len(),
            });
        }
        if !self.pending_required.is_empty() {
            return Err(DomainError::MissingRequiredOptions(self.pending_required));
        }

        for idx in self.pending_params.drain(..) {
            let value = definition.params[idx].default.clone().unwrap_or_default();
            self.params.push(value);
        }

        Ok(BoundArguments {
            params: self.params,
            options: definition.has_options().then_some(self.options),
            extra: self.extra,
        })
    }
}

/// Validated result of binding, ready to be dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    /// One value per declared parameter, in declaration order.
    pub params: Vec<Value>,
    /// Absent when the command declares no options.
    pub options: Option<OptionsRecord>,
    pub extra: Vec<String>,
}

/// Ambient information passed to `execute`.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationContext {
    pub cwd: PathBuf,
    /// Positional tokens beyond the declared parameters, verbatim.
    pub extra: Vec<String>,
    pub command_path: CommandPath,
}

/// Arguments of a single `execute`: parameters, options record, context.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub params: Vec<Value>,
    pub options: Option<OptionsRecord>,
    pub context: InvocationContext,
}

impl Call {
    pub fn new(bound: BoundArguments, cwd: PathBuf, command_path: CommandPath) -> Self {
        Self {
            params: bound.params,
            options: bound.options,
            context: InvocationContext {
                cwd,
                extra: bound.extra,
                command_path,
            },
        }
    }

    /// Look up an option value by name.
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.as_ref().and_then(|o| o.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::definition::{OptionDefinition, ParamDefinition};
    use crate::domain::value::ValueType;

    fn definition() -> CommandDefinition {
        CommandDefinition::builder()
            .param(ParamDefinition::new("name").typed(ValueType::String))
            .param(ParamDefinition::new("count").typed(ValueType::Number).default_value(1.0))
            .option(OptionDefinition::value("owner").required())
            .build()
    }

    #[test]
    fn given_unfilled_optional_slot_when_finalizing_then_default_is_appended() {
        let def = definition();
        let mut inv = Invocation::new(&def);
        inv.bind_positional(&def, "widget");
        inv.satisfy("owner");

        let bound = inv.finalize(&def).expect("finalize");

        assert_eq!(
            bound.params,
            vec![Value::String("widget".into()), Value::Number(1.0)]
        );
    }

    #[test]
    fn given_more_tokens_than_slots_when_binding_then_rest_overflows_verbatim() {
        let def = definition();
        let mut inv = Invocation::new(&def);
        for token in ["a", "2", "3", "x y"] {
            inv.bind_positional(&def, token);
        }

        assert_eq!(inv.params(), &[Value::String("a".into()), Value::Number(2.0)]);
        assert_eq!(inv.extra(), ["3", "x y"]);
    }

    #[test]
    fn given_missing_required_option_when_finalizing_then_error_names_it() {
        let def = definition();
        let mut inv = Invocation::new(&def);
        inv.bind_positional(&def, "widget");

        let err = inv.finalize(&def).unwrap_err();

        assert_eq!(err, DomainError::MissingRequiredOptions(vec!["owner".into()]));
    }

    #[test]
    fn given_several_required_options_missing_when_finalizing_then_all_named_in_declaration_order() {
        let def = CommandDefinition::builder()
            .option(OptionDefinition::value("zone").required())
            .option(OptionDefinition::toggle("quiet"))
            .option(OptionDefinition::value("account").flag('a').required())
            .build();
        let inv = Invocation::new(&def);

        let err = inv.finalize(&def).unwrap_err();

        assert_eq!(
            err,
            DomainError::MissingRequiredOptions(vec!["zone".into(), "account".into()])
        );
        assert_eq!(err.to_string(), "missing required option(s): --zone, --account");
    }

    #[test]
    fn given_positional_count_check_and_missing_option_when_finalizing_then_count_reported_first() {
        let def = definition();
        let inv = Invocation::new(&def);

        let err = inv.finalize(&def).unwrap_err();

        assert_eq!(
            err,
            DomainError::InsufficientPositionalArguments {
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn given_command_without_options_when_finalizing_then_options_record_is_omitted() {
        let def = CommandDefinition::builder()
            .param(ParamDefinition::new("name"))
            .build();
        let mut inv = Invocation::new(&def);
        inv.bind_positional(&def, "ignored-content");

        let bound = inv.finalize(&def).expect("finalize");

        assert_eq!(bound.options, None);
        assert_eq!(bound.params, vec![Value::Undefined]);
    }
}
